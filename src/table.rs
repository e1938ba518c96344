//! The entity table core: explode per-document records into flat rows and
//! query the result.
//!
//! This is the long-format reshape at the heart of the crate. Each
//! [`DocumentEntityRecord`] carries two index-aligned sequences; exploding
//! zips them position-by-position into one [`FlattenedEntityRow`] per entity
//! occurrence, concatenated across records in input order.
//!
//! # Ordering
//!
//! Row order is defined purely as: primary key = input document sequence
//! position, secondary key = in-document emission index. Nothing in this
//! module re-sorts by any other key; downstream filtering and display assume
//! document-then-emission order is preserved.
//!
//! # Cardinality
//!
//! The explode step is a lossless cardinality expansion: the total number of
//! entity occurrences across all records equals the number of rows out, with
//! no duplication and no loss. Documents with zero entities contribute zero
//! rows and so vanish from the flattened view.

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::models::{DocumentEntityRecord, FlattenedEntityRow};

/// Explode an ordered list of per-document records into flat rows.
///
/// Each record's parallel sequences are zipped index-by-index, one row per
/// pair, with the record's `document_key` attached to each. Records are
/// processed in input order and their rows concatenated.
///
/// A record with empty sequences contributes nothing; its document key is
/// absent from the result even though it was present in `records`.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn explode(records: &[DocumentEntityRecord]) -> Vec<FlattenedEntityRow> {
    let mut rows = Vec::with_capacity(records.iter().map(DocumentEntityRecord::len).sum());
    for record in records {
        for (category, text) in record.categories().iter().zip(record.texts().iter()) {
            rows.push(FlattenedEntityRow {
                document_key: record.document_key().to_string(),
                category: category.clone(),
                entity_text: text.clone(),
            });
        }
    }
    debug!(rows = rows.len(), "Exploded records into rows");
    rows
}

/// The queryable long-format entity table produced by a pipeline run.
///
/// Wraps the flattened row list and exposes category filtering and
/// per-category counts. Rows are held in document-then-emission order and
/// never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTable {
    rows: Vec<FlattenedEntityRow>,
}

impl EntityTable {
    /// Build a table directly from per-document records.
    pub fn from_records(records: &[DocumentEntityRecord]) -> Self {
        Self {
            rows: explode(records),
        }
    }

    /// Wrap an already-flattened row list.
    pub fn from_rows(rows: Vec<FlattenedEntityRow>) -> Self {
        Self { rows }
    }

    /// All rows, in document-then-emission order.
    pub fn rows(&self) -> &[FlattenedEntityRow] {
        &self.rows
    }

    /// Consume the table, yielding its rows.
    pub fn into_rows(self) -> Vec<FlattenedEntityRow> {
        self.rows
    }

    /// Total number of entity occurrences in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The ordered subsequence of rows whose category equals `category`.
    ///
    /// Comparison is exact string match; no case or whitespace normalization
    /// is performed. A category absent from the data (or from the vocabulary
    /// altogether) yields an empty result, not an error. `limit` caps the
    /// result to the first N matches without reordering.
    pub fn filter_category(&self, category: &str, limit: Option<usize>) -> Vec<&FlattenedEntityRow> {
        let matches = self.rows.iter().filter(|row| row.category == category);
        match limit {
            Some(n) => matches.take(n).collect(),
            None => matches.collect(),
        }
    }

    /// Occurrence counts per category, ordered by first appearance.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.rows
            .iter()
            .map(|row| row.category.clone())
            .counts()
            .into_iter()
            .sorted_by_key(|(category, _)| {
                self.rows
                    .iter()
                    .position(|row| &row.category == category)
                    .unwrap_or(usize::MAX)
            })
            .collect()
    }

    /// The distinct document keys present in the table, in row order.
    ///
    /// Documents whose records held zero entities are not represented here;
    /// consult the un-flattened record list (or the run report) to tell "no
    /// entities found" apart from "document not processed".
    pub fn document_keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.document_key.as_str())
            .dedup()
            .collect()
    }
}
