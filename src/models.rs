//! Data models for documents, tagged spans, and the entity table rows.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Document`]: one unit of raw text with a stable identifying key
//! - [`TaggedSpan`]: one (text, category) pair emitted by a tagger
//! - [`DocumentEntityRecord`]: a document's full tagging result as two
//!   index-aligned parallel sequences
//! - [`FlattenedEntityRow`]: one row of the final long-format table
//! - [`RunReport`]: which documents were processed and which failed
//!
//! The serialized row field names (`Entity_type`, `Entity_identified`) match
//! the column names consumers of the JSON output expect, hence the serde
//! renames on [`FlattenedEntityRow`] and [`DocumentEntityRecord`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::GazetteError;

/// The closed entity category vocabulary, as emitted by the taggers.
///
/// The table core treats categories as opaque strings and never validates
/// membership; this list exists for callers that want to enumerate or
/// sanity-check labels (e.g. CLI help text).
pub const CATEGORIES: [&str; 18] = [
    "PERSON",
    "NORP",
    "FAC",
    "ORG",
    "GPE",
    "LOC",
    "PRODUCT",
    "EVENT",
    "WORK_OF_ART",
    "LAW",
    "LANGUAGE",
    "DATE",
    "TIME",
    "PERCENT",
    "MONEY",
    "QUANTITY",
    "ORDINAL",
    "CARDINAL",
];

static CATEGORY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CATEGORIES.iter().copied().collect());

/// Whether `label` is one of the known entity categories.
///
/// Comparison is exact; no case or whitespace normalization is performed.
pub fn is_known_category(label: &str) -> bool {
    CATEGORY_SET.contains(label)
}

/// One unit of raw text content with a stable identifying key.
///
/// The key may be a filename, a URL, or a sequence index; the pipeline only
/// requires that keys be stable and unique within a single run.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier for this document (filename, URL, index).
    pub key: String,
    /// The raw text content.
    pub text: String,
}

/// One recognized entity occurrence as emitted by a tagger.
///
/// Spans are emitted in left-to-right document order and are never
/// deduplicated: repeated mentions of the same entity produce repeated spans.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaggedSpan {
    /// The exact substring recognized.
    pub text: String,
    /// Category label drawn from the tagger's vocabulary.
    pub category: String,
}

impl TaggedSpan {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

/// One document's full tagging result: two index-aligned parallel sequences.
///
/// `categories[i]` is the label for `texts[i]`, in the tagger's original
/// emission order. A document that produced no entities still gets a record
/// with two empty sequences, so downstream consumers can distinguish "no
/// entities found" from "document not processed".
///
/// The equal-length invariant is checked at construction and at
/// deserialization; see [`GazetteError::CardinalityMismatch`]. The fields
/// are private so a mismatched record cannot be built by hand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RecordParts")]
pub struct DocumentEntityRecord {
    document_key: String,
    #[serde(rename = "Entity_type")]
    categories: Vec<String>,
    #[serde(rename = "Entity_identified")]
    texts: Vec<String>,
}

/// Wire shape of a record, before the length check.
#[derive(Deserialize)]
struct RecordParts {
    document_key: String,
    #[serde(rename = "Entity_type")]
    categories: Vec<String>,
    #[serde(rename = "Entity_identified")]
    texts: Vec<String>,
}

impl TryFrom<RecordParts> for DocumentEntityRecord {
    type Error = GazetteError;

    fn try_from(parts: RecordParts) -> Result<Self, Self::Error> {
        Self::new(parts.document_key, parts.categories, parts.texts)
    }
}

impl DocumentEntityRecord {
    /// Build a record from pre-separated parallel sequences, checking the
    /// equal-length invariant.
    pub fn new(
        document_key: impl Into<String>,
        categories: Vec<String>,
        texts: Vec<String>,
    ) -> Result<Self, GazetteError> {
        let document_key = document_key.into();
        if categories.len() != texts.len() {
            return Err(GazetteError::CardinalityMismatch {
                key: document_key,
                categories: categories.len(),
                texts: texts.len(),
            });
        }
        Ok(Self {
            document_key,
            categories,
            texts,
        })
    }

    /// Build a record by projecting a span sequence into parallel sequences.
    ///
    /// This is the canonical constructor: the two sequences come from the
    /// same spans, so the cardinality invariant holds by construction.
    pub fn from_spans(document_key: impl Into<String>, spans: Vec<TaggedSpan>) -> Self {
        let mut categories = Vec::with_capacity(spans.len());
        let mut texts = Vec::with_capacity(spans.len());
        for span in spans {
            categories.push(span.category);
            texts.push(span.text);
        }
        Self {
            document_key: document_key.into(),
            categories,
            texts,
        }
    }

    /// A placeholder record with two empty sequences, used when a document
    /// failed and the run policy is skip-with-placeholder.
    pub fn placeholder(document_key: impl Into<String>) -> Self {
        Self {
            document_key: document_key.into(),
            categories: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Key of the source document.
    pub fn document_key(&self) -> &str {
        &self.document_key
    }

    /// Category labels, one per recognized span, in emission order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Recognized span texts, index-aligned with [`Self::categories`].
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Number of entity occurrences in this record.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether this document produced no entities.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// One row of the final long-format table: a single entity occurrence tied
/// to its source document and category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlattenedEntityRow {
    /// Key of the source document.
    pub document_key: String,
    /// Category label of this occurrence.
    #[serde(rename = "Entity_type")]
    pub category: String,
    /// The recognized text of this occurrence.
    #[serde(rename = "Entity_identified")]
    pub entity_text: String,
}

impl FlattenedEntityRow {
    pub fn new(
        document_key: impl Into<String>,
        category: impl Into<String>,
        entity_text: impl Into<String>,
    ) -> Self {
        Self {
            document_key: document_key.into(),
            category: category.into(),
            entity_text: entity_text.into(),
        }
    }
}

impl From<FlattenedEntityRow> for DocumentEntityRecord {
    /// A row viewed as a trivial one-element record. Exploding such records
    /// reproduces the original rows, which is what makes re-flattening a
    /// no-op.
    fn from(row: FlattenedEntityRow) -> Self {
        DocumentEntityRecord {
            document_key: row.document_key,
            categories: vec![row.category],
            texts: vec![row.entity_text],
        }
    }
}

/// One failed document in a run: its key and what went wrong.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentFailure {
    /// Key of the document that could not be processed.
    pub document_key: String,
    /// Human-readable failure description.
    pub reason: String,
}

/// Summary of a pipeline run: totals plus the keys that failed.
///
/// A run either produces a complete table or a clearly attributed
/// partial-failure report; document keys are never silently dropped.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunReport {
    /// Number of documents supplied by the source.
    pub documents_total: usize,
    /// Number of documents tagged successfully.
    pub documents_tagged: usize,
    /// Documents that failed, with reasons. Empty on a clean run.
    pub failures: Vec<DocumentFailure>,
}

impl RunReport {
    /// Whether every document was processed without failure.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_membership() {
        assert!(is_known_category("PERSON"));
        assert!(is_known_category("WORK_OF_ART"));
        assert!(!is_known_category("person"));
        assert!(!is_known_category("PERSON "));
        assert!(!is_known_category("VILLAIN"));
    }

    #[test]
    fn test_record_from_spans_preserves_order() {
        let spans = vec![
            TaggedSpan::new("Apple", "ORG"),
            TaggedSpan::new("Jane", "PERSON"),
            TaggedSpan::new("Paris", "GPE"),
        ];
        let record = DocumentEntityRecord::from_spans("doc1", spans);
        assert_eq!(record.document_key, "doc1");
        assert_eq!(record.categories, vec!["ORG", "PERSON", "GPE"]);
        assert_eq!(record.texts, vec!["Apple", "Jane", "Paris"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_record_zero_entities_is_present_not_absent() {
        let record = DocumentEntityRecord::from_spans("doc2", vec![]);
        assert!(record.is_empty());
        assert_eq!(record.categories.len(), 0);
        assert_eq!(record.texts.len(), 0);
    }

    #[test]
    fn test_record_new_rejects_unequal_lengths() {
        let result = DocumentEntityRecord::new(
            "doc1",
            vec!["ORG".to_string(), "PERSON".to_string()],
            vec!["Apple".to_string()],
        );
        match result {
            Err(GazetteError::CardinalityMismatch {
                key,
                categories,
                texts,
            }) => {
                assert_eq!(key, "doc1");
                assert_eq!(categories, 2);
                assert_eq!(texts, 1);
            }
            other => panic!("expected CardinalityMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_record_serialization_column_names() {
        let record = DocumentEntityRecord::from_spans(
            "articles/a.txt",
            vec![TaggedSpan::new("NATO", "ORG")],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Entity_type\""));
        assert!(json.contains("\"Entity_identified\""));
        assert!(json.contains("articles/a.txt"));
    }

    #[test]
    fn test_record_deserialization_rejects_unequal_lengths() {
        let json = r#"{
            "document_key": "doc1",
            "Entity_type": ["ORG", "PERSON"],
            "Entity_identified": ["Apple"]
        }"#;
        let result = serde_json::from_str::<DocumentEntityRecord>(json);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("doc1"), "unexpected error: {message}");
    }

    #[test]
    fn test_record_deserialization_accepts_aligned_sequences() {
        let json = r#"{
            "document_key": "doc1",
            "Entity_type": ["ORG"],
            "Entity_identified": ["Apple"]
        }"#;
        let record: DocumentEntityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.categories(), ["ORG".to_string()]);
        assert_eq!(record.texts(), ["Apple".to_string()]);
    }

    #[test]
    fn test_row_roundtrip() {
        let row = FlattenedEntityRow::new("doc1", "GPE", "Paris");
        let json = serde_json::to_string(&row).unwrap();
        let back: FlattenedEntityRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_row_to_trivial_record() {
        let row = FlattenedEntityRow::new("doc1", "MONEY", "$4 billion");
        let record: DocumentEntityRecord = row.into();
        assert_eq!(record.len(), 1);
        assert_eq!(record.categories, vec!["MONEY"]);
        assert_eq!(record.texts, vec!["$4 billion"]);
    }

    #[test]
    fn test_run_report_completeness() {
        let clean = RunReport {
            documents_total: 3,
            documents_tagged: 3,
            failures: vec![],
        };
        assert!(clean.is_complete());

        let partial = RunReport {
            documents_total: 3,
            documents_tagged: 2,
            failures: vec![DocumentFailure {
                document_key: "doc3".to_string(),
                reason: "fetch failed".to_string(),
            }],
        };
        assert!(!partial.is_complete());
        assert_eq!(partial.failures[0].document_key, "doc3");
    }
}
