//! Document sources: where the raw text comes from.
//!
//! A source produces an ordered collection of keyed documents. The pipeline
//! is agnostic to the backing implementation; it only requires that keys be
//! stable and unique within a single run, and that document order be
//! deterministic (directory sources sort explicitly rather than trusting
//! filesystem traversal order, which varies across filesystems).
//!
//! Sources report two failure shapes:
//!
//! - a wholesale failure (directory missing, feed unreachable) fails the
//!   `documents()` call itself
//! - a per-document failure (one unreadable file, one malformed item) is
//!   returned in-position as [`SourceItem::Failed`], so the pipeline can
//!   apply its failure policy without losing the document's key or its place
//!   in the input ordering
//!
//! # Implementations
//!
//! - [`dir::DirSource`]: a directory of `.txt` files, keys are filenames
//! - [`newsapi::NewsApiSource`]: a news search API, keys are article URLs
//! - [`rss::RssSource`]: an RSS feed, keys are item links
//! - [`StaticSource`]: an in-memory collection, for library callers and tests

use crate::error::GazetteError;
use crate::models::Document;

pub mod dir;
pub mod newsapi;
pub mod rss;

/// One position in a source's output: either a document or an attributed
/// per-document failure.
#[derive(Debug, Clone)]
pub enum SourceItem {
    /// The document was produced successfully.
    Ok(Document),
    /// The document at this position could not be produced. Its key is
    /// preserved so the run report can name it.
    Failed {
        /// Key of the document that could not be produced.
        key: String,
        /// What went wrong.
        reason: String,
    },
}

impl SourceItem {
    /// The document key at this position, whether it succeeded or failed.
    pub fn key(&self) -> &str {
        match self {
            SourceItem::Ok(doc) => &doc.key,
            SourceItem::Failed { key, .. } => key,
        }
    }
}

/// Trait for document sources.
pub trait DocumentSource {
    /// Produce the ordered document collection for this run.
    async fn documents(&self) -> Result<Vec<SourceItem>, GazetteError>;
}

/// An in-memory document source with a fixed collection.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: Vec<Document>,
}

impl StaticSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentSource for StaticSource {
    async fn documents(&self) -> Result<Vec<SourceItem>, GazetteError> {
        Ok(self.documents.iter().cloned().map(SourceItem::Ok).collect())
    }
}
