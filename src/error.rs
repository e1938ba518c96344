//! Error taxonomy for the entity tabulation pipeline.
//!
//! Failures fall into two classes with different propagation rules:
//!
//! - **Per-document failures** ([`GazetteError::SourceUnavailable`],
//!   [`GazetteError::TaggerFailure`]): isolated to a single document. Whether
//!   they abort the run or degrade into an empty placeholder record is decided
//!   by the caller's [`FailurePolicy`](crate::pipeline::FailurePolicy).
//! - **Invariant violations** ([`GazetteError::CardinalityMismatch`]): a bug in
//!   the table builder itself. These always abort the run; downstream ordering
//!   and cardinality guarantees depend on them never happening.
//!
//! Filtering by a category that matches nothing is *not* an error anywhere in
//! this crate; it yields an empty result set.

use thiserror::Error;

/// All errors surfaced by the library.
#[derive(Debug, Error)]
pub enum GazetteError {
    /// The document source could not produce a document's text.
    #[error("source unavailable for document `{key}`: {reason}")]
    SourceUnavailable {
        /// Key of the document that could not be read or fetched.
        key: String,
        /// Underlying failure description.
        reason: String,
    },

    /// The entity tagger failed on a document's text.
    #[error("tagger failed on document `{key}`: {reason}")]
    TaggerFailure {
        /// Key of the document the tagger choked on.
        key: String,
        /// Underlying failure description.
        reason: String,
    },

    /// The parallel category/text sequences of a record have unequal lengths.
    ///
    /// This is a fatal programming error, never a recoverable runtime
    /// condition. It aborts the pipeline rather than silently truncating.
    #[error(
        "cardinality mismatch for document `{key}`: {categories} categories vs {texts} texts"
    )]
    CardinalityMismatch {
        /// Key of the offending record.
        key: String,
        /// Length of the category sequence.
        categories: usize,
        /// Length of the text sequence.
        texts: usize,
    },

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Writing an output file failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing output failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GazetteError {
    /// The document key this error is attributable to, if it is a
    /// per-document failure.
    pub fn document_key(&self) -> Option<&str> {
        match self {
            GazetteError::SourceUnavailable { key, .. }
            | GazetteError::TaggerFailure { key, .. }
            | GazetteError::CardinalityMismatch { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether this error may be degraded into a placeholder record under
    /// the skip-with-placeholder failure policy.
    ///
    /// Cardinality mismatches are never recoverable.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            GazetteError::SourceUnavailable { .. } | GazetteError::TaggerFailure { .. }
        )
    }
}
