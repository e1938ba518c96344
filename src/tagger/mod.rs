//! Entity taggers: the trait and its implementations.
//!
//! A tagger is a pure function from text to an ordered sequence of
//! [`TaggedSpan`]s. This module treats the recognition itself as a black
//! box; what matters to the rest of the crate is the contract:
//!
//! - spans come back in left-to-right document order
//! - trivial or empty input yields an empty sequence, not an error
//! - output is deterministic for a fixed tagger configuration
//!
//! # Implementations
//!
//! - [`remote::RemoteTagger`]: delegates to an HTTP NER service, with
//!   exponential-backoff retries via [`remote::RetryTag`]
//! - [`lexicon::LexiconTagger`]: deterministic offline tagger backed by a
//!   gazetteer and a handful of numeric/date patterns; also the test
//!   fixture family

use std::error::Error;

use crate::models::TaggedSpan;

pub mod lexicon;
pub mod remote;

/// Error type produced by taggers.
///
/// Taggers are external collaborators with heterogeneous failure modes
/// (HTTP errors, payload errors), so the boundary type is deliberately
/// loose; the pipeline attributes it to a document key when it propagates.
pub type TagError = Box<dyn Error + Send + Sync>;

/// Trait for entity taggers.
///
/// Implementors take one document's text and return recognized spans in
/// emission order. Decorators (like retry logic) wrap any implementation.
pub trait EntityTagger {
    /// Tag one document's text.
    ///
    /// # Arguments
    ///
    /// * `text` - The document text to tag
    ///
    /// # Returns
    ///
    /// Recognized spans in left-to-right order, possibly empty, or an error
    /// if the tagger could not process the text at all.
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TagError>;
}
