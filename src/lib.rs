//! # Entity Gazette
//!
//! A news-entity tabulation pipeline: pull text documents from a source,
//! run a Named Entity Recognition tagger over each, and flatten the
//! per-document entity lists into a long-format table (one row per entity
//! occurrence) that can be filtered by category.
//!
//! ## Architecture
//!
//! The pipeline is a single forward pass:
//! 1. **Sourcing**: a [`sources::DocumentSource`] produces an ordered,
//!    stably-keyed document collection (directory, news API, or RSS feed)
//! 2. **Tagging**: a [`tagger::EntityTagger`] turns each document's text
//!    into an ordered span sequence (HTTP NER service or builtin lexicon)
//! 3. **Accumulation**: one [`DocumentEntityRecord`] per document, in input
//!    order, zero-entity documents included
//! 4. **Explode**: the records are flattened into an [`EntityTable`] of
//!    [`FlattenedEntityRow`]s, preserving document-then-emission order
//!
//! ## Example
//!
//! ```no_run
//! use entity_gazette::models::Document;
//! use entity_gazette::pipeline::{self, PipelineOptions};
//! use entity_gazette::sources::StaticSource;
//! use entity_gazette::tagger::lexicon::LexiconTagger;
//!
//! # async fn demo() -> Result<(), entity_gazette::error::GazetteError> {
//! let source = StaticSource::new(vec![Document {
//!     key: "doc1".to_string(),
//!     text: "Apple opened an office in Paris.".to_string(),
//! }]);
//! let tagger = LexiconTagger::with_defaults();
//! let output = pipeline::run(&source, &tagger, &PipelineOptions::default()).await?;
//! for row in output.table.filter_category("GPE", None) {
//!     println!("{} -> {}", row.document_key, row.entity_text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod sources;
pub mod table;
pub mod tagger;
pub mod utils;

pub use error::GazetteError;
pub use models::{Document, DocumentEntityRecord, FlattenedEntityRow, TaggedSpan};
pub use table::EntityTable;
