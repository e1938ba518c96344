//! Pipeline orchestration: source → tagger → entity table.
//!
//! A run is a single forward pass over the source's document collection. For
//! each document the tagger is invoked and its span sequence is projected
//! into a [`DocumentEntityRecord`]; the ordered record list is then exploded
//! into the flat [`EntityTable`]. One record per input document, in input
//! order, always, including documents that yielded zero spans.
//!
//! # Failure policy
//!
//! Per-document failures (an unreadable source item, a tagger error) are
//! handled according to the caller's [`FailurePolicy`]:
//!
//! - [`FailurePolicy::Abort`]: the first failure stops the run, attributed
//!   to the failing document key.
//! - [`FailurePolicy::SkipWithPlaceholder`]: the failing document gets an
//!   empty placeholder record (keeping the one-record-per-document
//!   invariant) and is named in the [`RunReport`]. Other documents are
//!   unaffected. Documents are never silently dropped.
//!
//! # Concurrency
//!
//! Tagging is sequential by default. `concurrency > 1` tags that many
//! documents at a time; the buffered stream yields results in input order,
//! so record ordering is identical to a sequential run.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, instrument, warn};

use crate::error::GazetteError;
use crate::models::{DocumentEntityRecord, DocumentFailure, RunReport};
use crate::sources::{DocumentSource, SourceItem};
use crate::table::EntityTable;
use crate::tagger::EntityTagger;
use crate::utils::truncate_for_log;

/// What to do when a single document cannot be sourced or tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run at the first failure, naming the document key.
    #[default]
    Abort,
    /// Record an empty placeholder for the failed document, log it, name it
    /// in the run report, and keep going.
    SkipWithPlaceholder,
}

/// Knobs for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Per-document failure handling.
    pub policy: FailurePolicy,
    /// How many documents to tag at a time. `1` means strictly sequential.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::default(),
            concurrency: 1,
        }
    }
}

/// Everything a run produces: the per-document records, the flattened
/// table, and the report naming any failed documents.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One record per input document, in input order.
    pub records: Vec<DocumentEntityRecord>,
    /// The exploded long-format table.
    pub table: EntityTable,
    /// Totals and failures for the run.
    pub report: RunReport,
}

/// Run the full pipeline: pull documents from `source`, tag each, and
/// flatten into a table.
#[instrument(level = "info", skip_all)]
pub async fn run<S, T>(
    source: &S,
    tagger: &T,
    options: &PipelineOptions,
) -> Result<PipelineOutput, GazetteError>
where
    S: DocumentSource,
    T: EntityTagger,
{
    let items = source.documents().await?;
    info!(count = items.len(), "Source produced documents");
    tabulate(items, tagger, options).await
}

/// Tag an already-sourced item collection and flatten it into a table.
///
/// This is [`run`] minus the source call, for callers that have the items in
/// hand.
pub async fn tabulate<T>(
    items: Vec<SourceItem>,
    tagger: &T,
    options: &PipelineOptions,
) -> Result<PipelineOutput, GazetteError>
where
    T: EntityTagger,
{
    let (records, failures) = accumulate(items, tagger, options).await?;

    let report = RunReport {
        documents_total: records.len(),
        documents_tagged: records.len() - failures.len(),
        failures,
    };
    let table = EntityTable::from_records(&records);
    info!(
        documents = report.documents_total,
        tagged = report.documents_tagged,
        failed = report.failures.len(),
        rows = table.len(),
        "Pipeline run complete"
    );

    Ok(PipelineOutput {
        records,
        table,
        report,
    })
}

/// The accumulation phase: one [`DocumentEntityRecord`] per source item, in
/// input order, plus the failures that were degraded to placeholders.
///
/// Failed items produce an `Err` under [`FailurePolicy::Abort`]; under
/// [`FailurePolicy::SkipWithPlaceholder`] they produce an empty record and a
/// report entry, so the returned record list always has exactly one entry
/// per input item.
#[instrument(level = "info", skip_all, fields(items = items.len(), concurrency = options.concurrency))]
pub async fn accumulate<T>(
    items: Vec<SourceItem>,
    tagger: &T,
    options: &PipelineOptions,
) -> Result<(Vec<DocumentEntityRecord>, Vec<DocumentFailure>), GazetteError>
where
    T: EntityTagger,
{
    let policy = options.policy;
    let concurrency = options.concurrency.max(1);

    // buffered() yields in input order, so parallel tagging needs no
    // explicit re-sequencing step.
    let outcomes: Vec<(DocumentEntityRecord, Option<DocumentFailure>)> = stream::iter(items)
        .map(|item| async move {
            match item {
                SourceItem::Ok(doc) => match tagger.tag(&doc.text).await {
                    Ok(spans) => Ok((DocumentEntityRecord::from_spans(doc.key, spans), None)),
                    Err(e) => {
                        warn!(
                            key = %doc.key,
                            text = %truncate_for_log(&doc.text, 160),
                            error = %e,
                            "Tagger returned an error"
                        );
                        degrade(
                            policy,
                            GazetteError::TaggerFailure {
                                key: doc.key,
                                reason: e.to_string(),
                            },
                        )
                    }
                },
                SourceItem::Failed { key, reason } => {
                    degrade(policy, GazetteError::SourceUnavailable { key, reason })
                }
            }
        })
        .buffered(concurrency)
        .try_collect()
        .await?;

    let mut records = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (record, failure) in outcomes {
        records.push(record);
        if let Some(failure) = failure {
            failures.push(failure);
        }
    }
    Ok((records, failures))
}

/// Apply the failure policy to a per-document error: abort, or degrade into
/// a placeholder record plus a report entry.
fn degrade(
    policy: FailurePolicy,
    error: GazetteError,
) -> Result<(DocumentEntityRecord, Option<DocumentFailure>), GazetteError> {
    match policy {
        FailurePolicy::Abort => Err(error),
        FailurePolicy::SkipWithPlaceholder => {
            let key = error
                .document_key()
                .unwrap_or_default()
                .to_string();
            warn!(%key, error = %error, "Document failed; recording placeholder");
            Ok((
                DocumentEntityRecord::placeholder(&key),
                Some(DocumentFailure {
                    document_key: key,
                    reason: error.to_string(),
                }),
            ))
        }
    }
}
