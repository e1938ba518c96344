//! JSON output generation for the API.
//!
//! Serializes a full pipeline run (the per-document records, the flattened
//! rows, and the run report) to a date-stamped JSON file.
//!
//! # Output Structure
//!
//! Files are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use chrono::Local;
use serde::Serialize;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::GazetteError;
use crate::models::{DocumentEntityRecord, FlattenedEntityRow, RunReport};
use crate::pipeline::PipelineOutput;
use crate::utils::time_of_day;

/// Serialized shape of one run.
#[derive(Debug, Serialize)]
struct RunDump<'a> {
    local_date: String,
    time_of_day: String,
    local_time: String,
    report: &'a RunReport,
    records: &'a [DocumentEntityRecord],
    rows: &'a [FlattenedEntityRow],
}

/// Write a pipeline run to `{json_output_dir}/{date}/{time_of_day}.json`.
///
/// Creates the necessary directory structure, then writes the serialized
/// run. Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_run(
    output: &PipelineOutput,
    json_output_dir: &str,
) -> Result<String, GazetteError> {
    let dump = RunDump {
        local_date: Local::now().date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: Local::now().time().to_string(),
        report: &output.report,
        records: &output.records,
        rows: output.table.rows(),
    };
    let json = serde_json::to_string(&dump)?;

    let full_json_dir = format!("{}/{}", json_output_dir, dump.local_date);
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/{}.json", full_json_dir, dump.time_of_day);
    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON API file");

    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaggedSpan;
    use crate::table::EntityTable;

    fn sample_output() -> PipelineOutput {
        let records = vec![
            DocumentEntityRecord::from_spans(
                "doc1",
                vec![TaggedSpan::new("Apple", "ORG"), TaggedSpan::new("Paris", "GPE")],
            ),
            DocumentEntityRecord::from_spans("doc2", vec![]),
        ];
        let table = EntityTable::from_records(&records);
        PipelineOutput {
            records,
            table,
            report: RunReport {
                documents_total: 2,
                documents_tagged: 2,
                failures: vec![],
            },
        }
    }

    #[tokio::test]
    async fn test_write_run_creates_dated_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();

        let path = write_run(&sample_output(), dir).await.unwrap();
        assert!(path.starts_with(dir));
        assert!(path.ends_with(".json"));

        let body = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["report"]["documents_total"], 2);
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        // Zero-entity doc2 has a record but no rows.
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["Entity_type"], "ORG");
        assert_eq!(value["rows"][1]["Entity_identified"], "Paris");
    }

    #[tokio::test]
    async fn test_write_run_to_unwritable_dir_fails() {
        let result = write_run(&sample_output(), "/proc/no-such-place").await;
        assert!(result.is_err());
    }
}
