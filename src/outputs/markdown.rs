//! Markdown rendering of a pipeline run.
//!
//! Produces a human-readable document: run summary, per-category counts,
//! and the full flattened entity table. The row table keeps
//! document-then-emission order; nothing is re-sorted for display.

use crate::pipeline::PipelineOutput;

/// Render a full run as a Markdown document.
pub fn run_to_markdown(output: &PipelineOutput, title_date: &str, edition: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Entities: {title_date} ({edition})\n\n"));
    md.push_str(&format!(
        "{} documents, {} tagged, {} entity occurrences.\n\n",
        output.report.documents_total,
        output.report.documents_tagged,
        output.table.len()
    ));

    if !output.report.failures.is_empty() {
        md.push_str("## Failed documents\n\n");
        for failure in &output.report.failures {
            md.push_str(&format!(
                "- `{}`: {}\n",
                failure.document_key, failure.reason
            ));
        }
        md.push('\n');
    }

    let counts = output.table.category_counts();
    if !counts.is_empty() {
        md.push_str("## Categories\n\n");
        for (category, count) in counts {
            md.push_str(&format!("- {category}: {count}\n"));
        }
        md.push('\n');
    }

    md.push_str("## Entities\n\n");
    md.push_str("| document_key | Entity_type | Entity_identified |\n");
    md.push_str("|---|---|---|\n");
    for row in output.table.rows() {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&row.document_key),
            escape_cell(&row.category),
            escape_cell(&row.entity_text)
        ));
    }

    md
}

/// Keep literal pipes and line breaks in cell text from breaking the table.
///
/// Remote taggers echo span text verbatim, so a cell can carry anything the
/// source document did.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentEntityRecord, DocumentFailure, RunReport, TaggedSpan};
    use crate::table::EntityTable;

    fn sample_output(failures: Vec<DocumentFailure>) -> PipelineOutput {
        let records = vec![DocumentEntityRecord::from_spans(
            "doc1",
            vec![
                TaggedSpan::new("Apple", "ORG"),
                TaggedSpan::new("Jane", "PERSON"),
                TaggedSpan::new("Paris", "GPE"),
            ],
        )];
        let table = EntityTable::from_records(&records);
        let tagged = 1 - failures.len().min(1);
        PipelineOutput {
            records,
            table,
            report: RunReport {
                documents_total: 1,
                documents_tagged: tagged,
                failures,
            },
        }
    }

    #[test]
    fn test_markdown_contains_rows_in_order() {
        let md = run_to_markdown(&sample_output(vec![]), "2025-05-06", "morning");
        assert!(md.contains("# Entities: 2025-05-06 (morning)"));
        let apple = md.find("| doc1 | ORG | Apple |").unwrap();
        let jane = md.find("| doc1 | PERSON | Jane |").unwrap();
        let paris = md.find("| doc1 | GPE | Paris |").unwrap();
        assert!(apple < jane && jane < paris);
    }

    #[test]
    fn test_markdown_counts_section() {
        let md = run_to_markdown(&sample_output(vec![]), "2025-05-06", "morning");
        assert!(md.contains("- ORG: 1"));
        assert!(md.contains("- PERSON: 1"));
        assert!(md.contains("- GPE: 1"));
    }

    #[test]
    fn test_markdown_reports_failures() {
        let md = run_to_markdown(
            &sample_output(vec![DocumentFailure {
                document_key: "bad.txt".to_string(),
                reason: "tagger failed".to_string(),
            }]),
            "2025-05-06",
            "evening",
        );
        assert!(md.contains("## Failed documents"));
        assert!(md.contains("`bad.txt`: tagger failed"));
    }

    #[test]
    fn test_markdown_no_failure_section_on_clean_run() {
        let md = run_to_markdown(&sample_output(vec![]), "2025-05-06", "morning");
        assert!(!md.contains("## Failed documents"));
    }

    #[test]
    fn test_pipe_in_entity_text_is_escaped() {
        let records = vec![DocumentEntityRecord::from_spans(
            "doc1",
            vec![TaggedSpan::new("A|B", "ORG")],
        )];
        let table = EntityTable::from_records(&records);
        let output = PipelineOutput {
            records,
            table,
            report: RunReport {
                documents_total: 1,
                documents_tagged: 1,
                failures: vec![],
            },
        };
        let md = run_to_markdown(&output, "2025-05-06", "morning");
        assert!(md.contains("A\\|B"));
    }

    #[test]
    fn test_newline_in_entity_text_stays_on_one_row() {
        let records = vec![DocumentEntityRecord::from_spans(
            "doc1",
            vec![TaggedSpan::new("Acme\nCorp", "ORG")],
        )];
        let table = EntityTable::from_records(&records);
        let output = PipelineOutput {
            records,
            table,
            report: RunReport {
                documents_total: 1,
                documents_tagged: 1,
                failures: vec![],
            },
        };
        let md = run_to_markdown(&output, "2025-05-06", "morning");
        assert!(md.contains("| doc1 | ORG | Acme Corp |"));
    }
}
