//! Entity Gazette binary: wire a document source to a tagger, tabulate, and
//! write the outputs.
//!
//! ## Usage
//!
//! ```sh
//! entity_gazette --input-dir ./articles -j ./json -m ./markdown
//! ```
//!
//! The run writes a date/edition-stamped JSON file and a Markdown report,
//! and optionally prints a category-filtered slice of the table to stdout.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use entity_gazette::cli::Cli;
use entity_gazette::config::{self, Config};
use entity_gazette::outputs::{json, markdown};
use entity_gazette::pipeline::{self, FailurePolicy, PipelineOptions, PipelineOutput};
use entity_gazette::sources::{DocumentSource, SourceItem, dir::DirSource, newsapi::NewsApiSource, rss::RssSource};
use entity_gazette::tagger::{lexicon::LexiconTagger, remote::RemoteTagger};
use entity_gazette::utils::{ensure_writable_dir, time_of_day};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("entity_gazette starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, "Parsed CLI arguments");

    // Early check: ensure output dirs are writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    // ---- Load config, apply CLI overrides ----
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    if args.news_api_key.is_some() {
        config.news_api.api_key = args.news_api_key.clone();
    }
    if args.tagger_url.is_some() {
        config.tagger.endpoint = args.tagger_url.clone();
    }

    // ---- Source documents ----
    let items: Vec<SourceItem> = if let Some(input_dir) = &args.input_dir {
        DirSource::new(input_dir).documents().await?
    } else if let Some(feed_url) = &args.feed_url {
        RssSource::new(feed_url).documents().await?
    } else {
        let query = args.query.as_deref().unwrap_or_default();
        let api_key = config.news_api.api_key.clone().ok_or(
            "news API source needs a key: pass --news-api-key, set NEWS_API_KEY, or add it to the config file",
        )?;
        NewsApiSource::new(
            &config.news_api.endpoint,
            api_key,
            query,
            config.news_api.page_size,
        )
        .documents()
        .await?
    };
    info!(count = items.len(), "Documents sourced");

    // ---- Tag and tabulate ----
    let options = PipelineOptions {
        policy: if args.skip_failed {
            FailurePolicy::SkipWithPlaceholder
        } else {
            FailurePolicy::Abort
        },
        concurrency: args.concurrency,
    };

    let output: PipelineOutput = match &config.tagger.endpoint {
        Some(endpoint) => {
            info!(%endpoint, "Using remote tagger");
            let tagger = RemoteTagger::new(endpoint.clone()).with_retries();
            pipeline::tabulate(items, &tagger, &options).await?
        }
        None => {
            info!("Using builtin lexicon tagger");
            let tagger = LexiconTagger::with_defaults();
            pipeline::tabulate(items, &tagger, &options).await?
        }
    };

    if !output.report.is_complete() {
        for failure in &output.report.failures {
            error!(key = %failure.document_key, reason = %failure.reason, "Document failed");
        }
    }

    // ---- Optional category filter to stdout ----
    if let Some(category) = &args.filter_category {
        let rows = output.table.filter_category(category, args.limit);
        info!(category = %category, matches = rows.len(), "Category filter");
        for row in rows {
            println!("{}\t{}\t{}", row.document_key, row.category, row.entity_text);
        }
    }

    // ---- JSON output ----
    match json::write_run(&output, &args.json_output_dir).await {
        Ok(path) => info!(%path, "Wrote JSON API file"),
        Err(e) => {
            error!(error = %e, "Failed to write JSON");
            return Err(e.into());
        }
    }

    // ---- Markdown output ----
    let local_date = Local::now().date_naive().to_string();
    let edition = time_of_day();
    let md = markdown::run_to_markdown(&output, &local_date, &edition);
    let output_markdown_filename = format!(
        "{}/{}_{}.md",
        args.markdown_output_dir, local_date, edition
    );
    info!(path = %output_markdown_filename, "Writing Markdown");
    if let Err(e) = tokio::fs::write(&output_markdown_filename, md).await {
        error!(path = %output_markdown_filename, error = %e, "Failed writing Markdown");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        documents = output.report.documents_total,
        failed = output.report.failures.len(),
        rows = output.table.len(),
        "Execution complete"
    );

    Ok(())
}
