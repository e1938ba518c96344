//! Command-line interface definitions for Entity Gazette.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Exactly one document source must be selected; credentials can be provided
//! via flags or environment variables.

use clap::{ArgGroup, Parser};

/// Command-line arguments for the Entity Gazette application.
///
/// # Examples
///
/// ```sh
/// # Tag a directory of text files with the builtin lexicon tagger
/// entity_gazette --input-dir ./articles -j ./json -m ./markdown
///
/// # Tag news API search hits, delegating to an NER service
/// entity_gazette --query "central bank" --news-api-key YOUR_KEY \
///     --tagger-url http://localhost:8000/tag -j ./json -m ./markdown
///
/// # Show only the places, first ten
/// entity_gazette --feed-url https://example.com/rss.xml \
///     --filter-category GPE --limit 10 -j ./json -m ./markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input_dir", "feed_url", "query"]),
))]
pub struct Cli {
    /// Directory of .txt documents to tag
    #[arg(long)]
    pub input_dir: Option<String>,

    /// RSS feed URL to pull documents from
    #[arg(long)]
    pub feed_url: Option<String>,

    /// News API search query to pull documents from
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output directory for the JSON API file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown file
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News API key (overrides the config file)
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// HTTP NER service endpoint; builtin lexicon tagger when unset
    #[arg(long, env = "TAGGER_URL")]
    pub tagger_url: Option<String>,

    /// Print only rows of this entity category to stdout
    #[arg(long)]
    pub filter_category: Option<String>,

    /// Cap the number of printed rows (with --filter-category)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Record failed documents as empty placeholders instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// How many documents to tag concurrently
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_dir_source() {
        let cli = Cli::parse_from(&[
            "entity_gazette",
            "--input-dir",
            "./articles",
            "--json-output-dir",
            "./json",
            "--markdown-output-dir",
            "./markdown",
        ]);

        assert_eq!(cli.input_dir.as_deref(), Some("./articles"));
        assert_eq!(cli.json_output_dir, "./json");
        assert_eq!(cli.markdown_output_dir, "./markdown");
        assert!(!cli.skip_failed);
        assert_eq!(cli.concurrency, 1);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&[
            "entity_gazette",
            "-q",
            "central bank",
            "-j",
            "/tmp/json",
            "-m",
            "/tmp/markdown",
        ]);

        assert_eq!(cli.query.as_deref(), Some("central bank"));
        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert_eq!(cli.markdown_output_dir, "/tmp/markdown");
    }

    #[test]
    fn test_cli_requires_a_source() {
        let result = Cli::try_parse_from(&[
            "entity_gazette",
            "-j",
            "/tmp/json",
            "-m",
            "/tmp/markdown",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_two_sources() {
        let result = Cli::try_parse_from(&[
            "entity_gazette",
            "--input-dir",
            "./a",
            "--feed-url",
            "https://example.com/rss",
            "-j",
            "/tmp/json",
            "-m",
            "/tmp/markdown",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_filter_and_limit() {
        let cli = Cli::parse_from(&[
            "entity_gazette",
            "--input-dir",
            "./articles",
            "-j",
            "./json",
            "-m",
            "./markdown",
            "--filter-category",
            "GPE",
            "--limit",
            "10",
            "--skip-failed",
            "--concurrency",
            "8",
        ]);

        assert_eq!(cli.filter_category.as_deref(), Some("GPE"));
        assert_eq!(cli.limit, Some(10));
        assert!(cli.skip_failed);
        assert_eq!(cli.concurrency, 8);
    }
}
