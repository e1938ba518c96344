//! Utility functions for time classification, HTML cleaning, and file system
//! checks.
//!
//! This module provides helper functions used throughout the application:
//! - Time classification for edition naming in output paths
//! - HTML-to-text stripping for API payloads and feed descriptions
//! - String truncation for logging
//! - File system validation for output directories

use chrono::{Local, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::GazetteError;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Classify current time into morning, afternoon, or evening.
///
/// Used to name the output "edition" for a run. The boundaries are:
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
#[instrument]
pub fn time_of_day() -> String {
    let morning_low = NaiveTime::from_hms_opt(0, 00, 0).unwrap();
    let morning_high = NaiveTime::from_hms_opt(8, 00, 0).unwrap();
    let afternoon_high = NaiveTime::from_hms_opt(16, 00, 0).unwrap();

    let tod = Local::now().time();
    let which = if (tod >= morning_low) && (tod < morning_high) {
        "morning"
    } else if tod < afternoon_high {
        "afternoon"
    } else {
        "evening"
    };
    tracing::debug!(%tod, %which, "Computed time_of_day");
    which.to_string()
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Strip HTML markup from a fragment, returning its visible text.
///
/// News API payloads and RSS descriptions frequently embed markup in what is
/// nominally a text field. Tag soup is tolerated; the result has its
/// whitespace normalized so taggers see clean prose.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(html_to_text("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn html_to_text(html: &str) -> String {
    // Text nodes are concatenated as-is; inline elements like <b> split a
    // sentence into adjacent nodes and joining with a separator would put a
    // space before the punctuation that follows them.
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();
    normalize_whitespace(&text)
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), GazetteError> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
