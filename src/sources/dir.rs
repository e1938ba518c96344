//! Directory-backed document source.
//!
//! Reads every `.txt` file in a directory, one document per file, with the
//! filename as the document key. Files are sorted by name before reading:
//! directory traversal order is filesystem-dependent and would make document
//! ordering (and therefore row ordering) nondeterministic across machines.

use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::GazetteError;
use crate::models::Document;
use crate::sources::{DocumentSource, SourceItem};

/// A document source backed by a directory of `.txt` files.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for DirSource {
    #[instrument(level = "info", skip_all, fields(dir = %self.dir.display()))]
    async fn documents(&self) -> Result<Vec<SourceItem>, GazetteError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            GazetteError::Config(format!(
                "cannot read input directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("txt") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        // Deterministic document ordering regardless of traversal order.
        names.sort();

        let mut items = Vec::with_capacity(names.len());
        for name in names {
            let path = self.dir.join(&name);
            match fs::read_to_string(&path).await {
                Ok(text) => items.push(SourceItem::Ok(Document { key: name, text })),
                Err(e) => {
                    warn!(key = %name, error = %e, "Failed to read document file");
                    items.push(SourceItem::Failed {
                        key: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(count = items.len(), "Indexed documents from directory");
        Ok(items)
    }
}
