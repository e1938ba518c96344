//! Configuration loading.
//!
//! Settings live in a YAML file and cover the two external collaborators:
//! the news API (endpoint, credential, page size) and the tagger service
//! endpoint. The credential is carried inside the config object and handed
//! to the source at construction time; nothing in the crate reads it from a
//! global.
//!
//! CLI flags and environment variables override file values in `main`.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

use crate::error::GazetteError;

fn default_endpoint() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_page_size() -> usize {
    25
}

/// News API collaborator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsApiConfig {
    /// Search endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API credential. Can also come from `--news-api-key` / `NEWS_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Number of articles to request per query.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            page_size: default_page_size(),
        }
    }
}

/// Tagger collaborator settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaggerConfig {
    /// HTTP NER service endpoint. When absent, the builtin lexicon tagger
    /// is used.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub news_api: NewsApiConfig,
    #[serde(default)]
    pub tagger: TaggerConfig,
}

/// Load configuration from a YAML file.
pub fn load_config(path: &str) -> Result<Config, GazetteError> {
    let body = fs::read_to_string(path)
        .map_err(|e| GazetteError::Config(format!("cannot read config {path}: {e}")))?;
    let config: Config = serde_yaml::from_str(&body)
        .map_err(|e| GazetteError::Config(format!("cannot parse config {path}: {e}")))?;
    info!(path, "Loaded configuration");
    Ok(config)
}
