//! News search API document source.
//!
//! Queries a newsapi.org-style `/v2/everything` endpoint and turns each hit
//! into one document: the article URL as the key, and the title plus body
//! (content when present, description otherwise) stripped of embedded HTML
//! as the text.
//!
//! The API credential is injected through [`NewsApiSource::new`], typically
//! from the config file or an environment variable; it is never read from an
//! ambient global.

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::GazetteError;
use crate::models::Document;
use crate::sources::{DocumentSource, SourceItem};
use crate::utils::html_to_text;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<ApiArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
}

/// A document source backed by a news search API.
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    endpoint: String,
    api_key: String,
    query: String,
    page_size: usize,
    client: reqwest::Client,
}

impl NewsApiSource {
    /// Create a source for `query` against the API at `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base search URL, e.g. `https://newsapi.org/v2/everything`
    /// * `api_key` - The injected API credential
    /// * `query` - Search phrase
    /// * `page_size` - Number of articles to request
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        query: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            query: query.into(),
            page_size,
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}?q={}&pageSize={}&apiKey={}",
            self.endpoint,
            urlencoding::encode(&self.query),
            self.page_size,
            urlencoding::encode(&self.api_key)
        )
    }
}

impl DocumentSource for NewsApiSource {
    #[instrument(level = "info", skip_all, fields(query = %self.query))]
    async fn documents(&self) -> Result<Vec<SourceItem>, GazetteError> {
        let url = self.request_url();
        let response: ApiResponse = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GazetteError::Config(format!("news API request failed: {e}")))?
            .json()
            .await
            .map_err(|e| GazetteError::Config(format!("news API returned malformed JSON: {e}")))?;

        if response.status != "ok" {
            return Err(GazetteError::Config(format!(
                "news API returned status `{}`: {}",
                response.status,
                response.message.unwrap_or_default()
            )));
        }

        let items = response
            .articles
            .into_iter()
            .enumerate()
            .map(|(i, article)| article_to_item(i, article))
            .collect::<Vec<_>>();

        info!(count = items.len(), "Indexed articles from news API");
        Ok(items)
    }
}

fn article_to_item(index: usize, article: ApiArticle) -> SourceItem {
    let key = match article.url {
        Some(url) if !url.is_empty() => url,
        // A hit with no URL has no usable stable key.
        _ => {
            warn!(index, "News API article has no URL; reporting as failed");
            return SourceItem::Failed {
                key: format!("article-{index}"),
                reason: "article has no url field".to_string(),
            };
        }
    };

    let body = article
        .content
        .filter(|c| !c.is_empty())
        .or(article.description)
        .unwrap_or_default();
    let mut text = html_to_text(article.title.as_deref().unwrap_or(""));
    let body = html_to_text(&body);
    if !text.is_empty() && !body.is_empty() {
        text.push_str(". ");
    }
    text.push_str(&body);

    SourceItem::Ok(Document { key, text })
}
