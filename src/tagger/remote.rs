//! HTTP NER service client with exponential backoff retry logic.
//!
//! This module provides a robust interface for delegating entity recognition
//! to an HTTP service that wraps a pretrained NER model. It includes
//! automatic retry logic with exponential backoff and jitter to handle
//! transient failures gracefully.
//!
//! # Wire Format
//!
//! The service is expected to accept `POST {endpoint}` with a JSON body
//! `{"text": "..."}` and respond with
//! `{"entities": [{"text": "Apple", "label": "ORG"}, ...]}` where `entities`
//! is ordered by position in the input text. Labels are passed through as
//! opaque strings.
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::models::TaggedSpan;
use crate::tagger::{EntityTagger, TagError};

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireEntity {
    text: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    entities: Vec<WireEntity>,
}

/// A tagger backed by an HTTP NER service.
#[derive(Debug, Clone)]
pub struct RemoteTagger {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteTagger {
    /// Create a client for the service at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Wrap this client in the standard retry decorator: 5 attempts,
    /// 1 second base delay.
    pub fn with_retries(self) -> RetryTag<Self> {
        RetryTag::new(self, 5, StdDuration::from_secs(1))
    }
}

impl EntityTagger for RemoteTagger {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TagError> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TagRequest { text })
            .send()
            .await?
            .error_for_status()?;
        let parsed: TagResponse = response.json().await?;
        let dt = t0.elapsed();

        let spans = parsed
            .entities
            .into_iter()
            .map(|e| TaggedSpan::new(e.text, e.label))
            .collect::<Vec<_>>();
        info!(
            elapsed_ms = dt.as_millis() as u128,
            spans = spans.len(),
            "Remote tagger responded"
        );
        Ok(spans)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`EntityTagger`].
///
/// This decorator transparently retries transient failures (rate limiting,
/// network issues, temporary server errors). The delay between retries is:
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryTag<T> {
    /// The underlying tagger to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryTag<T>
where
    T: EntityTagger,
{
    /// Create a new retry wrapper around an existing [`EntityTagger`].
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying tagger to wrap
    /// * `max_retries` - Maximum number of retry attempts (5 recommended)
    /// * `base_delay` - Initial delay between retries (1 second recommended)
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTag")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> EntityTagger for RetryTag<T>
where
    T: EntityTagger,
{
    #[instrument(level = "info", skip_all)]
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TagError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.tag(text).await {
                Ok(spans) => {
                    return Ok(spans);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "tag() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "tag() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times, then succeeds with a fixed span list.
    struct FlakyTagger {
        failures: usize,
        calls: AtomicUsize,
    }

    impl EntityTagger for FlakyTagger {
        async fn tag(&self, _text: &str) -> Result<Vec<TaggedSpan>, TagError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err("transient".into())
            } else {
                Ok(vec![TaggedSpan::new("Apple", "ORG")])
            }
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = FlakyTagger {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let retry = RetryTag::new(flaky, 3, StdDuration::from_millis(1));
        let spans = retry.tag("Apple shipped a product.").await.unwrap();
        assert_eq!(spans, vec![TaggedSpan::new("Apple", "ORG")]);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let flaky = FlakyTagger {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let retry = RetryTag::new(flaky, 2, StdDuration::from_millis(1));
        let result = retry.tag("anything").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_response_parsing() {
        let body = r#"{"entities": [
            {"text": "Apple", "label": "ORG"},
            {"text": "Jane", "label": "PERSON"}
        ]}"#;
        let parsed: TagResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.entities.len(), 2);
        assert_eq!(parsed.entities[0].text, "Apple");
        assert_eq!(parsed.entities[1].label, "PERSON");
    }

    #[test]
    fn test_wire_response_empty_entities() {
        let parsed: TagResponse = serde_json::from_str(r#"{"entities": []}"#).unwrap();
        assert!(parsed.entities.is_empty());
    }
}
