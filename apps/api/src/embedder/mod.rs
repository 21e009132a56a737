//! Embedder — the single point of entry for all embedding-model calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model service directly.
//! The matcher core only sees the `Embedder` trait, so the backend can be
//! swapped (hosted model service, in-process model, test mock) without
//! touching corpus, index, or ranking code.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model service returned {got} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("Embedding call timed out after {0:?}")]
    Timeout(Duration),
}

/// Converts text into fixed-length vectors. Two vectors are comparable only
/// if produced by the same implementation instance; callers must not mix
/// vectors across embedders.
///
/// `encode_batch` must be order-preserving and batch-size-invariant: the
/// same text yields the same vector regardless of which batch it lands in.
/// Safe to invoke concurrently for independent inputs.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding client backed by a dedicated model service (the sentence
/// encoder runs in its own process; this posts batches to its `/embed`
/// endpoint). Retries 429 and 5xx responses with exponential backoff.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpEmbedder {
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Result<Self, EmbedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
            model,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request_body = EmbedRequest {
            model: &self.model,
            texts,
        };

        let mut last_error: Option<EmbedError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "embed call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbedError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("model service returned {}: {}", status, body);
                last_error = Some(EmbedError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbedError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: EmbedResponse = response.json().await?;

            if parsed.embeddings.len() != texts.len() {
                return Err(EmbedError::CountMismatch {
                    expected: texts.len(),
                    got: parsed.embeddings.len(),
                });
            }

            debug!(
                "embedded batch of {} (dim {})",
                texts.len(),
                parsed.embeddings.first().map(Vec::len).unwrap_or(0)
            );

            return Ok(parsed.embeddings);
        }

        Err(last_error.unwrap_or(EmbedError::Api {
            status: 0,
            message: "retries exhausted".to_string(),
        }))
    }
}

#[cfg(test)]
pub mod testutil {
    //! Deterministic embedder for tests: each vector is the count of
    //! vocabulary terms in the lowercased input, so texts sharing terms
    //! score high cosine similarity and batch layout cannot matter.

    use super::{EmbedError, Embedder};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct KeywordEmbedder {
        vocab: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl KeywordEmbedder {
        pub fn new(vocab: Vec<&'static str>) -> Self {
            Self {
                vocab,
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of encode_batch invocations (for short-circuit assertions).
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn encode_one(&self, text: &str) -> Vec<f32> {
            let lower = text.to_lowercase();
            self.vocab
                .iter()
                .map(|term| lower.matches(term).count() as f32)
                .collect()
        }
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| self.encode_one(t)).collect())
        }
    }

    /// Embedder that always fails, for build/query error paths.
    pub struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Err(EmbedError::Api {
                status: 500,
                message: "model unavailable".to_string(),
            })
        }
    }
}
