//! Embeddings client — the single point of entry for embedding-vector calls.
//!
//! Talks to OpenAI-compatible `/embeddings` endpoints. The session store
//! depends on the `Embedder` trait rather than this client so tests can swap
//! in a deterministic stub.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding count mismatch: got {got} vectors for {expected} inputs")]
    CountMismatch { got: usize, expected: usize },

    #[error("Gave up after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

/// Contract with the external embedding service: given text, return one
/// fixed-dimension vector per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Production embedder for OpenAI-compatible endpoints.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model,
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    /// Embeds a batch of strings. Retries on 429 and 5xx with exponential
    /// backoff; response entries are re-sorted by index before returning.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request_body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("embeddings API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let mut parsed: EmbeddingResponse = response.json().await?;

            if parsed.data.len() != inputs.len() {
                return Err(EmbeddingError::CountMismatch {
                    got: parsed.data.len(),
                    expected: inputs.len(),
                });
            }

            parsed.data.sort_by_key(|entry| entry.index);

            debug!("embedded {} inputs with model {}", inputs.len(), self.model);

            return Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect());
        }

        Err(last_error.unwrap_or(EmbeddingError::RetriesExhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
