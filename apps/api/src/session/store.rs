//! Session registry — maps each session identifier to exactly one in-memory
//! vector index built from that session's job posting.
//!
//! Indexing and search delegate to the embedding service; the registry's own
//! responsibility is lifecycle: clear-before-write on (re)creation, fallback
//! on miss, idempotent teardown.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::loader::load_document;
use crate::session::chunker::{split_text, CHUNK_OVERLAP, CHUNK_SIZE};

/// Returned by `retrieve` whenever a session has no usable index.
pub const NO_CONTEXT_FALLBACK: &str = "No job description found in session context.";

/// Default number of chunks returned by similarity search.
pub const DEFAULT_TOP_K: usize = 4;

struct IndexedChunk {
    text: String,
    embedding: Vec<f32>,
}

/// One session's index: the posting's chunks with their embedding vectors.
struct SessionIndex {
    chunks: Vec<IndexedChunk>,
}

pub struct SessionRegistry {
    embedder: Arc<dyn Embedder>,
    sessions: RwLock<HashMap<String, SessionIndex>>,
}

impl SessionRegistry {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a fresh index for `session_id` from the job posting at
    /// `job_file_path`, replacing any existing index for the same identifier.
    /// Returns the number of chunks indexed.
    ///
    /// The previous index is removed BEFORE the new one is built: stale
    /// chunks from an earlier posting must never mix with the new content,
    /// even when the rebuild fails partway.
    pub async fn create_or_reset(
        &self,
        session_id: &str,
        job_file_path: &Path,
    ) -> Result<usize, AppError> {
        if session_id.trim().is_empty() {
            return Err(AppError::Validation("session_id is required".to_string()));
        }

        self.sessions.write().await.remove(session_id);

        let job_text = load_document(job_file_path)?;
        let chunks = split_text(&job_text, CHUNK_SIZE, CHUNK_OVERLAP);
        if chunks.is_empty() {
            return Err(AppError::Validation(format!(
                "job posting {} produced no text content",
                job_file_path.display()
            )));
        }

        let embeddings = self
            .embedder
            .embed(&chunks)
            .await
            .map_err(|e| AppError::Embedding(format!("failed to embed job posting: {e}")))?;

        let index = SessionIndex {
            chunks: chunks
                .into_iter()
                .zip(embeddings)
                .map(|(text, embedding)| IndexedChunk { text, embedding })
                .collect(),
        };
        let count = index.chunks.len();

        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), index);

        info!(session_id, chunks = count, "session index created");
        Ok(count)
    }

    /// Similarity search over the session's index. Returns the `top_k` most
    /// similar chunk texts joined by blank lines, in descending relevance
    /// order.
    ///
    /// Never errors past this boundary: a missing session, a failed query
    /// embedding, or an empty result all collapse to the fixed fallback
    /// string so the pipeline can proceed with "no context found".
    pub async fn retrieve(&self, session_id: &str, query: &str, top_k: usize) -> String {
        if !self.sessions.read().await.contains_key(session_id) {
            return NO_CONTEXT_FALLBACK.to_string();
        }

        let query_embedding = match self.embedder.embed(&[query.to_string()]).await {
            Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
            Ok(_) => {
                warn!(session_id, "embedder returned no vector for query");
                return NO_CONTEXT_FALLBACK.to_string();
            }
            Err(e) => {
                warn!(session_id, error = %e, "query embedding failed");
                return NO_CONTEXT_FALLBACK.to_string();
            }
        };

        let sessions = self.sessions.read().await;
        // The session may have been ended while the query was embedding.
        let Some(index) = sessions.get(session_id) else {
            return NO_CONTEXT_FALLBACK.to_string();
        };

        let mut scored: Vec<(f32, &str)> = index
            .chunks
            .iter()
            .map(|chunk| {
                (
                    cosine_similarity(&query_embedding, &chunk.embedding),
                    chunk.text.as_str(),
                )
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let hits: Vec<&str> = scored.iter().take(top_k).map(|(_, text)| *text).collect();
        if hits.is_empty() {
            return NO_CONTEXT_FALLBACK.to_string();
        }

        hits.join("\n\n")
    }

    /// Removes the session's index. Idempotent: ending a session that was
    /// never created is a no-op. Returns whether an index was removed.
    pub async fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id, "session index removed");
        }
        removed
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingError;
    use async_trait::async_trait;
    use std::io::Write;

    /// Deterministic embedder: a 26-dim letter-frequency histogram, so texts
    /// sharing words land close together without any network call.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(inputs
                .iter()
                .map(|input| {
                    let mut histogram = vec![0.0f32; 26];
                    for c in input.chars().filter(|c| c.is_ascii_alphabetic()) {
                        let slot = (c.to_ascii_lowercase() as usize) - ('a' as usize);
                        histogram[slot] += 1.0;
                    }
                    histogram
                })
                .collect())
        }
    }

    /// Embedder that always fails, for exercising the fallback path.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::RetriesExhausted { retries: 3 })
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(StubEmbedder))
    }

    fn job_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[tokio::test]
    async fn test_create_then_retrieve_returns_indexed_content() {
        let registry = registry();
        let file = job_file("Data engineer role. Required skills: python and sql.");

        registry.create_or_reset("s1", file.path()).await.unwrap();
        let context = registry.retrieve("s1", "python sql skills", 4).await;

        assert_ne!(context, NO_CONTEXT_FALLBACK);
        assert!(context.contains("python"));
    }

    #[tokio::test]
    async fn test_retrieve_without_session_returns_fallback() {
        let registry = registry();
        let context = registry.retrieve("never-created", "anything", 4).await;
        assert_eq!(context, NO_CONTEXT_FALLBACK);
    }

    #[tokio::test]
    async fn test_end_then_retrieve_returns_fallback() {
        let registry = registry();
        let file = job_file("Backend role requiring rust.");

        registry.create_or_reset("s1", file.path()).await.unwrap();
        assert!(registry.end("s1").await);

        let context = registry.retrieve("s1", "rust", 4).await;
        assert_eq!(context, NO_CONTEXT_FALLBACK);
    }

    #[tokio::test]
    async fn test_end_unknown_session_is_noop() {
        let registry = registry();
        assert!(!registry.end("ghost").await);
        assert!(!registry.end("ghost").await);
    }

    #[tokio::test]
    async fn test_recreate_replaces_previous_index() {
        let registry = registry();
        let first = job_file("Frontend position: javascript and react only.");
        let second = job_file("Database admin: postgres tuning and backups.");

        registry.create_or_reset("s1", first.path()).await.unwrap();
        registry.create_or_reset("s1", second.path()).await.unwrap();

        // Ask for far more chunks than exist so the full index comes back.
        let context = registry.retrieve("s1", "postgres", 100).await;
        assert!(context.contains("postgres"));
        assert!(!context.contains("javascript"));
    }

    #[tokio::test]
    async fn test_failed_recreate_clears_previous_index() {
        let registry = registry();
        let file = job_file("Original posting content.");

        registry.create_or_reset("s1", file.path()).await.unwrap();
        let err = registry
            .create_or_reset("s1", Path::new("/missing/posting.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Clear-before-write: the stale index must be gone, not resurrected.
        let context = registry.retrieve("s1", "original", 4).await;
        assert_eq!(context, NO_CONTEXT_FALLBACK);
    }

    #[tokio::test]
    async fn test_empty_job_file_is_rejected() {
        let registry = registry();
        let file = job_file("   \n  ");

        let err = registry.create_or_reset("s1", file.path()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_session_id_is_rejected() {
        let registry = registry();
        let file = job_file("content");

        let err = registry.create_or_reset("  ", file.path()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_embedding_failure_falls_back() {
        // Index seeded directly so only the query-time embedding fails.
        let failing = SessionRegistry {
            embedder: Arc::new(FailingEmbedder),
            sessions: RwLock::new(HashMap::new()),
        };
        failing.sessions.write().await.insert(
            "s1".to_string(),
            SessionIndex {
                chunks: vec![IndexedChunk {
                    text: "chunk".to_string(),
                    embedding: vec![1.0; 26],
                }],
            },
        );

        let context = failing.retrieve("s1", "query", 4).await;
        assert_eq!(context, NO_CONTEXT_FALLBACK);
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
