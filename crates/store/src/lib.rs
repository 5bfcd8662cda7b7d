//! Vector-store collaborator boundary.
//!
//! The similarity engine (and its embedding computation) lives behind the
//! [`VectorStore`] trait: ingestion hands it chunk text plus metadata, the
//! query pipeline hands it query text and a result count. Two backends ship:
//! an in-memory store for tests and development, and a Chroma HTTP client.

mod chroma;
mod memory;

pub use chroma::ChromaStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sift_core::label::ContentLabel;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store API error: {status} — {body}")]
    Api { status: u16, body: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to decode store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether the caller may retry: transport failures and 5xx responses
    /// are transient; 4xx and decode failures are not. Distinct from a
    /// legitimate zero-match result, which is `Ok` with an empty list.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Http(_) | StoreError::Unavailable(_) => true,
            StoreError::Api { status, .. } => *status >= 500,
            StoreError::Decode(_) => false,
        }
    }
}

// ── Chunk records ─────────────────────────────────────────────

/// Metadata stored alongside each chunk, returned verbatim on query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub doc_id: String,
    pub seq: usize,
    pub start: usize,
    pub end: usize,
    pub content_type: ContentLabel,
    pub strategy: String,
}

/// A chunk on its way into the store. `id` is deterministic per
/// (document, sequence) so re-ingestion overwrites instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkUpsert {
    pub id: String,
    pub text: String,
    pub meta: ChunkMeta,
}

/// A chunk coming back from a similarity query, ranked by the store's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub meta: ChunkMeta,
    pub score: f64,
}

// ── Collaborator trait ────────────────────────────────────────

/// The storage collaborator. Embeddings are computed on the other side of
/// this boundary; this crate only ever sees text.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or overwrite chunks by id.
    async fn upsert(&self, chunks: &[ChunkUpsert]) -> Result<(), StoreError>;

    /// Remove every chunk belonging to a document. Returns the number
    /// removed (0 when the document was never ingested).
    async fn delete_document(&self, doc_id: &str) -> Result<usize, StoreError>;

    /// Similarity search. `bias` is a soft ranking boost for chunks whose
    /// content type matches — never a filter, so a wrong bias cannot
    /// produce a zero-result outcome on its own.
    async fn query(
        &self,
        text: &str,
        limit: usize,
        bias: Option<ContentLabel>,
    ) -> Result<Vec<ScoredChunk>, StoreError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_classification() {
        assert!(StoreError::Unavailable("down".into()).is_retryable());
        assert!(StoreError::Api { status: 503, body: String::new() }.is_retryable());
        assert!(!StoreError::Api { status: 400, body: String::new() }.is_retryable());
        assert!(!StoreError::Decode("bad json".into()).is_retryable());
    }
}
