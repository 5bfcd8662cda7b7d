//! In-memory store for tests and development.
//!
//! Keeps chunks in a map and ranks queries by lexical token overlap.
//! Embedding-based similarity belongs to the real collaborator; this
//! backend only needs to be deterministic and order-stable so pipeline
//! behavior can be asserted in tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use sift_core::label::ContentLabel;

use crate::{ChunkUpsert, ScoredChunk, StoreError, VectorStore};

pub struct MemoryStore {
    chunks: RwLock<HashMap<String, ChunkUpsert>>,
    bias_boost: f64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            bias_boost: 1.15,
        }
    }

    /// Override the soft-bias ranking boost (tests, tuning experiments).
    pub fn with_bias_boost(mut self, boost: f64) -> Self {
        self.bias_boost = boost;
        self
    }

    fn tokens(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// Token-overlap score, dampened by chunk vocabulary size so verbose
    /// chunks do not dominate on incidental matches.
    fn score(query_tokens: &HashSet<String>, chunk_text: &str) -> f64 {
        let chunk_tokens = Self::tokens(chunk_text);
        if chunk_tokens.is_empty() {
            return 0.0;
        }
        let hits = query_tokens.intersection(&chunk_tokens).count();
        hits as f64 / (chunk_tokens.len() as f64).sqrt()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, chunks: &[ChunkUpsert]) -> Result<(), StoreError> {
        let mut store = self.chunks.write().await;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        debug!("upserted {} chunks", chunks.len());
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<usize, StoreError> {
        let mut store = self.chunks.write().await;
        let before = store.len();
        store.retain(|_, c| c.meta.doc_id != doc_id);
        Ok(before - store.len())
    }

    async fn query(
        &self,
        text: &str,
        limit: usize,
        bias: Option<ContentLabel>,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        let query_tokens = Self::tokens(text);
        let store = self.chunks.read().await;

        let mut scored: Vec<ScoredChunk> = store
            .values()
            .map(|c| {
                let mut score = Self::score(&query_tokens, &c.text);
                if bias == Some(c.meta.content_type) {
                    score *= self.bias_boost;
                }
                ScoredChunk {
                    text: c.text.clone(),
                    meta: c.meta.clone(),
                    score,
                }
            })
            .collect();

        // Stable ranking: score descending, chunk id as tie-break.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    format!("{}:{:04}", a.meta.doc_id, a.meta.seq)
                        .cmp(&format!("{}:{:04}", b.meta.doc_id, b.meta.seq))
                })
        });

        scored.truncate(limit);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.chunks.read().await.len())
    }
}
