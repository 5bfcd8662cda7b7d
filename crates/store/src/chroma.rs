//! Chroma HTTP backend.
//!
//! Talks to a Chroma server's REST API. Chroma computes embeddings on its
//! side of the boundary, so upserts and queries carry raw text. The soft
//! content-type bias is applied client-side: the query overfetches, boosts
//! matching chunks, and re-truncates — a re-rank, never a filter.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use sift_core::label::ContentLabel;

use crate::{ChunkMeta, ChunkUpsert, ScoredChunk, StoreError, VectorStore};

pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
    bias_boost: f64,
}

impl ChromaStore {
    /// Connect and resolve (or create) the named collection.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/v1/collections", base_url.trim_end_matches('/'));
        let response = client
            .post(&url)
            .json(&json!({ "name": collection, "get_or_create": true }))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }

        let body: Value = response.json().await?;
        let collection_id = body["id"]
            .as_str()
            .ok_or_else(|| StoreError::Decode("missing collection id".into()))?
            .to_string();

        debug!("chroma collection '{}' resolved to {}", collection, collection_id);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection_id,
            bias_boost: 1.15,
        })
    }

    pub fn with_bias_boost(mut self, boost: f64) -> Self {
        self.bias_boost = boost;
        self
    }

    fn collection_url(&self, op: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection_id, op
        )
    }

    async fn post(&self, op: &str, body: Value) -> Result<Value, StoreError> {
        let response = self.client.post(self.collection_url(op)).json(&body).send().await?;
        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        Ok(response.json().await?)
    }

    fn meta_from_value(value: &Value) -> Result<ChunkMeta, StoreError> {
        serde_json::from_value(value.clone())
            .map_err(|e| StoreError::Decode(format!("chunk metadata: {e}")))
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn upsert(&self, chunks: &[ChunkUpsert]) -> Result<(), StoreError> {
        if chunks.is_empty() {
            return Ok(());
        }
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let documents: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let metadatas: Vec<Value> = chunks
            .iter()
            .map(|c| serde_json::to_value(&c.meta).unwrap_or(Value::Null))
            .collect();

        self.post(
            "upsert",
            json!({ "ids": ids, "documents": documents, "metadatas": metadatas }),
        )
        .await?;
        debug!("upserted {} chunks", chunks.len());
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<usize, StoreError> {
        // Count first — Chroma's delete response does not report how many
        // records matched the filter.
        let existing = self
            .post(
                "get",
                json!({ "where": { "doc_id": doc_id }, "include": [] }),
            )
            .await?;
        let count = existing["ids"].as_array().map(|a| a.len()).unwrap_or(0);

        if count > 0 {
            self.post("delete", json!({ "where": { "doc_id": doc_id } })).await?;
        }
        Ok(count)
    }

    async fn query(
        &self,
        text: &str,
        limit: usize,
        bias: Option<ContentLabel>,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        // Overfetch when biasing so the boost can actually reorder.
        let fetch = if bias.is_some() { limit * 2 } else { limit };
        let body = self
            .post(
                "query",
                json!({
                    "query_texts": [text],
                    "n_results": fetch,
                    "include": ["documents", "metadatas", "distances"],
                }),
            )
            .await?;

        let documents = body["documents"][0]
            .as_array()
            .ok_or_else(|| StoreError::Decode("missing documents".into()))?;
        let metadatas = body["metadatas"][0]
            .as_array()
            .ok_or_else(|| StoreError::Decode("missing metadatas".into()))?;
        let distances = body["distances"][0]
            .as_array()
            .ok_or_else(|| StoreError::Decode("missing distances".into()))?;

        let mut results = Vec::with_capacity(documents.len());
        for ((doc, meta), dist) in documents.iter().zip(metadatas).zip(distances) {
            let text = doc
                .as_str()
                .ok_or_else(|| StoreError::Decode("non-string document".into()))?
                .to_string();
            let meta = Self::meta_from_value(meta)?;
            let mut score = 1.0 - dist.as_f64().unwrap_or(1.0);
            if bias == Some(meta.content_type) {
                score *= self.bias_boost;
            }
            results.push(ScoredChunk { text, meta, score });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        Ok(results)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let response = self
            .client
            .get(self.collection_url("count"))
            .send()
            .await?;
        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        let body: Value = response.json().await?;
        body.as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| StoreError::Decode("count is not a number".into()))
    }
}
