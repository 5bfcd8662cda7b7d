//! The conversational question-answering endpoint.
//!
//! Retrieval metadata (complexity, result count, sources, content types)
//! travels with every answer — this response shape is the stable contract
//! the chat UI consumes.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use sift_core::label::{ComplexityLabel, ContentLabel};
use sift_llm::Exchange;
use sift_retrieve::RetrieveError;

use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    pub query: String,
    /// Prior exchanges, oldest first.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<Exchange>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    #[schema(value_type = String)]
    pub complexity: ComplexityLabel,
    pub result_count: usize,
    pub sources: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub content_types: Vec<ContentLabel>,
}

/// Answer a question over the ingested collection
///
/// Classifies the query, retrieves per the resulting plan, and hands the
/// ranked chunks to the generation collaborator. Zero matches is a normal
/// outcome: the answer says so and the source lists come back empty.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer with retrieval metadata", body = ChatResponse),
        (status = 503, description = "Collaborator unavailable", body = String),
        (status = 504, description = "Retrieval deadline expired", body = String)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    if req.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must not be empty".to_string()));
    }
    let generator = state
        .generator
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "LLM provider not configured".to_string()))?;

    let set = state.query.retrieve(&req.query).await.map_err(|e| match &e {
        RetrieveError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        RetrieveError::Store(s) if s.is_retryable() => {
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        RetrieveError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    if set.chunks.is_empty() {
        return Ok(Json(ChatResponse {
            answer: "No relevant information was found for that question. \
                     Try rephrasing it or ingesting more documents."
                .to_string(),
            complexity: set.profile.label,
            result_count: set.plan.result_count,
            sources: Vec::new(),
            content_types: Vec::new(),
        }));
    }

    let answer = generator
        .generate(&req.query, &set.chunks, &req.history)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("generation failed: {e}")))?;

    let sources: BTreeSet<String> = set.chunks.iter().map(|c| c.meta.doc_id.clone()).collect();
    let content_types: BTreeSet<ContentLabel> =
        set.chunks.iter().map(|c| c.meta.content_type).collect();

    info!(
        complexity = %set.profile.label,
        chunks = set.chunks.len(),
        sources = sources.len(),
        "chat answered"
    );

    Ok(Json(ChatResponse {
        answer,
        complexity: set.profile.label,
        result_count: set.plan.result_count,
        sources: sources.into_iter().collect(),
        content_types: content_types.into_iter().collect(),
    }))
}
