//! Raw retrieval without generation — the plan and ranked chunks exactly
//! as the chat endpoint would see them.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use sift_retrieve::{RetrieveError, RetrievedSet};

use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: String,
    /// Caps the returned chunks below what the plan selected.
    pub limit: Option<usize>,
}

/// Retrieve ranked chunks for a query
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Retrieval plan plus ranked chunks"),
        (status = 503, description = "Store unavailable", body = String),
        (status = 504, description = "Retrieval deadline expired", body = String)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<RetrievedSet>, (StatusCode, String)> {
    if req.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must not be empty".to_string()));
    }

    let mut set = state.query.retrieve(&req.query).await.map_err(|e| match &e {
        RetrieveError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        RetrieveError::Store(s) if s.is_retryable() => {
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        RetrieveError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    if let Some(limit) = req.limit {
        set.chunks.truncate(limit);
    }
    Ok(Json(set))
}
