//! Server readiness and operational stats.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

// ── Health ────────────────────────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ── Stats ─────────────────────────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub chunk_count: usize,
    pub store_backend: String,
    pub store_available: bool,
    pub llm_provider: String,
    pub llm_configured: bool,
}

/// Store and collaborator status
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Health",
    responses((status = 200, description = "Operational stats", body = StatsResponse))
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let (chunk_count, store_available) = match state.store.count().await {
        Ok(n) => (n, true),
        Err(_) => (0, false),
    };
    Json(StatsResponse {
        chunk_count,
        store_available,
        store_backend: state.config.store.backend.clone(),
        llm_provider: state.config.llm.provider.clone(),
        llm_configured: state.generator.is_some(),
    })
}
