//! HTTP router construction.
//!
//! Assembles routes, CORS, and the OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::state::AppState;
use crate::{api, doc};

/// Build the complete application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/stats", get(api::stats))
        .route("/chat", post(api::chat))
        .route("/search", post(api::search))
        .route("/ingest", post(api::ingest))
        .route("/documents/{id}", delete(api::delete_document))
        .merge(Scalar::with_url("/docs", doc::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
