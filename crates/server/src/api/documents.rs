//! Document ingestion and removal.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use sift_core::document::{FormatTag, SourceDocument};
use sift_ingest::BatchReport;

use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct IngestRequest {
    pub documents: Vec<IngestDocument>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct IngestDocument {
    pub id: String,
    /// Already-decoded character text — binary parsing happens upstream.
    pub text: String,
    #[serde(default)]
    #[schema(value_type = String)]
    pub format: FormatTag,
}

/// Ingest a batch of documents
///
/// Each document is profiled, classified, chunked, and upserted
/// independently; the report lists every document's outcome. Re-ingesting
/// an id replaces its prior chunk set.
#[utoipa::path(
    post,
    path = "/ingest",
    tag = "Documents",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Per-document batch report"),
        (status = 400, description = "Empty batch", body = String)
    )
)]
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<BatchReport>, (StatusCode, String)> {
    if req.documents.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no documents provided".to_string()));
    }

    let docs: Vec<SourceDocument> = req
        .documents
        .into_iter()
        .map(|d| SourceDocument::new(d.id, d.text, d.format))
        .collect();

    info!("ingesting batch of {} documents", docs.len());
    let report = state.ingestion.ingest_batch(docs).await;
    info!(
        ingested = report.ingested,
        skipped = report.skipped,
        failed = report.failed,
        "batch complete"
    );
    Ok(Json(report))
}

/// Delete a document's chunk set
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 204, description = "Chunks removed"),
        (status = 404, description = "Document not found", body = String),
        (status = 503, description = "Store unavailable", body = String)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = state.store.delete_document(&id).await.map_err(|e| {
        let status = if e.is_retryable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, e.to_string())
    })?;

    if removed > 0 {
        info!(doc_id = %id, chunks = removed, "document deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "document not found".to_string()))
    }
}
