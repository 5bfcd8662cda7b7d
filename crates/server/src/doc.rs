//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers and `ToSchema` types
//! into one spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sift API",
        version = "0.1.0",
        description = "Adaptive retrieval-tuned question answering over a document collection.",
    ),
    tags(
        (name = "Health", description = "Liveness and operational stats"),
        (name = "Chat", description = "Question answering with retrieval metadata"),
        (name = "Search", description = "Raw retrieval without generation"),
        (name = "Documents", description = "Batch ingestion and removal"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::stats,
        crate::api::chat::chat,
        crate::api::search::search,
        crate::api::documents::ingest,
        crate::api::documents::delete_document,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::health::StatsResponse,
        crate::api::chat::ChatRequest,
        crate::api::chat::ChatResponse,
        crate::api::search::SearchRequest,
        crate::api::documents::IngestRequest,
        crate::api::documents::IngestDocument,
    ))
)]
pub struct ApiDoc;
