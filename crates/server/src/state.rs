use std::sync::Arc;

use sift_core::Config;
use sift_ingest::IngestionPipeline;
use sift_llm::Generator;
use sift_retrieve::QueryPipeline;
use sift_store::VectorStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn VectorStore>,
    pub ingestion: IngestionPipeline,
    pub query: QueryPipeline,
    /// Absent when no LLM provider is configured — retrieval endpoints
    /// stay up, only /chat degrades.
    pub generator: Option<Arc<dyn Generator>>,
}
