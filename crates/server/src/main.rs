mod api;
mod doc;
mod router;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use sift_core::tuning::Tuning;
use sift_core::Config;
use sift_ingest::classify::RuleClassifier;
use sift_ingest::IngestionPipeline;
use sift_llm::{Generator, LlmGenerator};
use sift_retrieve::{PhraseClassifier, QueryPipeline};
use sift_store::{ChromaStore, MemoryStore, VectorStore};

async fn build_store(config: &Config, tuning: &Tuning) -> anyhow::Result<Arc<dyn VectorStore>> {
    match config.store.backend.as_str() {
        "chroma" => {
            let store = ChromaStore::connect(&config.store.url, &config.store.collection)
                .await?
                .with_bias_boost(tuning.bias_boost);
            info!("connected to chroma at {}", config.store.url);
            Ok(Arc::new(store))
        }
        "memory" => {
            warn!("using the in-memory store — chunks will not survive a restart");
            Ok(Arc::new(MemoryStore::new().with_bias_boost(tuning.bias_boost)))
        }
        other => anyhow::bail!("unknown store backend '{other}' (expected 'memory' or 'chroma')"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    sift_core::config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let tuning = Tuning::load(config.ingest.tuning_path.as_deref())?;
    let store = build_store(&config, &tuning).await?;

    let classifier = Arc::new(RuleClassifier::new(tuning.secondary_threshold)?);
    let ingestion = IngestionPipeline::new(
        store.clone(),
        classifier.clone(),
        tuning.clone(),
        config.ingest.worker_limit,
    );
    let query = QueryPipeline::new(
        store.clone(),
        Arc::new(PhraseClassifier::new(tuning.complexity.clone())),
        classifier,
        tuning,
        Duration::from_secs(config.query.timeout_secs),
    );

    let generator: Option<Arc<dyn Generator>> = match LlmGenerator::from_config(&config.llm) {
        Ok(g) => {
            info!("LLM generator ready (provider: {})", config.llm.provider);
            Some(Arc::new(g))
        }
        Err(e) => {
            warn!("LLM generator not available: {e} — POST /chat will be disabled");
            None
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(state::AppState {
        config,
        store,
        ingestion,
        query,
        generator,
    });

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
