use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub ingest: IngestConfig,
    pub query: QueryConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            store: StoreConfig::from_env(),
            llm: LlmConfig::from_env(),
            ingest: IngestConfig::from_env(),
            query: QueryConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:  port={}", self.server.port);
        tracing::info!(
            "  store:   backend={}, collection={}",
            self.store.backend,
            self.store.collection
        );
        tracing::info!("  llm:     provider={}", self.llm.provider);
        tracing::info!(
            "  ingest:  worker_limit={}, tuning={}",
            self.ingest.worker_limit,
            self.ingest
                .tuning_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string())
        );
        tracing::info!("  query:   timeout={}s", self.query.timeout_secs);
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("SIFT_HOST", "0.0.0.0"),
            port: env_u16("SIFT_PORT", 3001),
            cors_origin: env_or("SIFT_CORS_ORIGIN", "*"),
        }
    }
}

// ── Vector store collaborator ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "memory" or "chroma"
    pub backend: String,
    pub url: String,
    pub collection: String,
}

impl StoreConfig {
    fn from_env() -> Self {
        Self {
            backend: env_or("SIFT_STORE_BACKEND", "memory"),
            url: env_or("SIFT_CHROMA_URL", "http://localhost:8000"),
            collection: env_or("SIFT_COLLECTION", "universal_content"),
        }
    }
}

// ── Generation collaborator ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("SIFT_LLM_PROVIDER", "ollama"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.2"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com"),
            temperature: env_or("SIFT_LLM_TEMPERATURE", "0.1").parse().unwrap_or(0.1),
            max_tokens: env_u64("SIFT_LLM_MAX_TOKENS", 2048) as u32,
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ingestion ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Bounded worker pool size for batch ingestion.
    pub worker_limit: usize,
    /// Optional TOML file overriding the tuning tables.
    pub tuning_path: Option<PathBuf>,
}

impl IngestConfig {
    fn from_env() -> Self {
        Self {
            worker_limit: env_usize("SIFT_WORKER_LIMIT", 4).max(1),
            tuning_path: env_opt("SIFT_TUNING_PATH").map(PathBuf::from),
        }
    }
}

// ── Query ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default deadline for a retrieval round-trip, in seconds.
    pub timeout_secs: u64,
}

impl QueryConfig {
    fn from_env() -> Self {
        Self {
            timeout_secs: env_u64("SIFT_QUERY_TIMEOUT_SECS", 30),
        }
    }
}
