//! Command-line companion to the server: batch-ingest a directory, ask a
//! one-off question, or inspect the store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use sift_core::document::{FormatTag, SourceDocument};
use sift_core::tuning::Tuning;
use sift_core::Config;
use sift_ingest::classify::RuleClassifier;
use sift_ingest::{DocStatus, IngestionPipeline};
use sift_llm::{Generator, LlmGenerator};
use sift_retrieve::{PhraseClassifier, QueryPipeline};
use sift_store::{ChromaStore, MemoryStore, VectorStore};

#[derive(Parser)]
#[command(name = "sift", about = "Adaptive retrieval-tuned document Q&A", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest every supported file under a directory
    Ingest {
        /// Directory to scan recursively
        dir: PathBuf,
    },
    /// Ask a question over the ingested collection
    Ask {
        /// The question
        question: String,
    },
    /// Show store stats
    Stats,
}

async fn build_store(config: &Config, tuning: &Tuning) -> Result<Arc<dyn VectorStore>> {
    match config.store.backend.as_str() {
        "chroma" => {
            let store = ChromaStore::connect(&config.store.url, &config.store.collection)
                .await
                .context("failed to connect to chroma")?
                .with_bias_boost(tuning.bias_boost);
            Ok(Arc::new(store))
        }
        "memory" => {
            warn!(
                "using the in-memory store — nothing persists between runs; \
                 set SIFT_STORE_BACKEND=chroma for a real collection"
            );
            Ok(Arc::new(MemoryStore::new().with_bias_boost(tuning.bias_boost)))
        }
        other => anyhow::bail!("unknown store backend '{other}'"),
    }
}

/// Collect (relative path, text, format) for every readable file with a
/// recognized text extension.
fn scan_directory(dir: &Path) -> Result<Vec<SourceDocument>> {
    let mut docs = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let format = FormatTag::from_extension(ext);
        if format == FormatTag::Unknown {
            continue;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!("skipping {} (unreadable: {e})", path.display());
                continue;
            }
        };
        let id = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        docs.push(SourceDocument::new(id, text, format));
    }
    docs.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(docs)
}

async fn cmd_ingest(config: &Config, tuning: Tuning, dir: &Path) -> Result<()> {
    let docs = scan_directory(dir)?;
    if docs.is_empty() {
        anyhow::bail!("no supported files found under {}", dir.display());
    }
    println!("Found {} files under {}", docs.len(), dir.display());

    let store = build_store(config, &tuning).await?;
    let classifier = Arc::new(RuleClassifier::new(tuning.secondary_threshold)?);
    let pipeline = IngestionPipeline::new(store, classifier, tuning, config.ingest.worker_limit);

    let report = pipeline.ingest_batch(docs).await;

    let mut by_strategy: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for doc in &report.documents {
        match &doc.status {
            DocStatus::Ingested {
                chunks,
                content_type,
                strategy,
            } => {
                println!("  {} — {} chunks ({})", doc.doc_id, chunks, strategy);
                *by_strategy.entry(strategy.clone()).or_default() += chunks;
                *by_type.entry(content_type.to_string()).or_default() += chunks;
            }
            DocStatus::Skipped { reason } => {
                println!("  {} — skipped: {}", doc.doc_id, reason);
            }
            DocStatus::Failed { error, retryable } => {
                let hint = if *retryable { " (retryable)" } else { "" };
                println!("  {} — FAILED{}: {}", doc.doc_id, hint, error);
            }
        }
    }

    println!(
        "\nIngested {}, skipped {}, failed {}",
        report.ingested, report.skipped, report.failed
    );
    if !by_type.is_empty() {
        println!("Content types:");
        for (label, count) in &by_type {
            println!("  {label}: {count} chunks");
        }
        println!("Strategies:");
        for (tag, count) in &by_strategy {
            println!("  {tag}: {count} chunks");
        }
    }
    Ok(())
}

async fn cmd_ask(config: &Config, tuning: Tuning, question: &str) -> Result<()> {
    let store = build_store(config, &tuning).await?;
    let classifier = Arc::new(RuleClassifier::new(tuning.secondary_threshold)?);
    let complexity = Arc::new(PhraseClassifier::new(tuning.complexity.clone()));
    let pipeline = QueryPipeline::new(
        store,
        complexity,
        classifier,
        tuning,
        Duration::from_secs(config.query.timeout_secs),
    );

    let set = pipeline.retrieve(question).await?;
    println!(
        "[complexity: {}, retrieved {} of {} requested]",
        set.profile.label,
        set.chunks.len(),
        set.plan.result_count
    );

    if set.chunks.is_empty() {
        println!("No relevant information found. Try rephrasing or ingest more documents.");
        return Ok(());
    }

    let generator = LlmGenerator::from_config(&config.llm)
        .context("LLM provider not configured — set SIFT_LLM_PROVIDER")?;
    let answer = generator.generate(question, &set.chunks, &[]).await?;

    println!("\n{answer}\n");
    println!("Sources:");
    let mut seen = std::collections::BTreeSet::new();
    for chunk in &set.chunks {
        if seen.insert(chunk.meta.doc_id.as_str()) {
            println!(
                "  {} ({}, score {:.3})",
                chunk.meta.doc_id, chunk.meta.content_type, chunk.score
            );
        }
    }
    Ok(())
}

async fn cmd_stats(config: &Config, tuning: Tuning) -> Result<()> {
    let store = build_store(config, &tuning).await?;
    let count = store.count().await?;
    println!("backend:    {}", config.store.backend);
    println!("collection: {}", config.store.collection);
    println!("chunks:     {count}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    sift_core::config::load_dotenv();
    let config = Config::from_env();
    let tuning = Tuning::load(config.ingest.tuning_path.as_deref())?;

    match cli.command {
        Command::Ingest { dir } => cmd_ingest(&config, tuning, &dir).await,
        Command::Ask { question } => cmd_ask(&config, tuning, &question).await,
        Command::Stats => cmd_stats(&config, tuning).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_skips_unknown_extensions() {
        let dir = std::env::temp_dir().join("sift-cli-scan-test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.txt"), "text file").unwrap();
        std::fs::write(dir.join("data.json"), "{}").unwrap();
        std::fs::write(dir.join("binary.bin"), "nope").unwrap();

        let docs = scan_directory(&dir).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["data.json", "notes.txt"]);
        assert_eq!(docs[0].format, FormatTag::Json);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
