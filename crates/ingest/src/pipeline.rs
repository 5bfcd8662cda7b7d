//! Ingestion orchestration.
//!
//! Per document: extract → profile → classify → plan → chunk → replace the
//! stored chunk set. Documents in a batch are independent pure
//! computations over immutable input, so they run on a bounded worker
//! pool; only the storage collaborator is shared. One document's failure
//! never aborts the batch.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use sift_core::document::SourceDocument;
use sift_core::label::ContentLabel;
use sift_core::tuning::Tuning;
use sift_store::{ChunkMeta, ChunkUpsert, VectorStore};

use crate::chunker::{chunk_text, Chunk};
use crate::classify::Classifier;
use crate::extract::ExtractorRegistry;
use crate::profile::profile;
use crate::strategy::{plan_strategy, ChunkingStrategy};

// ── Reports ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DocReport {
    pub doc_id: String,
    #[serde(flatten)]
    pub status: DocStatus,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocStatus {
    Ingested {
        chunks: usize,
        content_type: ContentLabel,
        strategy: String,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
        /// Whether the caller may retry this document (storage outage)
        /// or the document itself is at fault.
        retryable: bool,
    },
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub ingested: usize,
    pub skipped: usize,
    pub failed: usize,
    pub documents: Vec<DocReport>,
}

// ── Pipeline ──────────────────────────────────────────────────

pub struct IngestionPipeline {
    store: Arc<dyn VectorStore>,
    classifier: Arc<dyn Classifier>,
    extractors: ExtractorRegistry,
    tuning: Tuning,
    worker_limit: usize,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn VectorStore>,
        classifier: Arc<dyn Classifier>,
        tuning: Tuning,
        worker_limit: usize,
    ) -> Self {
        Self {
            store,
            classifier,
            extractors: ExtractorRegistry::new(),
            tuning,
            worker_limit: worker_limit.max(1),
        }
    }

    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    /// Ingest a batch on the bounded worker pool. The report lists every
    /// document, sorted by id for stable output.
    pub async fn ingest_batch(&self, docs: Vec<SourceDocument>) -> BatchReport {
        let mut documents: Vec<DocReport> = stream::iter(docs)
            .map(|doc| self.ingest_document(doc))
            .buffer_unordered(self.worker_limit)
            .collect()
            .await;
        documents.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));

        let mut report = BatchReport {
            documents,
            ..BatchReport::default()
        };
        for doc in &report.documents {
            match doc.status {
                DocStatus::Ingested { .. } => report.ingested += 1,
                DocStatus::Skipped { .. } => report.skipped += 1,
                DocStatus::Failed { .. } => report.failed += 1,
            }
        }
        report
    }

    /// Ingest one document. Never returns an error — every outcome is a
    /// report entry so batches keep moving.
    pub async fn ingest_document(&self, doc: SourceDocument) -> DocReport {
        let doc_id = doc.id.clone();

        let (upserts, strategy) = match self.prepare(&doc) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => {
                warn!(doc_id = %doc_id, "document is empty, skipping");
                return DocReport {
                    doc_id,
                    status: DocStatus::Skipped {
                        reason: "empty document".to_string(),
                    },
                };
            }
            Err(error) => {
                warn!(doc_id = %doc_id, error = %error, "document rejected");
                return DocReport {
                    doc_id,
                    status: DocStatus::Failed {
                        error,
                        retryable: false,
                    },
                };
            }
        };

        // Replace, never append: drop the previous chunk set for this id
        // before upserting the new one.
        if let Err(e) = self.store.delete_document(&doc_id).await {
            return DocReport {
                doc_id,
                status: DocStatus::Failed {
                    retryable: e.is_retryable(),
                    error: e.to_string(),
                },
            };
        }
        let chunk_count = upserts.len();
        if let Err(e) = self.store.upsert(&upserts).await {
            return DocReport {
                doc_id,
                status: DocStatus::Failed {
                    retryable: e.is_retryable(),
                    error: e.to_string(),
                },
            };
        }

        DocReport {
            doc_id,
            status: DocStatus::Ingested {
                chunks: chunk_count,
                content_type: strategy.label,
                strategy: strategy.tag,
            },
        }
    }

    /// The pure part: everything up to (but excluding) the storage calls.
    /// `Ok(None)` means an empty document.
    fn prepare(
        &self,
        doc: &SourceDocument,
    ) -> Result<Option<(Vec<ChunkUpsert>, ChunkingStrategy)>, String> {
        let text = self
            .extractors
            .extract(doc.format, &doc.text)
            .map_err(|e| e.to_string())?;

        let profile = profile(&text, &self.tuning.buckets);
        if profile.empty {
            return Ok(None);
        }

        let scores = self.classifier.classify(&text);
        let strategy =
            plan_strategy(&profile, scores.primary, &self.tuning).map_err(|e| e.to_string())?;

        let chunks = chunk_text(&text, &strategy, self.tuning.boundary_tolerance);
        validate_chunks(&text, &chunks, &strategy)?;

        // One structured event per chunking decision — the observability
        // contract consumed by an external collector.
        info!(
            doc_id = %doc.id,
            format = %doc.format,
            bucket = %profile.bucket,
            content_type = %scores.primary,
            secondary = ?scores.secondary,
            scores = ?scores.scores,
            size = strategy.size,
            overlap = strategy.overlap,
            result_hint = strategy.result_hint,
            chunks = chunks.len(),
            "chunking decision"
        );

        let upserts = chunks
            .into_iter()
            .map(|c| ChunkUpsert {
                id: format!("{}:{:04}", doc.id, c.seq),
                meta: ChunkMeta {
                    doc_id: doc.id.clone(),
                    seq: c.seq,
                    start: c.start,
                    end: c.end,
                    content_type: scores.primary,
                    strategy: strategy.tag.clone(),
                },
                text: c.text,
            })
            .collect();

        Ok(Some((upserts, strategy)))
    }
}

/// Chunk-set invariants checked before anything reaches storage. A
/// violation is fatal for the document only.
fn validate_chunks(text: &str, chunks: &[Chunk], strategy: &ChunkingStrategy) -> Result<(), String> {
    if chunks.is_empty() {
        return Err("chunker produced no chunks for non-empty text".to_string());
    }
    let mut prev: Option<&Chunk> = None;
    for chunk in chunks {
        if chunk.end <= chunk.start {
            return Err(format!("chunk {} has end <= start", chunk.seq));
        }
        // +4 covers the char-boundary nudge on multi-byte text.
        if chunk.end - chunk.start > strategy.size + 4 {
            return Err(format!(
                "chunk {} is {} bytes, over the {}-byte strategy size",
                chunk.seq,
                chunk.end - chunk.start,
                strategy.size
            ));
        }
        if let Some(p) = prev {
            if chunk.start > p.end {
                return Err(format!("gap before chunk {}", chunk.seq));
            }
            if chunk.start <= p.start {
                return Err(format!("no forward progress at chunk {}", chunk.seq));
            }
        } else if chunk.start != 0 {
            return Err("first chunk does not start at offset 0".to_string());
        }
        prev = Some(chunk);
    }
    let last = chunks.last().map(|c| c.end).unwrap_or(0);
    if last != text.len() {
        return Err(format!("chunks cover {last} of {} bytes", text.len()));
    }
    Ok(())
}
