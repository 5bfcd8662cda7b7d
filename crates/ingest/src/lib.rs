//! Adaptive ingestion: profile each document, classify its content
//! pattern, compute a chunking strategy, split it into boundary-safe
//! overlapping chunks, and hand the chunk set to the storage collaborator.

pub mod chunker;
pub mod classify;
pub mod extract;
pub mod pipeline;
pub mod profile;
pub mod strategy;

pub use chunker::{chunk_text, Chunk};
pub use classify::{Classifier, ContentScores, RuleClassifier};
pub use extract::{ExtractError, Extractor, ExtractorRegistry};
pub use pipeline::{BatchReport, DocReport, DocStatus, IngestionPipeline};
pub use profile::{profile, FileProfile};
pub use strategy::{plan_strategy, ChunkingStrategy, StrategyError};
