//! Chunk-strategy computation.
//!
//! A pure function of (profile, primary label, tuning tables). Identical
//! inputs always yield the identical strategy, which in turn pins the
//! chunk boundaries — determinism here is what makes re-ingestion
//! idempotent.

use serde::Serialize;
use thiserror::Error;

use sift_core::label::ContentLabel;
use sift_core::tuning::{SizeBucket, Tuning};

use crate::profile::FileProfile;

#[derive(Debug, Error)]
pub enum StrategyError {
    /// The tuning tables produced an unusable size. Fatal for the
    /// document, never for the batch.
    #[error("computed chunk size {size} is invalid (overlap {overlap})")]
    InvalidSize { size: usize, overlap: usize },
}

/// How one document gets split: the resolved sizing decision plus the
/// inputs that produced it, for observability and storage metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkingStrategy {
    pub bucket: SizeBucket,
    pub label: ContentLabel,
    pub base: usize,
    pub multiplier: f64,
    /// Final chunk size in bytes, clamped to the configured global range.
    pub size: usize,
    /// Shared bytes between consecutive chunks.
    pub overlap: usize,
    /// Suggested result count when retrieving content chunked this way.
    pub result_hint: usize,
    /// "{bucket}_{label}", e.g. "large_technical".
    pub tag: String,
}

pub fn plan_strategy(
    profile: &FileProfile,
    label: ContentLabel,
    tuning: &Tuning,
) -> Result<ChunkingStrategy, StrategyError> {
    let base = tuning.base_sizes.for_bucket(profile.bucket);
    let multiplier = tuning.multipliers.for_label(label);
    let mut intermediate = base as f64 * multiplier;

    // Structural corrections. A paragraph longer than most chunks would
    // otherwise guarantee a mid-paragraph split; raise the size to cover
    // one full paragraph plus margin. Very short paragraphs get a floor
    // so header-like content is not shredded into fragments. Suspicious
    // statistics (non-finite, negative) skip correction instead of
    // aborting.
    let avg_para = profile.avg_paragraph_len;
    if avg_para.is_finite() && avg_para > 0.0 {
        let corr = &tuning.paragraph;
        if avg_para > corr.long_fraction * intermediate {
            intermediate = intermediate.max(avg_para * (1.0 + corr.margin));
        } else if avg_para < corr.short_max as f64 {
            intermediate = intermediate.max(corr.short_floor as f64);
        }
    }

    let size = (intermediate.round() as usize).clamp(tuning.limits.min_chunk, tuning.limits.max_chunk);
    let overlap = (size as f64 * tuning.overlap_fraction.clamped()).round() as usize;

    if size == 0 || overlap >= size {
        return Err(StrategyError::InvalidSize { size, overlap });
    }

    Ok(ChunkingStrategy {
        bucket: profile.bucket,
        label,
        base,
        multiplier,
        size,
        overlap,
        result_hint: tuning.result_hints.for_label(label),
        tag: format!("{}_{}", profile.bucket, label),
    })
}
