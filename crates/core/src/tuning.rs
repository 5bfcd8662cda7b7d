//! Tunable decision tables for chunking and retrieval.
//!
//! Every numeric threshold the ingestion and query pipelines consult lives
//! here, with defaults matching the shipped behavior. All values can be
//! overridden from a TOML file named by `SIFT_TUNING_PATH` — the decision
//! logic itself reads these tables and holds no constants of its own.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::{ComplexityLabel, ContentLabel};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Size buckets ──────────────────────────────────────────────

/// Coarse document-size class, by character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl SizeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBucket::Small => "small",
            SizeBucket::Medium => "medium",
            SizeBucket::Large => "large",
            SizeBucket::Xlarge => "xlarge",
        }
    }
}

impl std::fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub small_max: usize,
    pub medium_max: usize,
    pub large_max: usize,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            small_max: 1024,
            medium_max: 5120,
            large_max: 20480,
        }
    }
}

impl BucketThresholds {
    pub fn bucket_for(&self, chars: usize) -> SizeBucket {
        if chars < self.small_max {
            SizeBucket::Small
        } else if chars < self.medium_max {
            SizeBucket::Medium
        } else if chars < self.large_max {
            SizeBucket::Large
        } else {
            SizeBucket::Xlarge
        }
    }
}

// ── Chunk sizing ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSizes {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
    pub xlarge: usize,
}

impl Default for BaseSizes {
    fn default() -> Self {
        Self {
            small: 300,
            medium: 500,
            large: 800,
            xlarge: 1200,
        }
    }
}

impl BaseSizes {
    pub fn for_bucket(&self, bucket: SizeBucket) -> usize {
        match bucket {
            SizeBucket::Small => self.small,
            SizeBucket::Medium => self.medium,
            SizeBucket::Large => self.large,
            SizeBucket::Xlarge => self.xlarge,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelMultipliers {
    pub procedures: f64,
    pub technical: f64,
    pub lists: f64,
    pub faq: f64,
    pub conversational: f64,
    pub generic: f64,
}

impl Default for LabelMultipliers {
    fn default() -> Self {
        Self {
            procedures: 1.5,
            technical: 1.5,
            lists: 1.3,
            faq: 0.8,
            conversational: 0.7,
            generic: 1.0,
        }
    }
}

impl LabelMultipliers {
    pub fn for_label(&self, label: ContentLabel) -> f64 {
        match label {
            ContentLabel::Procedures => self.procedures,
            ContentLabel::Technical => self.technical,
            ContentLabel::Lists => self.lists,
            ContentLabel::Faq => self.faq,
            ContentLabel::Conversational => self.conversational,
            ContentLabel::Generic => self.generic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_chunk: usize,
    pub max_chunk: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_chunk: 200,
            max_chunk: 2000,
        }
    }
}

/// Paragraph-structure corrections applied after the base × multiplier
/// computation (see the chunk-size calculator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphCorrection {
    /// A paragraph counts as "long" when `avg_paragraph_len` exceeds this
    /// fraction of the intermediate chunk size.
    pub long_fraction: f64,
    /// Margin added on top of the average paragraph when raising the size.
    pub margin: f64,
    /// Paragraphs shorter than this are "short" (header-like content).
    pub short_max: usize,
    /// Floor enforced for short-paragraph documents so several paragraphs
    /// fit per chunk.
    pub short_floor: usize,
}

impl Default for ParagraphCorrection {
    fn default() -> Self {
        Self {
            long_fraction: 0.75,
            margin: 0.2,
            short_max: 150,
            short_floor: 400,
        }
    }
}

// ── Retrieval counts ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultHints {
    pub lists: usize,
    pub technical: usize,
    pub procedures: usize,
    pub generic: usize,
    pub conversational: usize,
    pub faq: usize,
}

impl Default for ResultHints {
    fn default() -> Self {
        Self {
            lists: 8,
            technical: 7,
            procedures: 6,
            generic: 5,
            conversational: 4,
            faq: 3,
        }
    }
}

impl ResultHints {
    pub fn for_label(&self, label: ContentLabel) -> usize {
        match label {
            ContentLabel::Lists => self.lists,
            ContentLabel::Technical => self.technical,
            ContentLabel::Procedures => self.procedures,
            ContentLabel::Generic => self.generic,
            ContentLabel::Conversational => self.conversational,
            ContentLabel::Faq => self.faq,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalCounts {
    pub simple: usize,
    pub medium: usize,
    pub complex: usize,
    pub technical: usize,
}

impl Default for RetrievalCounts {
    fn default() -> Self {
        Self {
            simple: 3,
            medium: 5,
            complex: 8,
            technical: 6,
        }
    }
}

impl RetrievalCounts {
    pub fn for_label(&self, label: ComplexityLabel) -> usize {
        match label {
            ComplexityLabel::Simple => self.simple,
            ComplexityLabel::Medium => self.medium,
            ComplexityLabel::Complex => self.complex,
            ComplexityLabel::Technical => self.technical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    /// Queries with at most this many tokens are "simple" (absent signals).
    pub simple_max_tokens: usize,
    /// Queries with at most this many tokens are "medium" (absent signals).
    pub medium_max_tokens: usize,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_max_tokens: 5,
            medium_max_tokens: 15,
        }
    }
}

// ── Top-level tuning table ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub buckets: BucketThresholds,
    pub base_sizes: BaseSizes,
    pub multipliers: LabelMultipliers,
    pub limits: SizeLimits,
    pub paragraph: ParagraphCorrection,
    pub result_hints: ResultHints,
    pub retrieval: RetrievalCounts,
    pub complexity: ComplexityThresholds,
    /// Overlap between consecutive chunks as a fraction of the final size.
    pub overlap_fraction: OverlapFraction,
    /// Backward search window for boundary-safe cuts, in bytes.
    pub boundary_tolerance: usize,
    /// Minimum normalized score for a label to appear as a secondary type.
    pub secondary_threshold: f64,
    /// Ranking boost applied to chunks matching a retrieval plan's soft
    /// content-type bias. Must stay a boost, never a filter.
    pub bias_boost: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapFraction(pub f64);

impl Default for OverlapFraction {
    fn default() -> Self {
        Self(0.25)
    }
}

impl OverlapFraction {
    /// The fraction clamped to its legal range [0.15, 0.35].
    pub fn clamped(&self) -> f64 {
        self.0.clamp(0.15, 0.35)
    }
}

impl Tuning {
    /// Load tuning from a TOML file, or defaults when `path` is `None`.
    /// Missing keys in the file fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TuningError> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            buckets: BucketThresholds::default(),
            base_sizes: BaseSizes::default(),
            multipliers: LabelMultipliers::default(),
            limits: SizeLimits::default(),
            paragraph: ParagraphCorrection::default(),
            result_hints: ResultHints::default(),
            retrieval: RetrievalCounts::default(),
            complexity: ComplexityThresholds::default(),
            overlap_fraction: OverlapFraction::default(),
            boundary_tolerance: 120,
            secondary_threshold: 0.4,
            bias_boost: 1.15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_thresholds() {
        let b = BucketThresholds::default();
        assert_eq!(b.bucket_for(0), SizeBucket::Small);
        assert_eq!(b.bucket_for(1023), SizeBucket::Small);
        assert_eq!(b.bucket_for(1024), SizeBucket::Medium);
        assert_eq!(b.bucket_for(5120), SizeBucket::Large);
        assert_eq!(b.bucket_for(20480), SizeBucket::Xlarge);
    }

    #[test]
    fn overlap_fraction_is_clamped() {
        assert_eq!(OverlapFraction(0.05).clamped(), 0.15);
        assert_eq!(OverlapFraction(0.25).clamped(), 0.25);
        assert_eq!(OverlapFraction(0.9).clamped(), 0.35);
    }

    #[test]
    fn partial_toml_overrides_merge_with_defaults() {
        let t: Tuning = toml::from_str(
            r#"
            boundary_tolerance = 64

            [limits]
            max_chunk = 1500
            "#,
        )
        .unwrap();
        assert_eq!(t.boundary_tolerance, 64);
        assert_eq!(t.limits.max_chunk, 1500);
        assert_eq!(t.limits.min_chunk, 200);
        assert_eq!(t.base_sizes.large, 800);
    }
}
