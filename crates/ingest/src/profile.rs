//! Structural profiling of raw document text.
//!
//! The profile feeds the chunk-size calculator: size bucket picks the base
//! chunk size, paragraph statistics drive the structural corrections.

use serde::Serialize;

use sift_core::tuning::{BucketThresholds, SizeBucket};

/// Structural statistics of one document version. Computed once; the
/// strategy derived from it is a pure function, so identical text always
/// profiles identically.
#[derive(Debug, Clone, Serialize)]
pub struct FileProfile {
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
    pub paragraphs: usize,
    pub avg_line_len: f64,
    pub avg_paragraph_len: f64,
    pub bucket: SizeBucket,
    /// Empty or whitespace-only input. The pipeline skips chunking for
    /// these and reports a warning instead of failing the batch.
    pub empty: bool,
}

pub fn profile(text: &str, buckets: &BucketThresholds) -> FileProfile {
    if text.trim().is_empty() {
        return FileProfile {
            chars: text.len(),
            words: 0,
            lines: 0,
            paragraphs: 0,
            avg_line_len: 0.0,
            avg_paragraph_len: 0.0,
            bucket: SizeBucket::Small,
            empty: true,
        };
    }

    let chars = text.len();
    let words = text.split_whitespace().count();
    let lines = text.lines().count();
    let paragraphs = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count()
        .max(1);

    FileProfile {
        chars,
        words,
        lines,
        paragraphs,
        avg_line_len: chars as f64 / lines.max(1) as f64,
        avg_paragraph_len: chars as f64 / paragraphs as f64,
        bucket: buckets.bucket_for(chars),
        empty: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_profile(text: &str) -> FileProfile {
        profile(text, &BucketThresholds::default())
    }

    #[test]
    fn empty_and_whitespace_are_flagged() {
        assert!(default_profile("").empty);
        assert!(default_profile("   \n\n\t  ").empty);
        assert!(!default_profile("one word").empty);
    }

    #[test]
    fn counts_basic_structure() {
        let p = default_profile("First paragraph here.\n\nSecond one.\nWith two lines.");
        assert_eq!(p.paragraphs, 2);
        assert_eq!(p.lines, 3);
        assert_eq!(p.words, 8);
        assert!(p.avg_paragraph_len > 0.0);
    }

    #[test]
    fn bucket_follows_char_count() {
        let small = default_profile("short");
        assert_eq!(small.bucket, SizeBucket::Small);

        let big = "x".repeat(30_000);
        assert_eq!(default_profile(&big).bucket, SizeBucket::Xlarge);
    }

    #[test]
    fn single_block_counts_one_paragraph() {
        let p = default_profile("no blank lines at all, just one run of text");
        assert_eq!(p.paragraphs, 1);
        assert_eq!(p.avg_paragraph_len, p.chars as f64);
    }
}
