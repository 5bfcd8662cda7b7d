//! Query-complexity classification.
//!
//! Signal phrases take precedence over token-count thresholds; ties and
//! signal-free queries fall back to length. Always resolves to a label —
//! classification never fails.

use serde::Serialize;

use sift_core::label::ComplexityLabel;
use sift_core::tuning::ComplexityThresholds;

/// Swappable classification seam, mirroring the content classifier's.
pub trait QueryClassifier: Send + Sync {
    fn classify(&self, query: &str) -> QueryProfile;
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryProfile {
    pub tokens: usize,
    /// Signal phrases that matched, for observability.
    pub signals: Vec<String>,
    pub label: ComplexityLabel,
}

pub struct PhraseClassifier {
    complex: Vec<String>,
    simple: Vec<String>,
    technical: Vec<String>,
    thresholds: ComplexityThresholds,
}

impl PhraseClassifier {
    pub fn new(thresholds: ComplexityThresholds) -> Self {
        let own = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            complex: own(&[
                "how many",
                "what are the types of",
                "types of",
                "list all",
                "steps to",
                "how to",
                "explain",
                "describe",
                "compare",
                "difference",
                "versus",
                "breakdown",
                "comprehensive",
                "detailed",
                "complete",
            ]),
            simple: own(&[
                "what is",
                "define",
                "meaning",
                "who is",
                "when",
                "where",
                "which",
                "name",
            ]),
            technical: own(&[
                "function",
                "method",
                "class",
                "api",
                "code",
                "syntax",
                "error",
                "debug",
                "implement",
                "algorithm",
            ]),
            thresholds,
        }
    }

    /// Replace the default phrase sets.
    pub fn with_phrases(
        mut self,
        complex: Vec<String>,
        simple: Vec<String>,
        technical: Vec<String>,
    ) -> Self {
        self.complex = complex;
        self.simple = simple;
        self.technical = technical;
        self
    }

    fn matches<'a>(query: &str, phrases: &'a [String]) -> Vec<&'a str> {
        phrases
            .iter()
            .filter(|p| query.contains(p.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl QueryClassifier for PhraseClassifier {
    fn classify(&self, query: &str) -> QueryProfile {
        let lowered = query.to_lowercase();
        let tokens = lowered.split_whitespace().count();

        let technical = Self::matches(&lowered, &self.technical);
        let complex = Self::matches(&lowered, &self.complex);
        let simple = Self::matches(&lowered, &self.simple);

        let mut signals: Vec<String> = technical
            .iter()
            .chain(&complex)
            .chain(&simple)
            .map(|s| s.to_string())
            .collect();
        signals.sort();
        signals.dedup();

        // Signals outrank length; a dead heat between simple and complex
        // vocabulary is ambiguous and lands on medium.
        let label = if !technical.is_empty() {
            ComplexityLabel::Technical
        } else if complex.len() > simple.len() {
            ComplexityLabel::Complex
        } else if simple.len() > complex.len() {
            ComplexityLabel::Simple
        } else if !complex.is_empty() {
            ComplexityLabel::Medium
        } else if tokens <= self.thresholds.simple_max_tokens {
            ComplexityLabel::Simple
        } else if tokens <= self.thresholds.medium_max_tokens {
            ComplexityLabel::Medium
        } else {
            ComplexityLabel::Complex
        };

        QueryProfile {
            tokens,
            signals,
            label,
        }
    }
}

impl Default for PhraseClassifier {
    fn default() -> Self {
        Self::new(ComplexityThresholds::default())
    }
}
