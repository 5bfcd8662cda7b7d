//! Rule-based content-type classification.
//!
//! Each label owns a set of signal patterns; a label's score is its
//! weighted match count normalized by text length, so long and short
//! documents are comparable. The scorer sits behind the [`Classifier`]
//! trait so a statistical classifier can replace it without touching the
//! chunker or the planner.

use regex::Regex;
use serde::Serialize;

use sift_core::label::ContentLabel;

/// Swappable classification seam: text in, per-label scores out.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> ContentScores;
}

/// Per-label scores plus the resolved primary/secondary labels.
#[derive(Debug, Clone, Serialize)]
pub struct ContentScores {
    /// Non-zero scores in lexical label order.
    pub scores: Vec<(ContentLabel, f64)>,
    /// Highest-scoring label with score > 0; ties resolve to the lexically
    /// smallest label; `Generic` when nothing fires.
    pub primary: ContentLabel,
    /// Remaining labels above the minor threshold, best first.
    pub secondary: Vec<ContentLabel>,
}

pub struct LabelRule {
    pub label: ContentLabel,
    pub weight: f64,
    pub signals: Vec<Regex>,
}

pub struct RuleClassifier {
    /// Sorted by label name at construction — scoring order is therefore
    /// independent of the order rules were supplied in.
    rules: Vec<LabelRule>,
    secondary_threshold: f64,
}

impl RuleClassifier {
    /// Build with the default signal registry.
    pub fn new(secondary_threshold: f64) -> Result<Self, regex::Error> {
        Self::with_rules(default_rules()?, secondary_threshold)
    }

    /// Build with a custom registry (rules may arrive in any order).
    pub fn with_rules(
        mut rules: Vec<LabelRule>,
        secondary_threshold: f64,
    ) -> Result<Self, regex::Error> {
        rules.sort_by_key(|r| r.label.as_str());
        Ok(Self {
            rules,
            secondary_threshold,
        })
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, text: &str) -> ContentScores {
        let lowered = text.to_lowercase();
        // Length factor: matches per ~1000 chars, floored so tiny inputs
        // are not inflated.
        let length_factor = (lowered.len() as f64 / 1000.0).max(1.0);

        let mut scores: Vec<(ContentLabel, f64)> = Vec::new();
        for rule in &self.rules {
            let raw: usize = rule
                .signals
                .iter()
                .map(|re| re.find_iter(&lowered).count())
                .sum();
            if raw > 0 {
                let score = raw as f64 * rule.weight / length_factor;
                scores.push((rule.label, score));
            }
        }

        // Primary: strict `>` over the lexically-sorted rules makes the
        // tie-break deterministic regardless of input order.
        let mut primary = ContentLabel::Generic;
        let mut best = 0.0_f64;
        for (label, score) in &scores {
            if *score > best {
                best = *score;
                primary = *label;
            }
        }

        let mut secondary: Vec<(ContentLabel, f64)> = scores
            .iter()
            .filter(|(label, score)| *label != primary && *score >= self.secondary_threshold)
            .copied()
            .collect();
        secondary.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.as_str().cmp(b.0.as_str()))
        });

        ContentScores {
            scores,
            primary,
            secondary: secondary.into_iter().map(|(l, _)| l).collect(),
        }
    }
}

/// Default signal registry. Weights mirror the priority the retrieval
/// behavior depends on: procedure and list structure must win over the
/// conversational vocabulary that surrounds it.
pub fn default_rules() -> Result<Vec<LabelRule>, regex::Error> {
    fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
        patterns.iter().map(|p| Regex::new(p)).collect()
    }

    Ok(vec![
        LabelRule {
            label: ContentLabel::Procedures,
            weight: 2.0,
            signals: compile(&[
                r"step\s*\d+",
                r"how to",
                r"procedure|instructions?",
                r"tutorial|walkthrough|getting started",
                r"setup|installation",
                r"\bguide\b",
            ])?,
        },
        LabelRule {
            label: ContentLabel::Lists,
            weight: 2.0,
            signals: compile(&[
                r"(?m)^\s*[-*•]\s+",
                r"(?m)^\s*\d+[.)]\s+",
                r"types?\s+of",
                r"includes?:|following:|such as:|examples?:",
                r"supports.*types?",
                r"categories|options|approaches",
            ])?,
        },
        LabelRule {
            label: ContentLabel::Technical,
            weight: 1.5,
            signals: compile(&[
                r"\bapi\b",
                r"function|method|class|parameter",
                r"configuration|settings",
                r"\bsystem\b",
                r"select\s+.+\s+from|create\s+table",
                r"(?m)^\s*(import|from)\s+\w+",
                r"#!/",
            ])?,
        },
        LabelRule {
            label: ContentLabel::Faq,
            weight: 1.0,
            signals: compile(&[
                r"(?m)^\s*q[:.]",
                r"(?m)^\s*a[:.]",
                r"question:|answer:",
                r"what\s+is|how\s+do|why\s+does|can\s+i",
                r"frequently asked",
                r"(?m)\?\s*$",
            ])?,
        },
        LabelRule {
            label: ContentLabel::Conversational,
            weight: 1.0,
            signals: compile(&[
                r"\bi\s+(am|have|was|will|think)\b",
                r"\byou\s+(can|should|will|need)\b",
                r"\bwe\s+\w+",
                r"let's|here's",
                r"welcome|hello|okay",
            ])?,
        },
    ])
}
