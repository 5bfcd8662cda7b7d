use serde::{Deserialize, Serialize};

/// Textual pattern of a document, detected by the content classifier.
/// `Generic` is the default when no signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLabel {
    Conversational,
    Faq,
    Generic,
    Lists,
    Procedures,
    Technical,
}

impl ContentLabel {
    /// All labels in lexical order — the classifier's deterministic
    /// tie-break order.
    pub const ALL: [ContentLabel; 6] = [
        ContentLabel::Conversational,
        ContentLabel::Faq,
        ContentLabel::Generic,
        ContentLabel::Lists,
        ContentLabel::Procedures,
        ContentLabel::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLabel::Conversational => "conversational",
            ContentLabel::Faq => "faq",
            ContentLabel::Generic => "generic",
            ContentLabel::Lists => "lists",
            ContentLabel::Procedures => "procedures",
            ContentLabel::Technical => "technical",
        }
    }
}

impl std::fmt::Display for ContentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected answer breadth of a query. Drives how many chunks the
/// planner retrieves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLabel {
    Simple,
    Medium,
    Complex,
    Technical,
}

impl ComplexityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLabel::Simple => "simple",
            ComplexityLabel::Medium => "medium",
            ComplexityLabel::Complex => "complex",
            ComplexityLabel::Technical => "technical",
        }
    }
}

impl std::fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_labels_are_lexically_ordered() {
        let mut sorted = ContentLabel::ALL.to_vec();
        sorted.sort_by_key(|l| l.as_str());
        assert_eq!(sorted.as_slice(), &ContentLabel::ALL);
    }

    #[test]
    fn serde_roundtrip_uses_lowercase() {
        let json = serde_json::to_string(&ContentLabel::Faq).unwrap();
        assert_eq!(json, "\"faq\"");
        let back: ContentLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ContentLabel::Faq);
    }
}
