use serde::{Deserialize, Serialize};

/// Unique document identifier, assigned by the extractor collaborator
/// (typically a filename or upstream record key).
pub type DocId = String;

/// A document as handed to ingestion: already-decoded character text.
/// Binary parsing (PDF, Word, ...) happens upstream — by the time a
/// document reaches this crate it is plain text plus a format tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub format: FormatTag,
}

impl SourceDocument {
    pub fn new(id: impl Into<DocId>, text: impl Into<String>, format: FormatTag) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            format,
        }
    }
}

/// Format tag attached by the extractor. Unknown tags are valid input —
/// they resolve to the generic text capability at ingestion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    #[default]
    Text,
    Markdown,
    Json,
    Csv,
    Log,
    Unknown,
}

impl FormatTag {
    /// Map a file extension (without the dot) to a format tag.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" => FormatTag::Text,
            "md" | "markdown" => FormatTag::Markdown,
            "json" => FormatTag::Json,
            "csv" => FormatTag::Csv,
            "log" | "ini" | "cfg" | "conf" => FormatTag::Log,
            _ => FormatTag::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Text => "text",
            FormatTag::Markdown => "markdown",
            FormatTag::Json => "json",
            FormatTag::Csv => "csv",
            FormatTag::Log => "log",
            FormatTag::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
