//! Format-capability registry.
//!
//! Documents arrive as already-decoded text; each format tag maps to a
//! capability that normalizes that text for profiling and chunking.
//! Unknown tags resolve to the generic text capability, and a failing
//! capability falls back to it too — only a generic failure (which cannot
//! happen for valid UTF-8 input) fails the document.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use sift_core::document::FormatTag;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed {format} content: {reason}")]
    Malformed { format: FormatTag, reason: String },
}

/// One per-format normalization capability.
pub trait Extractor: Send + Sync {
    fn extract(&self, raw: &str) -> Result<String, ExtractError>;
}

// ── Capabilities ──────────────────────────────────────────────

/// Generic capability: trim. Also the fallback for every other format.
struct PlainText;

impl Extractor for PlainText {
    fn extract(&self, raw: &str) -> Result<String, ExtractError> {
        Ok(raw.trim().to_string())
    }
}

/// Markdown keeps its markers — heading and list syntax are classifier
/// signals, not noise.
struct Markdown;

impl Extractor for Markdown {
    fn extract(&self, raw: &str) -> Result<String, ExtractError> {
        Ok(raw.trim().to_string())
    }
}

/// JSON gets a one-line structure summary ahead of the pretty-printed
/// body, so retrieval sees shape as well as values.
struct Json;

impl Extractor for Json {
    fn extract(&self, raw: &str) -> Result<String, ExtractError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ExtractError::Malformed {
                format: FormatTag::Json,
                reason: e.to_string(),
            })?;

        let summary = match &value {
            serde_json::Value::Object(map) => {
                let keys: Vec<&str> = map.keys().take(5).map(String::as_str).collect();
                format!("JSON object with {} keys: {}", map.len(), keys.join(", "))
            }
            serde_json::Value::Array(items) => {
                format!("JSON array with {} items", items.len())
            }
            _ => "JSON scalar value".to_string(),
        };

        let pretty = serde_json::to_string_pretty(&value).map_err(|e| ExtractError::Malformed {
            format: FormatTag::Json,
            reason: e.to_string(),
        })?;

        Ok(format!("{summary}\n\n{pretty}"))
    }
}

/// CSV keeps the header plus a bounded sample of rows, prefixed with a
/// column summary.
struct Csv {
    sample_rows: usize,
}

impl Extractor for Csv {
    fn extract(&self, raw: &str) -> Result<String, ExtractError> {
        let mut lines = raw.lines();
        let header = lines.next().ok_or_else(|| ExtractError::Malformed {
            format: FormatTag::Csv,
            reason: "no header line".to_string(),
        })?;

        let mut out = format!(
            "CSV data with columns: {}\n\n{header}\n",
            header.replace(',', ", ")
        );
        let mut extra = 0usize;
        for (i, line) in lines.enumerate() {
            if i < self.sample_rows {
                out.push_str(line);
                out.push('\n');
            } else {
                extra += 1;
            }
        }
        if extra > 0 {
            out.push_str(&format!("... ({extra} more rows)\n"));
        }
        Ok(out.trim_end().to_string())
    }
}

// ── Registry ──────────────────────────────────────────────────

pub struct ExtractorRegistry {
    capabilities: HashMap<FormatTag, Arc<dyn Extractor>>,
    generic: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        let generic: Arc<dyn Extractor> = Arc::new(PlainText);
        let mut capabilities: HashMap<FormatTag, Arc<dyn Extractor>> = HashMap::new();
        capabilities.insert(FormatTag::Text, generic.clone());
        capabilities.insert(FormatTag::Log, generic.clone());
        capabilities.insert(FormatTag::Markdown, Arc::new(Markdown));
        capabilities.insert(FormatTag::Json, Arc::new(Json));
        capabilities.insert(FormatTag::Csv, Arc::new(Csv { sample_rows: 10 }));
        Self {
            capabilities,
            generic,
        }
    }

    /// Register or replace a capability for a tag.
    pub fn register(&mut self, tag: FormatTag, extractor: Arc<dyn Extractor>) {
        self.capabilities.insert(tag, extractor);
    }

    /// Normalize text for a format. A failing format capability degrades
    /// to the generic one with a warning; unknown tags go straight to it.
    pub fn extract(&self, tag: FormatTag, raw: &str) -> Result<String, ExtractError> {
        match self.capabilities.get(&tag) {
            Some(cap) => match cap.extract(raw) {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!(format = %tag, error = %e, "capability failed, using generic text");
                    self.generic.extract(raw)
                }
            },
            None => self.generic.extract(raw),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
