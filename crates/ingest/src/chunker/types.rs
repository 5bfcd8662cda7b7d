use serde::Serialize;

/// A contiguous span of a document's text, stored as an independently
/// retrievable unit. Offsets are byte positions into the source text and
/// always fall on `char` boundaries; `end > start` for every chunk.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// 0-based position within the document's chunk sequence.
    pub seq: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
}
