//! The splitting algorithm.

use crate::strategy::ChunkingStrategy;

use super::types::Chunk;

/// Split `text` according to `strategy`. `tolerance` bounds the backward
/// boundary search, in bytes (capped at half the chunk size).
///
/// Guarantees: chunks cover the text with no gaps; consecutive chunks
/// overlap by exactly `strategy.overlap` bytes except where the
/// forward-progress clamp applies; every chunk is at most `strategy.size`
/// bytes; a document that fits in one chunk gets exactly one, with no
/// overlap. Deterministic: identical inputs yield identical boundaries.
pub fn chunk_text(text: &str, strategy: &ChunkingStrategy, tolerance: usize) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    let size = strategy.size.max(1);
    // Overlap must leave room for progress even if a caller hands us a
    // degenerate strategy.
    let overlap = strategy.overlap.min(size.saturating_sub(1));
    let tolerance = tolerance.clamp(1, (size / 2).max(1));

    if text.len() <= size {
        return vec![Chunk {
            seq: 0,
            text: text.to_string(),
            start: 0,
            end: text.len(),
        }];
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut start = 0usize;

    loop {
        let proposed = floor_char_boundary(text, (start + size).min(text.len()));
        let end = if proposed >= text.len() {
            text.len()
        } else {
            find_cut(text, start, proposed, tolerance)
        };
        // A multi-byte floor can in principle pull the cut back to `start`;
        // force at least one character so every chunk satisfies end > start.
        let end = end.max(ceil_char_boundary(text, start + 1));

        chunks.push(Chunk {
            seq: chunks.len(),
            text: text[start..end].to_string(),
            start,
            end,
        });

        if end >= text.len() {
            break;
        }

        // Next chunk starts exactly `overlap` bytes back, clamped so it is
        // strictly past the previous start — guarantees termination even
        // when overlap ≥ size.
        let mut next = floor_char_boundary(text, end.saturating_sub(overlap));
        if next <= start {
            next = ceil_char_boundary(text, start + 1);
        }
        start = next;
    }

    chunks
}

/// Pick the cut for a chunk beginning at `start` whose raw end would be
/// `proposed`. Searches backward through the tolerance window for, in
/// order of preference: the nearest paragraph break, the nearest
/// sentence-ending punctuation followed by whitespace, the nearest
/// whitespace. Falls back to a hard cut at `proposed`.
fn find_cut(text: &str, start: usize, proposed: usize, tolerance: usize) -> usize {
    let bytes = text.as_bytes();
    let window_start = proposed.saturating_sub(tolerance).max(start + 1);

    let mut sentence: Option<usize> = None;
    let mut whitespace: Option<usize> = None;

    let mut p = proposed;
    while p >= window_start {
        let prev = bytes[p - 1];
        if prev == b'\n' && p >= 2 && bytes[p - 2] == b'\n' {
            // Nearest paragraph break wins outright.
            return p;
        }
        if sentence.is_none()
            && matches!(prev, b'.' | b'!' | b'?')
            && bytes.get(p).is_some_and(|b| b.is_ascii_whitespace())
        {
            sentence = Some(p);
        }
        if whitespace.is_none() && prev.is_ascii_whitespace() {
            whitespace = Some(p);
        }
        p -= 1;
    }

    sentence.or(whitespace).unwrap_or(proposed)
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
