//! Tests for the chunking engine.

use sift_core::label::ContentLabel;
use sift_core::tuning::SizeBucket;

use crate::strategy::ChunkingStrategy;

use super::chunk_text;

fn strategy(size: usize, overlap: usize) -> ChunkingStrategy {
    ChunkingStrategy {
        bucket: SizeBucket::Medium,
        label: ContentLabel::Generic,
        base: size,
        multiplier: 1.0,
        size,
        overlap,
        result_hint: 5,
        tag: "medium_generic".to_string(),
    }
}

fn prose(paragraphs: usize) -> String {
    let para = "The archive service accepts uploads around the clock. Each file is \
                scanned, catalogued, and shelved by the on-duty librarian. Retrieval \
                requests are honored in the order they arrive.";
    vec![para; paragraphs].join("\n\n")
}

/// Reassemble the original text by trimming each chunk's leading overlap.
fn reassemble(chunks: &[super::Chunk]) -> String {
    let mut out = String::new();
    let mut prev_end = 0usize;
    for chunk in chunks {
        let lead = prev_end - chunk.start;
        out.push_str(&chunk.text[lead..]);
        prev_end = chunk.end;
    }
    out
}

// ── Shape ───────────────────────────────────────────────────────────

#[test]
fn empty_text_produces_no_chunks() {
    assert!(chunk_text("", &strategy(300, 75), 60).is_empty());
}

#[test]
fn short_document_is_one_chunk_without_overlap() {
    let text = "Fits comfortably in a single chunk.";
    let chunks = chunk_text(text, &strategy(300, 75), 60);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].start, 0);
    assert_eq!(chunks[0].end, text.len());
    assert_eq!(chunks[0].text, text);
}

#[test]
fn sequence_indices_are_ordered_and_gap_free() {
    let text = prose(8);
    let chunks = chunk_text(&text, &strategy(300, 75), 60);
    assert!(chunks.len() > 1);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.seq, i);
        assert!(c.end > c.start);
        if i > 0 {
            // No gaps: each chunk starts at or before the previous end.
            assert!(c.start <= chunks[i - 1].end);
            assert!(c.start > chunks[i - 1].start, "forward progress");
        }
    }
    assert_eq!(chunks.last().unwrap().end, text.len());
}

#[test]
fn chunk_length_never_exceeds_size() {
    let text = prose(10);
    let strat = strategy(300, 75);
    for chunk in chunk_text(&text, &strat, 60) {
        assert!(
            chunk.text.len() <= strat.size,
            "chunk of {} bytes exceeds size {}",
            chunk.text.len(),
            strat.size
        );
    }
}

// ── Determinism & round-trip ────────────────────────────────────────

#[test]
fn identical_inputs_yield_identical_boundaries() {
    let text = prose(12);
    let strat = strategy(400, 100);
    let a = chunk_text(&text, &strat, 80);
    let b = chunk_text(&text, &strat, 80);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!((x.start, x.end), (y.start, y.end));
        assert_eq!(x.text, y.text);
    }
}

#[test]
fn trimming_leading_overlap_reconstructs_the_text() {
    for paragraphs in [1, 3, 7, 20] {
        let text = prose(paragraphs);
        let chunks = chunk_text(&text, &strategy(350, 90), 70);
        assert_eq!(reassemble(&chunks), text, "{paragraphs} paragraphs");
    }
}

#[test]
fn consecutive_chunks_overlap_exactly() {
    let text = prose(10);
    let strat = strategy(300, 75);
    let chunks = chunk_text(&text, &strat, 60);
    assert!(chunks.len() > 2);
    for pair in chunks.windows(2) {
        let shared = pair[0].end - pair[1].start;
        assert_eq!(shared, strat.overlap);
        // The shared bytes really are shared text.
        let tail = &pair[0].text[pair[0].text.len() - shared..];
        let head = &pair[1].text[..shared];
        assert_eq!(tail, head);
    }
}

// ── Boundary safety ─────────────────────────────────────────────────

#[test]
fn cuts_never_split_words_in_normal_prose() {
    let text = prose(10);
    let chunks = chunk_text(&text, &strategy(300, 75), 60);
    for chunk in &chunks[..chunks.len() - 1] {
        let before = text[..chunk.end].chars().next_back().unwrap();
        assert!(
            before.is_whitespace() || before.is_ascii_punctuation(),
            "boundary at {} lands after {:?}",
            chunk.end,
            before
        );
    }
}

#[test]
fn paragraph_breaks_are_preferred_over_sentence_ends() {
    // A paragraph break sits inside the tolerance window; the cut must
    // land right after it even though sentence ends and whitespace are
    // nearer the proposed offset.
    let first = "Short opening paragraph.";
    let filler = "One two. Three four. Five six. Seven eight nine ten more words.";
    let text = format!("{first}\n\n{filler} {filler}");
    let size = first.len() + 22;
    let chunks = chunk_text(&text, &strategy(size, 10), size / 2);
    assert!(chunks.len() > 1);
    assert_eq!(chunks[0].end, first.len() + 2, "cut should follow the blank line");
}

#[test]
fn unbroken_text_gets_a_hard_cut_at_the_offset() {
    let text = "x".repeat(1000);
    let strat = strategy(300, 75);
    let chunks = chunk_text(&text, &strat, 60);
    assert!(chunks.len() > 1);
    assert_eq!(chunks[0].end, 300);
    assert_eq!(chunks[1].start, 225);
}

#[test]
fn multibyte_text_is_cut_on_char_boundaries() {
    // Building the chunk texts would panic on a mid-char slice, so this
    // doubles as the grapheme-safety check.
    let text = "データ取り込みの手順。".repeat(120);
    let chunks = chunk_text(&text, &strategy(250, 60), 50);
    assert!(chunks.len() > 1);
    assert_eq!(reassemble(&chunks), text);
    for c in &chunks {
        assert!(text.is_char_boundary(c.start));
        assert!(text.is_char_boundary(c.end));
    }
}

// ── Degenerate strategies ───────────────────────────────────────────

#[test]
fn overlap_larger_than_size_still_terminates() {
    let text = prose(6);
    let mut strat = strategy(100, 100);
    strat.overlap = 250; // larger than size: progress clamp must kick in
    let chunks = chunk_text(&text, &strat, 40);
    assert!(!chunks.is_empty());
    for pair in chunks.windows(2) {
        assert!(pair[1].start > pair[0].start);
    }
    assert_eq!(chunks.last().unwrap().end, text.len());
}

#[test]
fn final_chunk_may_be_short() {
    let text = prose(5);
    let chunks = chunk_text(&text, &strategy(300, 75), 60);
    let last = chunks.last().unwrap();
    assert!(last.text.len() <= 300);
    assert_eq!(last.end, text.len());
}
