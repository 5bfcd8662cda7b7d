//! System-prompt assembly for the answer step.
//!
//! The prompt carries the retrieved chunks with their source and content
//! metadata, plus the trailing slice of conversation history so follow-up
//! questions ("that", "the previous step") resolve.

use std::collections::BTreeSet;

use sift_store::ScoredChunk;

use crate::generate::Exchange;

/// Exchanges included verbatim; older history is dropped to keep the
/// context bounded.
const HISTORY_WINDOW: usize = 3;

pub fn build_system_prompt(chunks: &[ScoredChunk], history: &[Exchange]) -> String {
    let sources: BTreeSet<&str> = chunks.iter().map(|c| c.meta.doc_id.as_str()).collect();
    let content_types: BTreeSet<&str> = chunks
        .iter()
        .map(|c| c.meta.content_type.as_str())
        .collect();

    let mut prompt = String::from(
        "You are a helpful assistant answering questions about the user's \
         document collection. Answer ONLY from the context below; when the \
         context does not contain the answer, say so instead of guessing.\n\n",
    );

    prompt.push_str(&format!(
        "Context drawn from {} source(s) [{}], content types [{}]:\n\n",
        sources.len(),
        sources.into_iter().collect::<Vec<_>>().join(", "),
        content_types.into_iter().collect::<Vec<_>>().join(", "),
    ));

    for (i, chunk) in chunks.iter().enumerate() {
        prompt.push_str(&format!(
            "[{}] (source: {}, type: {})\n{}\n\n",
            i + 1,
            chunk.meta.doc_id,
            chunk.meta.content_type,
            chunk.text.trim()
        ));
    }

    if !history.is_empty() {
        let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        prompt.push_str("Recent conversation:\n");
        for exchange in recent {
            prompt.push_str(&format!("Q: {}\n", exchange.question));
            prompt.push_str(&format!("A: {}\n", truncate(&exchange.answer, 200)));
        }
        prompt.push_str(
            "\nUse this history to resolve references in the new question and \
             avoid repeating earlier answers.\n",
        );
    }

    prompt
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut cut = max;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::label::ContentLabel;
    use sift_store::ChunkMeta;

    fn chunk(doc: &str, text: &str) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            meta: ChunkMeta {
                doc_id: doc.to_string(),
                seq: 0,
                start: 0,
                end: text.len(),
                content_type: ContentLabel::Generic,
                strategy: "small_generic".to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn prompt_carries_chunks_and_sources() {
        let chunks = vec![chunk("a.txt", "alpha facts"), chunk("b.txt", "beta facts")];
        let prompt = build_system_prompt(&chunks, &[]);
        assert!(prompt.contains("alpha facts"));
        assert!(prompt.contains("beta facts"));
        assert!(prompt.contains("a.txt"));
        assert!(prompt.contains("2 source(s)"));
    }

    #[test]
    fn history_window_keeps_the_last_three() {
        let history: Vec<Exchange> = (0..5)
            .map(|i| Exchange {
                question: format!("question {i}"),
                answer: format!("answer {i}"),
            })
            .collect();
        let prompt = build_system_prompt(&[chunk("a.txt", "text")], &history);
        assert!(!prompt.contains("question 0"));
        assert!(!prompt.contains("question 1"));
        assert!(prompt.contains("question 2"));
        assert!(prompt.contains("question 4"));
    }

    #[test]
    fn long_answers_are_truncated() {
        let history = vec![Exchange {
            question: "q".to_string(),
            answer: "x".repeat(500),
        }];
        let prompt = build_system_prompt(&[chunk("a.txt", "text")], &history);
        assert!(prompt.contains(&format!("{}...", "x".repeat(200))));
        assert!(!prompt.contains(&"x".repeat(201)));
    }
}
