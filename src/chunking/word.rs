//! Word-count chunking strategy.
//!
//! Splits text on whitespace and groups consecutive words, sizing each
//! group from the token budget at roughly 0.75 words per token.

use crate::chunking::traits::Chunker;
use crate::core::Chunk;

/// Chunker that groups a fixed number of words per chunk.
///
/// Chunk content is the group's words joined by single spaces, so joining
/// all chunks with spaces reproduces the input's word sequence.
///
/// # Examples
///
/// ```
/// use sitesift::chunking::{Chunker, WordChunker};
///
/// let chunks = WordChunker::new().chunk("a b c d e f", 4);
/// assert_eq!(chunks[0].content, "a b c");
/// assert_eq!(chunks[1].chunk_index, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordChunker;

impl WordChunker {
    /// Creates a new word chunker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Number of words per chunk for a token budget: `floor(max * 0.75)`,
    /// at least 1.
    #[must_use]
    pub const fn words_per_chunk(max_tokens_per_chunk: usize) -> usize {
        let words = max_tokens_per_chunk / 4 * 3 + max_tokens_per_chunk % 4 * 3 / 4;
        if words == 0 { 1 } else { words }
    }
}

impl Chunker for WordChunker {
    fn chunk(&self, text: &str, max_tokens_per_chunk: usize) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return vec![];
        }

        let per_chunk = Self::words_per_chunk(max_tokens_per_chunk);
        let mut chunks = Vec::with_capacity(words.len().div_ceil(per_chunk));

        for group in words.chunks(per_chunk) {
            let content = group.join(" ");
            if content.is_empty() {
                continue;
            }
            let index = chunks.len() + 1;
            chunks.push(Chunk::new(content, index, max_tokens_per_chunk));
        }

        chunks
    }

    fn name(&self) -> &'static str {
        "word"
    }

    fn description(&self) -> &'static str {
        "Whitespace word groups sized at ~0.75 words per token"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentContext;

    #[test]
    fn test_words_per_chunk() {
        assert_eq!(WordChunker::words_per_chunk(500), 375);
        assert_eq!(WordChunker::words_per_chunk(4), 3);
        assert_eq!(WordChunker::words_per_chunk(5), 3);
        assert_eq!(WordChunker::words_per_chunk(7), 5);
        assert_eq!(WordChunker::words_per_chunk(2), 1);
        assert_eq!(WordChunker::words_per_chunk(1), 1);
        assert_eq!(WordChunker::words_per_chunk(0), 1);
    }

    #[test]
    fn test_words_per_chunk_large_budget_does_not_overflow() {
        let words = WordChunker::words_per_chunk(usize::MAX);
        assert!(words > usize::MAX / 2);
    }

    #[test]
    fn test_empty_text() {
        let chunker = WordChunker::new();
        assert!(chunker.chunk("", 500).is_empty());
        assert!(chunker.chunk("  \n\t ", 500).is_empty());
    }

    #[test]
    fn test_six_words_budget_four() {
        let chunks = WordChunker::new().chunk("one two three four five six", 4);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_index, 1);
        assert_eq!(chunks[1].chunk_index, 2);
        assert_eq!(chunks[0].content, "one two three");
        assert_eq!(chunks[1].content, "four five six");
    }

    #[test]
    fn test_last_chunk_may_be_shorter() {
        let chunks = WordChunker::new().chunk("a b c d e f g", 4);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].content, "g");
    }

    #[test]
    fn test_whitespace_runs_and_newlines_are_separators() {
        let chunks = WordChunker::new().chunk("Title\n\nFirst   para.\nSecond", 500);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Title First para. Second");
    }

    #[test]
    fn test_token_estimate_is_clamped() {
        let text = "abcdefghijklmnopqrstuvwxyz ".repeat(3);
        // budget 4 -> 3 words of 26 chars -> 80 chars -> 20 tokens, clamped to 4
        let chunks = WordChunker::new().chunk(&text, 4);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].estimated_tokens, 4);
    }

    #[test]
    fn test_chunks_are_classified() {
        let chunks = WordChunker::new().chunk("Copyright 2024 Example", 500);
        assert_eq!(chunks[0].content_context, ContentContext::Footer);
    }

    #[test]
    fn test_scores_start_at_zero() {
        let chunks = WordChunker::new().chunk("a b c d e f", 2);
        assert_eq!(chunks.len(), 6);
        assert!(chunks.iter().all(|c| c.relevance_score == 0.0));
    }

    #[test]
    fn test_strategy_name() {
        let chunker = WordChunker::new();
        assert_eq!(chunker.name(), "word");
        assert!(chunker.description().contains("words"));
    }
}
