//! Chunk representation for sitesift.
//!
//! Chunks are bounded-size fragments of a page's reduced text. Each chunk
//! keeps its 1-based position in the original document, an estimated
//! token count, a coarse content-context label, and the relevance score
//! assigned by the ranker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chunks shorter than this many characters are labelled [`ContentContext::Heading`].
const HEADING_MAX_CHARS: usize = 100;

/// Represents a fragment of page text.
///
/// `chunk_index` reflects document order and is never renumbered after
/// creation. `relevance_score` starts at `0.0` and is written by the
/// ranker.
///
/// # Examples
///
/// ```
/// use sitesift::core::{Chunk, ContentContext};
///
/// let chunk = Chunk::new("The quick brown fox".to_string(), 1, 500);
/// assert_eq!(chunk.chunk_index, 1);
/// assert_eq!(chunk.estimated_tokens, 5);
/// assert_eq!(chunk.content_context, ContentContext::Heading);
/// assert_eq!(chunk.relevance_score, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text (words joined by single spaces).
    pub content: String,

    /// Estimated token count, `ceil(chars / 4)` clamped to the chunk budget.
    pub estimated_tokens: usize,

    /// Sequential position within the document (1-based).
    pub chunk_index: usize,

    /// Coarse classification of the page region this chunk came from.
    pub content_context: ContentContext,

    /// Relevance to the query in `[0, 1]`.
    pub relevance_score: f64,
}

impl Chunk {
    /// Creates a chunk, estimating its tokens and classifying its context.
    ///
    /// # Arguments
    ///
    /// * `content` - Chunk text.
    /// * `chunk_index` - 1-based position in the document.
    /// * `max_tokens` - Upper bound for the token estimate.
    #[must_use]
    pub fn new(content: String, chunk_index: usize, max_tokens: usize) -> Self {
        let estimated_tokens = estimate_tokens(&content, max_tokens);
        let content_context = ContentContext::classify(&content);
        Self {
            content,
            estimated_tokens,
            chunk_index,
            content_context,
            relevance_score: 0.0,
        }
    }

    /// Returns the content length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Checks if the chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns a copy of this chunk carrying `score`.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.relevance_score = score;
        self
    }

    /// Returns a preview of the chunk content (first N characters).
    ///
    /// # Arguments
    ///
    /// * `max_chars` - Maximum number of characters to include.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((end, _)) => &self.content[..end],
            None => &self.content,
        }
    }
}

/// Estimates token count as `ceil(chars / 4)`, clamped to `max_tokens`.
#[must_use]
pub fn estimate_tokens(content: &str, max_tokens: usize) -> usize {
    // Common approximation: ~4 chars per token
    content.chars().count().div_ceil(4).min(max_tokens)
}

/// Coarse classification of the page region a chunk likely came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentContext {
    /// Copyright notices and similar page-bottom boilerplate.
    Footer,
    /// Menus and navigation lists.
    Navigation,
    /// Short fragments, usually titles.
    Heading,
    /// Contact details.
    Contact,
    /// Body prose.
    Content,
}

impl ContentContext {
    /// Classifies chunk text. The checks are ordered and the first match wins.
    #[must_use]
    pub fn classify(content: &str) -> Self {
        let lower = content.to_lowercase();
        if lower.contains('©') || lower.contains("copyright") {
            Self::Footer
        } else if lower.contains("navigation") || lower.contains("menu") {
            Self::Navigation
        } else if content.chars().count() < HEADING_MAX_CHARS {
            Self::Heading
        } else if ["contact", "email", "phone"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Self::Contact
        } else {
            Self::Content
        }
    }

    /// Returns the lowercase label used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Footer => "footer",
            Self::Navigation => "navigation",
            Self::Heading => "heading",
            Self::Contact => "contact",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for ContentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "footer" => Ok(Self::Footer),
            "navigation" => Ok(Self::Navigation),
            "heading" => Ok(Self::Heading),
            "contact" => Ok(Self::Contact),
            "content" => Ok(Self::Content),
            other => Err(format!("unknown content context: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn long(prefix: &str) -> String {
        format!("{prefix} {}", "lorem ipsum dolor sit amet ".repeat(5))
    }

    #[test]
    fn test_chunk_new() {
        let chunk = Chunk::new("Hello there".to_string(), 3, 500);
        assert_eq!(chunk.content, "Hello there");
        assert_eq!(chunk.chunk_index, 3);
        assert_eq!(chunk.estimated_tokens, 3);
        assert!(chunk.relevance_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimate_tokens_clamped() {
        let text = "x".repeat(100);
        assert_eq!(estimate_tokens(&text, 500), 25);
        assert_eq!(estimate_tokens(&text, 10), 10);
        assert_eq!(estimate_tokens("", 10), 0);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        assert_eq!(estimate_tokens("世界世界", 500), 1);
    }

    #[test_case("© 2024 Example Inc.", ContentContext::Footer ; "copyright sign")]
    #[test_case("All rights reserved, Copyright Example", ContentContext::Footer ; "copyright word")]
    #[test_case("Main Menu Home About", ContentContext::Navigation ; "menu")]
    #[test_case("Skip navigation", ContentContext::Navigation ; "navigation")]
    #[test_case("Contact us", ContentContext::Heading ; "short contact is heading")]
    #[test_case("Welcome", ContentContext::Heading ; "short text")]
    fn test_classify_short(text: &str, expected: ContentContext) {
        assert_eq!(ContentContext::classify(text), expected);
    }

    #[test]
    fn test_classify_long_contact() {
        assert_eq!(
            ContentContext::classify(&long("Email us at hello@example.com")),
            ContentContext::Contact
        );
        assert_eq!(
            ContentContext::classify(&long("Call our phone line")),
            ContentContext::Contact
        );
    }

    #[test]
    fn test_classify_long_content() {
        assert_eq!(
            ContentContext::classify(&long("Rust is a systems language.")),
            ContentContext::Content
        );
    }

    #[test]
    fn test_heading_threshold_counts_chars() {
        // 99 chars, 198 bytes
        let short = "é".repeat(HEADING_MAX_CHARS - 1);
        assert_eq!(ContentContext::classify(&short), ContentContext::Heading);

        let at_limit = "é".repeat(HEADING_MAX_CHARS);
        assert_eq!(ContentContext::classify(&at_limit), ContentContext::Content);
    }

    #[test]
    fn test_footer_wins_over_navigation() {
        assert_eq!(
            ContentContext::classify("menu copyright"),
            ContentContext::Footer
        );
    }

    #[test]
    fn test_context_round_trip_str() {
        for ctx in [
            ContentContext::Footer,
            ContentContext::Navigation,
            ContentContext::Heading,
            ContentContext::Contact,
            ContentContext::Content,
        ] {
            assert_eq!(ctx.as_str().parse::<ContentContext>(), Ok(ctx));
        }
        assert!("sidebar".parse::<ContentContext>().is_err());
    }

    #[test]
    fn test_chunk_preview() {
        let chunk = Chunk::new("Hello, world!".to_string(), 1, 500);
        assert_eq!(chunk.preview(5), "Hello");
        assert_eq!(chunk.preview(100), "Hello, world!");

        let chunk = Chunk::new("世界世界".to_string(), 1, 500);
        assert_eq!(chunk.preview(2), "世界");
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = Chunk::new("test".to_string(), 1, 500).with_score(0.5);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"content_context\":\"heading\""));

        let deserialized: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, chunk);
    }
}
