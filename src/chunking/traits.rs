//! Chunker trait definition.
//!
//! Defines the interface for chunking strategies, enabling pluggable
//! text segmentation approaches.

use crate::core::Chunk;

/// Trait for splitting reduced page text into chunks.
///
/// Implementations must be `Send + Sync` so a single chunker can be shared
/// by concurrent pipeline runs. Chunking is total: empty input yields an
/// empty vector, never an error.
///
/// # Examples
///
/// ```
/// use sitesift::chunking::{Chunker, WordChunker};
///
/// let chunker = WordChunker::new();
/// let chunks = chunker.chunk("one two three four five six", 4);
/// assert_eq!(chunks.len(), 2);
/// ```
pub trait Chunker: Send + Sync {
    /// Chunks the input text.
    ///
    /// # Arguments
    ///
    /// * `text` - Reduced plain text.
    /// * `max_tokens_per_chunk` - Token budget for each chunk.
    ///
    /// # Returns
    ///
    /// Chunks in document order, indexed from 1.
    fn chunk(&self, text: &str, max_tokens_per_chunk: usize) -> Vec<Chunk>;

    /// Returns the name of the chunking strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the chunking strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }
}
