//! Chunking strategies for sitesift.
//!
//! This module provides a trait-based system for splitting reduced page
//! text into bounded-size chunks. The word chunker is the only strategy
//! the pipeline uses; the trait keeps the seam open for others.

pub mod traits;
pub mod word;

pub use traits::Chunker;
pub use word::WordChunker;

/// Creates the default chunker (word groups).
#[must_use]
pub const fn default_chunker() -> WordChunker {
    WordChunker::new()
}
