//! # sitesift
//!
//! Search a single web page for the passages that answer a question.
//!
//! sitesift fetches a page, reduces its markup to plain prose, splits the
//! prose into bounded chunks, and ranks the chunks against a
//! natural-language query. Searches can be tracked in a local `SQLite`
//! database along with their ranked results.
//!
//! ## Features
//!
//! - **Fetching**: browser-like HTTP with a reader-service fallback for
//!   script-rendered pages
//! - **Markup reduction**: ordered regex passes that drop scripts, page
//!   chrome, and tags
//! - **Chunking**: word groups sized from a token budget
//! - **Ranking**: strict, lenient, and longest-chunk tiers, so a non-empty
//!   page always yields results
//! - **`SQLite` Storage**: search lifecycle tracking and result persistence
//!
//! ## Example
//!
//! ```
//! use sitesift::chunking::WordChunker;
//! use sitesift::pipeline::analyze_page;
//!
//! let html = "<nav>Home</nav><p>Refunds are issued within 30 days.</p>";
//! let analysis = analyze_page(html, &WordChunker::new(), "refunds", 3, 500);
//! assert_eq!(analysis.ranked.chunks[0].content, "Refunds are issued within 30 days.");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod core;
pub mod error;
pub mod fetch;
pub mod markup;
pub mod pipeline;
pub mod search;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, FetchError, Result, StorageError};

// Re-export core domain types
pub use core::{
    Chunk, ContentContext, SearchRecord, SearchRequest, SearchStatus, StatusUpdate,
};

// Re-export pipeline types
pub use fetch::{FetchBackend, FetchConfig, FetchSource, HttpFetcher, RawContent};
pub use markup::reduce;
pub use pipeline::{PageAnalysis, Pipeline, SearchOutcome, analyze_page};
pub use search::{RankedResult, ScoringTier, rank};

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, SqliteStorage, Storage, StorageStats};

// Re-export chunking types
pub use chunking::{Chunker, WordChunker};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
