//! Core domain models for sitesift.
//!
//! This module contains the data structures shared by every pipeline
//! stage: chunks, the search request, and the search lifecycle records.
//! These are pure domain models with no I/O dependencies.

pub mod chunk;
pub mod request;
pub mod search;

pub use chunk::{Chunk, ContentContext, estimate_tokens};
pub use request::{DEFAULT_MAX_RESULTS, DEFAULT_MAX_TOKENS_PER_CHUNK, SearchRequest};
pub use search::{SearchRecord, SearchStatus, StatusUpdate};
