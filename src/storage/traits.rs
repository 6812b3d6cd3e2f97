//! Storage trait definition.
//!
//! Defines the status-tracking store and the persistence sink the
//! pipeline reports into, enabling pluggable storage implementations.

use crate::core::{Chunk, SearchRecord, SearchRequest, StatusUpdate};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent storage backends.
///
/// Implementations track search lifecycles and keep the ranked chunks of
/// completed searches. Batch writes should be atomic.
pub trait Storage: Send {
    /// Initializes storage (creates schema, runs migrations).
    ///
    /// Should be idempotent - safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    fn init(&mut self) -> Result<()>;

    /// Checks if storage is initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes all searches and results but preserves the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn reset(&mut self) -> Result<()>;

    // ==================== Status Store ====================

    /// Records a new `pending` search and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be inserted.
    fn create_search(&mut self, request: &SearchRequest) -> Result<i64>;

    /// Applies a status transition.
    ///
    /// Fields left as `None` in `update` keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SearchNotFound` for an unknown ID and
    /// `StorageError::InvalidTransition` if the lifecycle forbids the move.
    fn update_status(&mut self, search_id: i64, update: &StatusUpdate) -> Result<()>;

    /// Retrieves a search record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_search(&self, search_id: i64) -> Result<Option<SearchRecord>>;

    /// Lists the most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_searches(&self, limit: usize) -> Result<Vec<SearchRecord>>;

    /// Deletes a search and its results.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SearchNotFound` if nothing was deleted.
    fn delete_search(&mut self, search_id: i64) -> Result<()>;

    // ==================== Persistence Sink ====================

    /// Stores an ordered batch of ranked chunks.
    ///
    /// Rank is the position in `chunks`, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the search does not exist or insertion fails.
    fn save_results(&mut self, search_id: i64, chunks: &[Chunk]) -> Result<()>;

    /// Retrieves stored chunks in rank order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_results(&self, search_id: i64) -> Result<Vec<Chunk>>;

    // ==================== Utility Operations ====================

    /// Gets storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    fn stats(&self) -> Result<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of searches stored.
    pub search_count: usize,
    /// Searches still pending.
    pub pending_count: usize,
    /// Searches currently processing.
    pub processing_count: usize,
    /// Searches that completed.
    pub completed_count: usize,
    /// Searches that failed.
    pub failed_count: usize,
    /// Total stored result chunks.
    pub result_count: usize,
    /// Mean processing time of completed searches.
    pub avg_processing_time_ms: Option<f64>,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
