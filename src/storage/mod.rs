//! Storage layer for sitesift.
//!
//! Provides the status-tracking store and the persistence sink for ranked
//! results using `SQLite`, with proper transaction support.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageStats};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".sitesift/sitesift.db";
