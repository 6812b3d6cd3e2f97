//! `SQLite` storage implementation.
//!
//! Provides persistent storage using `SQLite` with proper transaction
//! management and migration support.

// SQLite stores all integers as i64. These casts are intentional and safe
// because we only store non-negative values that fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use crate::core::{Chunk, ContentContext, SearchRecord, SearchRequest, SearchStatus, StatusUpdate};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{Storage, StorageStats};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

const SEARCH_COLUMNS: &str = r"
    id, website_url, search_query, max_results, max_tokens_per_chunk, status,
    processing_time_ms, results_count, total_chunks, error_message,
    scoring_tier, fetch_source, created_at, updated_at
";

/// SQLite-based storage implementation.
///
/// Provides persistent storage for search records and ranked results with
/// full ACID guarantees.
///
/// # Examples
///
/// ```no_run
/// use sitesift::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::open(".sitesift/sitesift.db").unwrap();
/// storage.init().unwrap();
/// ```
pub struct SqliteStorage {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database file. Missing parent directories are
    ///   created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        // journal_mode returns a row, so it has to go through query_row
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Returns current Unix timestamp.
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized()? {
            Ok(())
        } else {
            Err(StorageError::NotInitialized.into())
        }
    }

    fn count_with_status(&self, status: SearchStatus) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM searches WHERE status = ?",
                params![status.as_str()],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }
}

fn search_from_row(row: &Row<'_>) -> rusqlite::Result<SearchRecord> {
    let status: String = row.get(5)?;
    let status = status.parse::<SearchStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(SearchRecord {
        id: row.get(0)?,
        website_url: row.get(1)?,
        search_query: row.get(2)?,
        max_results: row.get::<_, i64>(3)? as usize,
        max_tokens_per_chunk: row.get::<_, i64>(4)? as usize,
        status,
        processing_time_ms: row.get::<_, Option<i64>>(6)?.map(|v| v as u64),
        results_count: row.get::<_, Option<i64>>(7)?.map(|v| v as usize),
        total_chunks: row.get::<_, Option<i64>>(8)?.map(|v| v as usize),
        error_message: row.get(9)?,
        scoring_tier: row.get(10)?,
        fetch_source: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn result_from_row(row: &Row<'_>) -> rusqlite::Result<Chunk> {
    let context: String = row.get(3)?;
    let content_context = context.parse::<ContentContext>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Chunk {
        chunk_index: row.get::<_, i64>(0)? as usize,
        content: row.get(1)?,
        estimated_tokens: row.get::<_, i64>(2)? as usize,
        content_context,
        relevance_score: row.get(4)?,
    })
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        let is_init: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;

        if is_init == 0 {
            // Fresh install
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        } else if let Some(current) = self.get_schema_version()?
            && current < CURRENT_SCHEMA_VERSION
        {
            let tx = self
                .conn
                .transaction()
                .map_err(|e| StorageError::Transaction(e.to_string()))?;
            for migration in crate::storage::schema::get_migrations_from(current) {
                tx.execute_batch(migration.sql)
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
            }
            tx.execute(SET_VERSION_SQL, params![CURRENT_SCHEMA_VERSION.to_string()])
                .map_err(StorageError::from)?;
            tx.commit()
                .map_err(|e| StorageError::Transaction(e.to_string()))?;
        }

        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM search_results;
            DELETE FROM searches;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    // ==================== Status Store ====================

    fn create_search(&mut self, request: &SearchRequest) -> Result<i64> {
        self.require_initialized()?;
        let now = Self::now();

        self.conn
            .execute(
                r"
            INSERT INTO searches (
                website_url, search_query, max_results, max_tokens_per_chunk,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ",
                params![
                    request.website_url,
                    request.search_query,
                    request.max_results as i64,
                    request.max_tokens_per_chunk as i64,
                    SearchStatus::Pending.as_str(),
                    now,
                    now,
                ],
            )
            .map_err(StorageError::from)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_status(&mut self, search_id: i64, update: &StatusUpdate) -> Result<()> {
        let current = self
            .get_search(search_id)?
            .ok_or(StorageError::SearchNotFound { id: search_id })?;

        if let Some(next) = update.status
            && !current.status.can_transition_to(next)
        {
            return Err(StorageError::InvalidTransition {
                from: current.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        self.conn
            .execute(
                r"
            UPDATE searches SET
                status = COALESCE(?, status),
                processing_time_ms = COALESCE(?, processing_time_ms),
                results_count = COALESCE(?, results_count),
                total_chunks = COALESCE(?, total_chunks),
                error_message = COALESCE(?, error_message),
                scoring_tier = COALESCE(?, scoring_tier),
                fetch_source = COALESCE(?, fetch_source),
                updated_at = ?
            WHERE id = ?
        ",
                params![
                    update.status.map(SearchStatus::as_str),
                    update.processing_time_ms.map(|v| v as i64),
                    update.results_count.map(|v| v as i64),
                    update.total_chunks.map(|v| v as i64),
                    update.error_message,
                    update.scoring_tier,
                    update.fetch_source,
                    Self::now(),
                    search_id,
                ],
            )
            .map_err(StorageError::from)?;

        Ok(())
    }

    fn get_search(&self, search_id: i64) -> Result<Option<SearchRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {SEARCH_COLUMNS} FROM searches WHERE id = ?"),
                params![search_id],
                search_from_row,
            )
            .optional()
            .map_err(StorageError::from)?;

        Ok(record)
    }

    fn list_searches(&self, limit: usize) -> Result<Vec<SearchRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {SEARCH_COLUMNS} FROM searches ORDER BY id DESC LIMIT ?"
            ))
            .map_err(StorageError::from)?;

        let records = stmt
            .query_map(params![limit as i64], search_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(records)
    }

    fn delete_search(&mut self, search_id: i64) -> Result<()> {
        // Results are deleted automatically via CASCADE
        let deleted = self
            .conn
            .execute("DELETE FROM searches WHERE id = ?", params![search_id])
            .map_err(StorageError::from)?;

        if deleted == 0 {
            return Err(StorageError::SearchNotFound { id: search_id }.into());
        }
        Ok(())
    }

    // ==================== Persistence Sink ====================

    fn save_results(&mut self, search_id: i64, chunks: &[Chunk]) -> Result<()> {
        if self.get_search(search_id)?.is_none() {
            return Err(StorageError::SearchNotFound { id: search_id }.into());
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        let now = Self::now();

        {
            let mut stmt = tx
                .prepare(
                    r"
                INSERT INTO search_results (
                    search_id, rank, chunk_index, content, estimated_tokens,
                    content_context, relevance_score, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
                )
                .map_err(StorageError::from)?;

            for (rank, chunk) in chunks.iter().enumerate() {
                stmt.execute(params![
                    search_id,
                    (rank + 1) as i64,
                    chunk.chunk_index as i64,
                    chunk.content,
                    chunk.estimated_tokens as i64,
                    chunk.content_context.as_str(),
                    chunk.relevance_score,
                    now,
                ])
                .map_err(StorageError::from)?;
            }
        }

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(())
    }

    fn get_results(&self, search_id: i64) -> Result<Vec<Chunk>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT chunk_index, content, estimated_tokens, content_context, relevance_score
            FROM search_results WHERE search_id = ? ORDER BY rank
        ",
            )
            .map_err(StorageError::from)?;

        let chunks = stmt
            .query_map(params![search_id], result_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(chunks)
    }

    // ==================== Utility Operations ====================

    fn stats(&self) -> Result<StorageStats> {
        let search_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM searches", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let result_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM search_results", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let avg_processing_time_ms: Option<f64> = self
            .conn
            .query_row(
                "SELECT AVG(processing_time_ms) FROM searches WHERE status = 'completed'",
                [],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;

        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StorageStats {
            search_count: search_count as usize,
            pending_count: self.count_with_status(SearchStatus::Pending)?,
            processing_count: self.count_with_status(SearchStatus::Processing)?,
            completed_count: self.count_with_status(SearchStatus::Completed)?,
            failed_count: self.count_with_status(SearchStatus::Failed)?,
            result_count: result_count as usize,
            avg_processing_time_ms,
            schema_version,
            db_size,
        })
    }
}
