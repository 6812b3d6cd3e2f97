//! Error types for sitesift operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! fetch stage, storage, request validation, and CLI commands. The
//! reduce, chunk, and rank stages are total functions and have no error
//! variants of their own.

use thiserror::Error;

/// Result type alias for sitesift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Content fetch errors (network, HTTP status, content type).
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// A search request failed validation.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Why the request was rejected.
        message: String,
    },

    /// Generic I/O error (local files, stdout).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised while retrieving page content.
///
/// Only the primary request can produce these; failures of the reader
/// fallback are logged and swallowed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or is not http(s).
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connection, TLS, timeout, or body read failure.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
    },

    /// The declared content type is not HTML-compatible.
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType {
        /// Declared content type, or `<none>` when the header was absent.
        content_type: String,
    },

    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("sitesift not initialized. Run: sitesift init")]
    NotInitialized,

    /// Search record not found by ID.
    #[error("search not found: {id}")]
    SearchNotFound {
        /// Search ID that was not found.
        id: i64,
    },

    /// A status change that the lifecycle does not allow.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

// Implement From traits for external errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
