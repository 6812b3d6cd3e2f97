//! Content fetching.
//!
//! [`HttpFetcher`] issues one browser-like GET for the page. When the
//! response looks script-rendered (too short, or no `<body`), it asks a
//! reader service for a plain-text rendering and keeps whichever result
//! is longer. Reader failures never fail the fetch.

mod config;
mod http;
mod reader;

pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_MIN_CONTENT_CHARS,
    DEFAULT_READER_ENDPOINT, DEFAULT_READER_USER_AGENT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    FetchConfig,
};
pub use http::{HttpFetcher, is_html_content_type};
pub use reader::ReaderClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Where the body of a [`RawContent`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    /// The page itself.
    Primary,
    /// The reader service fallback.
    Reader,
}

impl FetchSource {
    /// Returns the source name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Reader => "reader",
        }
    }
}

impl std::fmt::Display for FetchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched page body plus response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    /// Requested URL.
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    /// HTTP status of the primary response.
    pub status: u16,
    /// Declared content type of the body.
    pub content_type: String,
    /// Response body.
    pub body: String,
    /// Which retrieval produced `body`.
    pub source: FetchSource,
}

impl RawContent {
    /// Body length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.chars().count()
    }

    /// True when the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A source of page content.
///
/// Implementors must be shareable across concurrent pipeline runs.
#[async_trait]
pub trait FetchBackend: Send + Sync {
    /// Retrieves the page at `url`.
    async fn fetch(&self, url: &str) -> Result<RawContent, FetchError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
