//! Search request input contract.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of ranked chunks returned.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default token budget per chunk.
pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 500;

/// A single search: which page to read and what to look for.
///
/// Immutable for the duration of one pipeline run.
///
/// # Examples
///
/// ```
/// use sitesift::core::SearchRequest;
///
/// let request = SearchRequest::new("https://example.com", "pricing plans");
/// assert_eq!(request.max_results, 10);
/// assert_eq!(request.max_tokens_per_chunk, 500);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Absolute http(s) URL of the page to search.
    pub website_url: String,
    /// Natural-language query.
    pub search_query: String,
    /// Maximum number of chunks to return.
    pub max_results: usize,
    /// Token budget per chunk.
    pub max_tokens_per_chunk: usize,
}

impl SearchRequest {
    /// Creates a request with default limits.
    #[must_use]
    pub fn new(website_url: impl Into<String>, search_query: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            search_query: search_query.into(),
            max_results: DEFAULT_MAX_RESULTS,
            max_tokens_per_chunk: DEFAULT_MAX_TOKENS_PER_CHUNK,
        }
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the per-chunk token budget.
    #[must_use]
    pub const fn with_max_tokens_per_chunk(mut self, max_tokens: usize) -> Self {
        self.max_tokens_per_chunk = max_tokens;
        self
    }

    /// Checks the request before any network traffic happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the URL is not an absolute
    /// http(s) URL, the query is blank, or either limit is zero.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.website_url).map_err(|e| {
            Error::invalid_request(format!("website_url {:?}: {e}", self.website_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_request(format!(
                "website_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.search_query.trim().is_empty() {
            return Err(Error::invalid_request("search_query must not be empty"));
        }
        if self.max_results == 0 {
            return Err(Error::invalid_request("max_results must be >= 1"));
        }
        if self.max_tokens_per_chunk == 0 {
            return Err(Error::invalid_request("max_tokens_per_chunk must be >= 1"));
        }
        Ok(())
    }
}
