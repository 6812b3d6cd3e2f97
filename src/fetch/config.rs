//! Fetcher configuration.

use std::time::Duration;

/// Browser-like identification sent with the primary request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Identification sent to the reader service.
pub const DEFAULT_READER_USER_AGENT: &str =
    concat!("sitesift-reader/", env!("CARGO_PKG_VERSION"));

/// Reader service prefix; the target URL is appended verbatim.
pub const DEFAULT_READER_ENDPOINT: &str = "https://r.jina.ai/";

/// Pages with fewer characters than this are considered thin.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 500;

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default redirect limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Configuration for [`HttpFetcher`](super::HttpFetcher).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sitesift::fetch::FetchConfig;
///
/// let config = FetchConfig::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_reader_enabled(false);
/// assert!(!config.reader_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent for the primary request.
    pub user_agent: String,
    /// User agent for the reader fallback.
    pub reader_user_agent: String,
    /// Reader service prefix.
    pub reader_endpoint: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Maximum redirects followed.
    pub max_redirects: usize,
    /// Thin-content character threshold.
    pub min_content_chars: usize,
    /// Whether thin pages are retried through the reader service.
    pub reader_enabled: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reader_user_agent: DEFAULT_READER_USER_AGENT.to_string(),
            reader_endpoint: DEFAULT_READER_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            reader_enabled: true,
        }
    }
}

impl FetchConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primary user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the reader user agent.
    #[must_use]
    pub fn with_reader_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.reader_user_agent = user_agent.into();
        self
    }

    /// Sets the reader service prefix.
    #[must_use]
    pub fn with_reader_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.reader_endpoint = endpoint.into();
        self
    }

    /// Sets the whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the redirect limit.
    #[must_use]
    pub const fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Sets the thin-content threshold.
    #[must_use]
    pub const fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    /// Enables or disables the reader fallback.
    #[must_use]
    pub const fn with_reader_enabled(mut self, enabled: bool) -> Self {
        self.reader_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.min_content_chars, 500);
        assert!(config.reader_enabled);
        assert_ne!(config.user_agent, config.reader_user_agent);
        assert!(config.reader_user_agent.starts_with("sitesift-reader/"));
    }

    #[test]
    fn test_builders() {
        let config = FetchConfig::new()
            .with_user_agent("ua")
            .with_reader_user_agent("reader-ua")
            .with_reader_endpoint("http://127.0.0.1:9/")
            .with_max_redirects(2)
            .with_min_content_chars(50)
            .with_connect_timeout(Duration::from_secs(1));
        assert_eq!(config.user_agent, "ua");
        assert_eq!(config.reader_user_agent, "reader-ua");
        assert_eq!(config.reader_endpoint, "http://127.0.0.1:9/");
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.min_content_chars, 50);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }
}
