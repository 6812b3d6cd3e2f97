//! reqwest-backed page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetch::{FetchBackend, FetchConfig, FetchSource, RawContent, ReaderClient};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Marker whose absence flags a page as script-rendered.
const BODY_MARKER: &str = "<body";

/// Fetcher that talks HTTP directly, with a reader-service fallback for
/// thin pages.
///
/// Construct one per process and share it; the inner clients pool
/// connections.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    reader: Option<ReaderClient>,
    min_content_chars: usize,
}

impl HttpFetcher {
    /// Builds a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if an HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let reader = if config.reader_enabled {
            Some(ReaderClient::new(config)?)
        } else {
            None
        };

        Ok(Self {
            client,
            reader,
            min_content_chars: config.min_content_chars,
        })
    }

    /// Whether `body` looks like a script-rendered shell.
    #[must_use]
    pub fn is_thin(&self, body: &str) -> bool {
        body.chars().count() < self.min_content_chars
            || !body.to_lowercase().contains(BODY_MARKER)
    }

    async fn fetch_primary(&self, url: &Url) -> Result<RawContent, FetchError> {
        debug!(url = %url, "primary request");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, HTML_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_html_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType {
                content_type: if content_type.is_empty() {
                    "<none>".to_string()
                } else {
                    content_type
                },
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;

        let raw = RawContent {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
            source: FetchSource::Primary,
        };
        debug!(
            status = raw.status,
            content_type = %raw.content_type,
            chars = raw.len(),
            "primary response"
        );
        Ok(raw)
    }
}

#[async_trait]
impl FetchBackend for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawContent, FetchError> {
        let parsed = parse_http_url(url)?;
        let primary = self.fetch_primary(&parsed).await?;

        let Some(reader) = &self.reader else {
            return Ok(primary);
        };
        if !self.is_thin(&primary.body) {
            return Ok(primary);
        }

        info!(url = %parsed, chars = primary.len(), "thin content, trying reader");
        match reader.fetch_text(parsed.as_str()).await {
            Ok(text) if text.chars().count() > primary.len() => {
                info!(chars = text.chars().count(), "using reader content");
                Ok(RawContent {
                    content_type: "text/plain".to_string(),
                    body: text,
                    source: FetchSource::Reader,
                    ..primary
                })
            }
            Ok(text) => {
                debug!(
                    reader_chars = text.chars().count(),
                    primary_chars = primary.len(),
                    "reader content not longer, keeping primary"
                );
                Ok(primary)
            }
            Err(e) => {
                warn!(error = %e, "reader fallback failed, keeping primary");
                Ok(primary)
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Whether a `Content-Type` header value names HTML.
///
/// # Examples
///
/// ```
/// use sitesift::fetch::is_html_content_type;
///
/// assert!(is_html_content_type("text/html; charset=utf-8"));
/// assert!(!is_html_content_type("application/json"));
/// ```
#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    matches!(essence.as_str(), "text/html" | "application/xhtml+xml")
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url)?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(parsed)
    } else {
        Err(FetchError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )))
    }
}
