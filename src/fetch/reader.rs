//! Reader-service client used for script-rendered pages.

use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::FetchError;
use crate::fetch::FetchConfig;

/// Client for a text-extraction reader service.
///
/// The service is addressed by prefixing the target URL with the
/// configured endpoint, e.g. `https://r.jina.ai/https://example.com`.
#[derive(Debug, Clone)]
pub struct ReaderClient {
    client: Client,
    endpoint: String,
}

impl ReaderClient {
    /// Builds a reader client from the fetch configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.reader_user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.reader_endpoint.clone(),
        })
    }

    /// Full reader URL for `target`.
    #[must_use]
    pub fn reader_url(&self, target: &str) -> String {
        format!("{}{target}", self.endpoint)
    }

    /// Retrieves a plain-text rendering of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] on transport failure and
    /// [`FetchError::HttpStatus`] on a non-2xx answer.
    pub async fn fetch_text(&self, target: &str) -> Result<String, FetchError> {
        let reader_url = self.reader_url(target);
        debug!(url = %reader_url, "reader request");

        let response = self
            .client
            .get(&reader_url)
            .header(ACCEPT, "text/plain")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
