//! Direct HTTP transport

use crate::config::{FetchConfig, FetchMode, SourceConfig};
use crate::fetch::Transport;
use crate::ReadingsError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for direct fetches
///
/// The client sends the configured User-Agent, gives up on the whole request
/// after `request_timeout_secs`, and accepts compressed responses.
pub fn build_http_client(source: &SourceConfig, fetch: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(source.user_agent.as_str())
        .timeout(Duration::from_secs(fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a single GET request
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: Client,
    timeout_secs: u64,
}

impl DirectTransport {
    /// Creates a direct transport
    ///
    /// # Arguments
    ///
    /// * `source` - Supplies the User-Agent header
    /// * `fetch` - Supplies the whole-request timeout
    ///
    /// # Errors
    ///
    /// Returns `Reqwest` if the HTTP client cannot be built
    pub fn new(source: &SourceConfig, fetch: &FetchConfig) -> Result<Self, ReadingsError> {
        Ok(Self {
            client: build_http_client(source, fetch)?,
            timeout_secs: fetch.request_timeout_secs,
        })
    }

    /// Maps a client error to `FetchTimeout` or `Http`
    fn classify(&self, url: &str, error: reqwest::Error) -> ReadingsError {
        if error.is_timeout() {
            ReadingsError::FetchTimeout {
                url: url.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ReadingsError::Http {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn fetch(&self, url: &str) -> Result<String, ReadingsError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        // Any non-2xx status is a failure, redirects are already followed
        let status = response.status();
        if !status.is_success() {
            return Err(ReadingsError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Direct
    }
}
