//! Headless browser access for rendered mode
//!
//! The browser driver sits behind three traits so that connection pooling
//! and page handling can be exercised without a real Chromium:
//!
//! - [`BrowserLauncher`] connects to a remote browser or starts a local one
//! - [`BrowserSession`] is a live browser that can open pages
//! - [`BrowserPage`] is a single tab, owned by one request
//!
//! [`ChromiumLauncher`] is the production implementation (chromiumoxide) and
//! [`BrowserPool`] keeps one remote session alive across requests.

mod chromium;
mod pool;


pub use chromium::ChromiumLauncher;
pub use pool::{BrowserPool, FailureMemo, PoolStatus};

use crate::ConfigError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Errors raised by the browser driver
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("Failed to connect to remote browser: {0}")]
    Connect(String),

    #[error("Failed to launch local browser: {0}")]
    Launch(String),

    #[error("Failed to open page: {0}")]
    Page(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Creates browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Connects to a remote browser over its WebSocket debugging endpoint
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn BrowserSession>, BrowserError>;

    /// Starts an isolated local headless browser
    async fn launch_local(&self) -> Result<Arc<dyn BrowserSession>, BrowserError>;
}

/// A connected browser
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Cheap round trip used as a liveness probe; returns the product string
    async fn version(&self) -> Result<String, BrowserError>;

    /// Opens a new blank page
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, BrowserError>;

    /// Closes the browser. Only called for sessions that are not pooled.
    async fn shutdown(&self) -> Result<(), BrowserError>;
}

/// A single page (tab)
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigates and waits until the page has finished loading
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// The rendered document HTML
    async fn content(&self) -> Result<String, BrowserError>;

    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Builds the remote endpoint URL carrying the access token as a query parameter
///
/// # Example
///
/// ```
/// use lecturas::browser::remote_endpoint;
///
/// let url = remote_endpoint("wss://chrome.browserless.io", "abc").unwrap();
/// assert_eq!(url, "wss://chrome.browserless.io/?token=abc");
/// ```
pub fn remote_endpoint(endpoint: &str, token: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid browser endpoint: {}", e)))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.to_string())
}

/// Shortens a token for logs: first 10 and last 5 characters
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 15 {
        return "***".to_string();
    }

    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Endpoint URL with its `token` query parameter redacted
pub fn redact_endpoint(endpoint: &str) -> String {
    let Ok(mut url) = Url::parse(endpoint) else {
        return "<invalid endpoint>".to_string();
    };

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "token" {
                redact_token(&value)
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}
