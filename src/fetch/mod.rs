//! Page retrieval
//!
//! Two transports produce the raw HTML of a readings page:
//! - [`DirectTransport`]: a single HTTP GET with a browser-like User-Agent
//! - [`RenderedTransport`]: a headless browser, pooled remote or local fallback
//!
//! The configured [`FetchMode`] selects which one [`build_transport`] returns.

mod direct;
mod rendered;

pub use direct::{build_http_client, DirectTransport};
pub use rendered::RenderedTransport;

use crate::browser::{BrowserLauncher, BrowserPool, ChromiumLauncher};
use crate::config::{Config, FetchMode};
use crate::ReadingsError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Retrieves the HTML document at a URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ReadingsError>;

    fn mode(&self) -> FetchMode;
}

/// Builds the transport selected by `config.fetch.mode`
pub fn build_transport(config: &Config) -> Result<Arc<dyn Transport>, ReadingsError> {
    match config.fetch.mode {
        FetchMode::Direct => Ok(Arc::new(DirectTransport::new(
            &config.source,
            &config.fetch,
        )?)),
        FetchMode::Rendered => {
            let launcher: Arc<dyn BrowserLauncher> = Arc::new(ChromiumLauncher::new(
                Duration::from_secs(config.browser.navigation_timeout_secs),
            ));
            let pool = Arc::new(BrowserPool::from_config(&config.browser, launcher.clone())?);
            Ok(Arc::new(RenderedTransport::new(
                pool,
                launcher,
                &config.browser,
            )))
        }
    }
}
