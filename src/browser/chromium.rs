//! Chromium driver built on chromiumoxide

use crate::browser::{BrowserError, BrowserLauncher, BrowserPage, BrowserSession};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::{Handler, Page};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Interval between `document.readyState` checks while a page settles
const READY_STATE_POLL: Duration = Duration::from_millis(100);

/// Launches or connects to Chromium over the DevTools protocol
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    request_timeout: Duration,
}

impl ChromiumLauncher {
    /// `request_timeout` bounds each individual DevTools command
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        let (browser, handler) = Browser::connect(endpoint)
            .await
            .map_err(|e| BrowserError::Connect(e.to_string()))?;

        Ok(Arc::new(ChromiumSession::new(browser, handler)))
    }

    async fn launch_local(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        tracing::debug!("Launching local headless browser");

        // Containers usually lack the user namespaces the sandbox needs
        let config = ChromeConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .request_timeout(self.request_timeout)
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Arc::new(ChromiumSession::new(browser, handler)))
    }
}

/// A Chromium instance plus the task driving its event handler
struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    fn new(browser: Browser, mut handler: Handler) -> Self {
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        Self {
            browser: Mutex::new(browser),
            handler,
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn version(&self) -> Result<String, BrowserError> {
        let browser = self.browser.lock().await;
        browser
            .version()
            .await
            .map(|version| version.product)
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, BrowserError> {
        let browser = self.browser.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page }))
    }

    async fn shutdown(&self) -> Result<(), BrowserError> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        if let Err(e) = browser.wait().await {
            tracing::debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let navigation_error = |e: chromiumoxide::error::CdpError| BrowserError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        self.page.goto(url).await.map_err(navigation_error)?;

        // goto returns on the load event; wait for late scripts to finish too
        loop {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await
                .map_err(navigation_error)?
                .into_value()
                .map_err(|e| BrowserError::Protocol(e.to_string()))?;

            if state == "complete" {
                return Ok(());
            }
            tokio::time::sleep(READY_STATE_POLL).await;
        }
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))
    }
}
