//! Headless browser transport
//!
//! Each request works on its own page. The browser behind it is either the
//! pooled remote session, which outlives the request, or a local browser
//! launched as a fallback, which is shut down once the request is done.
//!
//! Pages and local browsers are held in guards. When a request future is
//! dropped before it finishes, the guards hand their cleanup to the runtime.

use crate::browser::{BrowserError, BrowserLauncher, BrowserPage, BrowserPool, BrowserSession};
use crate::config::{BrowserConfig, FetchMode};
use crate::fetch::Transport;
use crate::ReadingsError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Browser handed to a single request
enum Lease {
    Pooled(Arc<dyn BrowserSession>),
    Local(LocalBrowser),
}

impl Lease {
    fn session(&self) -> &Arc<dyn BrowserSession> {
        match self {
            Lease::Pooled(session) => session,
            Lease::Local(local) => &local.session,
        }
    }
}

/// Fallback browser owned by one request; shut down when the request ends
struct LocalBrowser {
    session: Arc<dyn BrowserSession>,
    shut_down: bool,
}

impl LocalBrowser {
    fn new(session: Arc<dyn BrowserSession>) -> Self {
        Self {
            session,
            shut_down: false,
        }
    }

    async fn shutdown(mut self) {
        self.shut_down = true;
        if let Err(e) = self.session.shutdown().await {
            tracing::warn!("Failed to shut down local browser: {}", e);
        }
    }
}

impl Drop for LocalBrowser {
    fn drop(&mut self) {
        if !self.shut_down {
            let session = self.session.clone();
            spawn_cleanup("shut down local browser", async move { session.shutdown().await });
        }
    }
}

/// Page owned by one request; closed when the request ends
struct OpenPage {
    page: Option<Box<dyn BrowserPage>>,
}

impl OpenPage {
    fn new(page: Box<dyn BrowserPage>) -> Self {
        Self { page: Some(page) }
    }

    fn get(&mut self) -> Result<&mut (dyn BrowserPage + 'static), BrowserError> {
        self.page
            .as_deref_mut()
            .ok_or_else(|| BrowserError::Page("page already closed".to_string()))
    }

    async fn close(mut self, url: &str) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::warn!("Failed to close page for {}: {}", url, e);
            }
        }
    }
}

impl Drop for OpenPage {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            spawn_cleanup("close page", async move { page.close().await });
        }
    }
}

/// Runs cleanup for a request that was dropped mid-flight
fn spawn_cleanup<F>(action: &'static str, cleanup: F)
where
    F: Future<Output = Result<(), BrowserError>> + Send + 'static,
{
    tracing::debug!("Request cancelled, scheduling cleanup: {}", action);

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = cleanup.await {
                    tracing::warn!("Failed to {} after cancellation: {}", action, e);
                }
            });
        }
        Err(_) => tracing::warn!("No runtime left to {} after cancellation", action),
    }
}

/// Renders pages in a headless browser before capturing their HTML
pub struct RenderedTransport {
    pool: Arc<BrowserPool>,
    launcher: Arc<dyn BrowserLauncher>,
    navigation_timeout: Duration,
    local_fallback: bool,
}

impl RenderedTransport {
    /// Creates a rendered transport
    ///
    /// # Arguments
    ///
    /// * `pool` - Holder of the shared remote browser
    /// * `launcher` - Driver used for the local fallback browser
    /// * `config` - Navigation timeout and fallback switch
    pub fn new(
        pool: Arc<BrowserPool>,
        launcher: Arc<dyn BrowserLauncher>,
        config: &BrowserConfig,
    ) -> Self {
        Self {
            pool,
            launcher,
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            local_fallback: config.local_fallback,
        }
    }

    /// Picks the browser for one request
    ///
    /// The pooled remote session is tried first. A local browser is launched
    /// only when no token is configured or the pooled path failed.
    async fn obtain_browser(&self) -> Result<Lease, ReadingsError> {
        let primary = if self.pool.has_remote() {
            match self.pool.acquire().await {
                Ok(session) => return Ok(Lease::Pooled(session)),
                Err(e) => e,
            }
        } else {
            ReadingsError::ConnectionFailed("remote browser token not configured".to_string())
        };

        if !self.local_fallback {
            return Err(primary);
        }

        if self.pool.has_remote() {
            tracing::warn!("Remote browser unavailable ({}), falling back to a local browser", primary);
        } else {
            tracing::debug!("Using a local browser");
        }

        match self.launcher.launch_local().await {
            Ok(session) => Ok(Lease::Local(LocalBrowser::new(session))),
            Err(e) => {
                tracing::error!("Local browser fallback failed: {}", e);
                Err(ReadingsError::FallbackFailed {
                    primary: primary.to_string(),
                    fallback: e.to_string(),
                })
            }
        }
    }

    /// Opens a page, loads `url` and always closes the page afterwards
    ///
    /// Opening the page, navigating and reading the HTML share a single
    /// deadline of `navigation_timeout`.
    async fn render(&self, session: &Arc<dyn BrowserSession>, url: &str) -> Result<String, ReadingsError> {
        let deadline = Instant::now() + self.navigation_timeout;

        let mut page = OpenPage::new(self.within(deadline, url, session.new_page()).await?);
        let outcome = self.load(&mut page, deadline, url).await;
        page.close(url).await;

        outcome
    }

    async fn load(&self, page: &mut OpenPage, deadline: Instant, url: &str) -> Result<String, ReadingsError> {
        let page = page.get()?;
        self.within(deadline, url, page.navigate(url)).await?;
        self.within(deadline, url, page.content()).await
    }

    /// Runs one browser step, mapping an elapsed deadline to `FetchTimeout`
    async fn within<T, F>(&self, deadline: Instant, url: &str, step: F) -> Result<T, ReadingsError>
    where
        F: Future<Output = Result<T, BrowserError>>,
    {
        match tokio::time::timeout_at(deadline, step).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ReadingsError::FetchTimeout {
                url: url.to_string(),
                timeout_secs: self.navigation_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl Transport for RenderedTransport {
    async fn fetch(&self, url: &str) -> Result<String, ReadingsError> {
        let lease = self.obtain_browser().await?;
        let outcome = self.render(lease.session(), url).await;

        // Only the local fallback browser is torn down; the pooled one stays
        if let Lease::Local(local) = lease {
            local.shutdown().await;
        }

        outcome
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Rendered
    }
}
