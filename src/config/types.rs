use serde::Deserialize;

/// Default base URL of the Spanish daily gospel pages
pub const DEFAULT_BASE_URL: &str = "https://www.vaticannews.va/es/evangelio-de-hoy";

/// Browser-like User-Agent sent by the direct transport
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default remote browser service endpoint
pub const DEFAULT_BROWSER_ENDPOINT: &str = "wss://chrome.browserless.io";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub browser: BrowserConfig,
    pub server: ServerConfig,
}

/// Where the readings come from and how dates map onto pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL; the `YYYY/MM/DD.html` segment is appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header for direct fetches
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Days added to the requested date before building the URL
    #[serde(rename = "day-offset")]
    pub day_offset: i64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            day_offset: 1,
        }
    }
}

/// Transport selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP GET
    #[default]
    Direct,
    /// Headless browser rendering
    Rendered,
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::Direct => write!(f, "direct"),
            FetchMode::Rendered => write!(f, "rendered"),
        }
    }
}

/// Fetch behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub mode: FetchMode,

    /// Whole-request timeout for direct fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Direct,
            request_timeout_secs: 30,
        }
    }
}

/// Headless browser configuration (rendered mode only)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebSocket endpoint of the remote browser service
    pub endpoint: String,

    /// Name of the environment variable holding the access token
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// Time to wait after a failed connection before trying again (milliseconds)
    #[serde(rename = "cooldown-ms")]
    pub cooldown_ms: u64,

    /// Upper bound for a page navigation (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,

    /// Upper bound for the liveness probe of a pooled connection (milliseconds)
    #[serde(rename = "probe-timeout-ms")]
    pub probe_timeout_ms: u64,

    /// Upper bound for establishing a new remote connection (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Launch a local browser when the remote one is unavailable
    #[serde(rename = "local-fallback")]
    pub local_fallback: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BROWSER_ENDPOINT.to_string(),
            token_env: "BROWSERLESS_TOKEN".to_string(),
            cooldown_ms: 5000,
            navigation_timeout_secs: 30,
            probe_timeout_ms: 5000,
            connect_timeout_ms: 10_000,
            local_fallback: true,
        }
    }
}

impl BrowserConfig {
    /// Reads the access token from the configured environment variable.
    ///
    /// Empty values count as unset.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}
