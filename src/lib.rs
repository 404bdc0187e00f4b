//! Lecturas: daily liturgical readings scraper
//!
//! This crate fetches the day's readings from Vatican News (Spanish edition),
//! either with a plain HTTP request or through a headless browser, and
//! extracts the liturgical indication, the first reading and the gospel into
//! a structured result envelope.

pub mod browser;
pub mod config;
pub mod date;
pub mod extract;
pub mod fetch;
pub mod readings;
pub mod server;

use thiserror::Error;

/// Main error type for readings retrieval
#[derive(Debug, Error)]
pub enum ReadingsError {
    #[error("Invalid date format '{input}'. Use YYYY-MM-DD")]
    InvalidDateFormat { input: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    #[error("Timed out after {timeout_secs}s loading {url}")]
    FetchTimeout { url: String, timeout_secs: u64 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Waiting {remaining_ms}ms before retrying the remote browser. Previous error: {previous}")]
    ConnectionCoolingDown { remaining_ms: u64, previous: String },

    #[error("Remote browser connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Could not reach the remote browser nor a local one. Remote error: {primary}. Local error: {fallback}")]
    FallbackFailed { primary: String, fallback: String },

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for readings operations
pub type Result<T> = std::result::Result<T, ReadingsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::extract_readings;
pub use readings::{ExtractedReading, ReadingsResult, ReadingsService, ResultEnvelope};
