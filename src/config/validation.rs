use crate::config::types::{BrowserConfig, Config, FetchConfig, ServerConfig, SourceConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetch_config(&config.fetch)?;
    validate_browser_config(&config.browser)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates the readings source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use HTTP or HTTPS",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.day_offset.abs() > 7 {
        return Err(ConfigError::Validation(format!(
            "day-offset must be between -7 and 7, got {}",
            config.day_offset
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid browser endpoint: {}", e)))?;

    if url.scheme() != "wss" && url.scheme() != "ws" {
        return Err(ConfigError::Validation(format!(
            "browser endpoint '{}' must use ws or wss",
            config.endpoint
        )));
    }

    if config.token_env.is_empty() {
        return Err(ConfigError::Validation(
            "token-env cannot be empty".to_string(),
        ));
    }

    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be >= 1, got {}",
            config.navigation_timeout_secs
        )));
    }

    if config.probe_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "probe-timeout-ms must be >= 100ms, got {}ms",
            config.probe_timeout_ms
        )));
    }

    if config.connect_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-ms must be >= 100ms, got {}ms",
            config.connect_timeout_ms
        )));
    }

    Ok(())
}

/// Validates the HTTP API configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}
