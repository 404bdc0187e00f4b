//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or no file at all) is valid.
//!
//! # Example
//!
//! ```no_run
//! use lecturas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lecturas.toml")).unwrap();
//! println!("Fetching readings in {} mode", config.fetch.mode);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, FetchConfig, FetchMode, ServerConfig, SourceConfig,
    DEFAULT_BASE_URL, DEFAULT_BROWSER_ENDPOINT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
