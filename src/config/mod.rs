//! Configuration management for dlbackup
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Usage
//!
//! ```no_run
//! use dlbackup::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Polling every {}s", config.polling.interval_seconds);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `DLBACKUP__<section>__<key>`
//!
//! Examples:
//! - `DLBACKUP__CDP__PROFILE=prod`
//! - `DLBACKUP__POLLING__MAX_MINUTES=30`
//! - `DLBACKUP__RETRY__BACKOFF=5s`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/dlbackup.toml`.
//! This can be overridden using the `DLBACKUP_CONFIG` environment variable
//! or the `--config` flag.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use crate::humanize::HumanDuration;
pub use models::{CdpConfig, Config, LoggingConfig, PollingConfig, ResolverConfig, RetryConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// `explicit_path` wins over `DLBACKUP_CONFIG` and the default path.
    /// The result is not validated: callers layer command-line flags on top
    /// and then call [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed.
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(sources::load(explicit_path)?)
    }

    /// Load and validate configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after applying command-line overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
