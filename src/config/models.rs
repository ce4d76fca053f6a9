use crate::humanize::HumanDuration;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cdp: CdpConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `cdp` CLI invocation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CdpConfig {
    /// Executable name or path
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Passed as `--profile` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Upper bound for a single CLI call
    #[serde(default = "default_command_timeout")]
    pub command_timeout: HumanDuration,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            profile: None,
            command_timeout: default_command_timeout(),
        }
    }
}

fn default_binary() -> String {
    "cdp".to_string()
}

fn default_command_timeout() -> HumanDuration {
    HumanDuration::from_secs(120)
}

/// Status polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u64,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_minutes: default_max_minutes(),
            interval_seconds: default_interval_seconds(),
        }
    }
}

fn default_max_minutes() -> u64 {
    10
}

fn default_interval_seconds() -> u64 {
    5
}

/// Environment lookup behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Reject a CRN that matches more than one environment
    #[serde(default = "default_strict_environment_match")]
    pub strict_environment_match: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict_environment_match: default_strict_environment_match(),
        }
    }
}

fn default_strict_environment_match() -> bool {
    true
}

/// Service-call retry knob; one attempt means fail fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff")]
    pub backoff: HumanDuration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: default_backoff(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff() -> HumanDuration {
    HumanDuration::from_secs(2)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
