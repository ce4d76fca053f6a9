use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Polling budget must be positive: {field} = {value}")]
    InvalidPollingBudget { field: &'static str, value: u64 },

    #[error("Retry max_attempts must be at least 1")]
    InvalidRetryAttempts,

    #[error("cdp.binary must not be empty")]
    MissingCdpBinary,

    #[error("cdp.command_timeout must be positive")]
    InvalidCommandTimeout,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_polling(config)?;
    validate_retry(config)?;
    validate_cdp(config)?;
    Ok(())
}

fn validate_polling(config: &Config) -> Result<(), ValidationError> {
    if config.polling.max_minutes == 0 {
        return Err(ValidationError::InvalidPollingBudget {
            field: "polling.max_minutes",
            value: 0,
        });
    }

    if config.polling.interval_seconds == 0 {
        return Err(ValidationError::InvalidPollingBudget {
            field: "polling.interval_seconds",
            value: 0,
        });
    }

    Ok(())
}

fn validate_retry(config: &Config) -> Result<(), ValidationError> {
    if config.retry.max_attempts == 0 {
        return Err(ValidationError::InvalidRetryAttempts);
    }
    Ok(())
}

fn validate_cdp(config: &Config) -> Result<(), ValidationError> {
    if config.cdp.binary.trim().is_empty() {
        return Err(ValidationError::MissingCdpBinary);
    }

    if config.cdp.command_timeout.as_secs() == 0 {
        return Err(ValidationError::InvalidCommandTimeout);
    }

    Ok(())
}
