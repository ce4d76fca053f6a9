//! Service-client boundary for the CDP datalake and environment services.
//!
//! The workflow only talks to [`BackupService`]; the transport behind it is the
//! `cdp` CLI in production ([`CdpCli`]) and a scripted fake in tests
//! ([`MockBackupService`]).

pub mod cdp;
pub mod mock;
pub mod models;
pub mod retry;

pub use cdp::CdpCli;
pub use mock::{MockBackupService, ServiceCall};
pub use models::{
    BackupCreated, BackupStatus, BackupStatusSnapshot, DatalakeDescription,
    EnvironmentDescription, EnvironmentList, EnvironmentSummary, Minutes, NOT_AVAILABLE,
    OperationState,
};
pub use retry::{RetryPolicy, RetryingService};

use async_trait::async_trait;
use bon::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("failed to decode response of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    /// Transport-level failures that may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        !matches!(self, ServiceError::Decode { .. })
    }

    /// The call never reached the service, so repeating it cannot duplicate work
    pub fn is_unsent(&self) -> bool {
        matches!(self, ServiceError::Spawn { .. })
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Parameters of a backup creation call
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct BackupRequest {
    #[builder(into)]
    pub datalake_name: String,
    #[builder(into)]
    pub backup_name: String,
    #[builder(into)]
    pub backup_location: String,
    #[builder(default)]
    pub validation_only: bool,
}

/// One method per external call the backup workflow makes
#[async_trait]
pub trait BackupService: Send + Sync {
    /// Describe a datalake by name
    async fn describe_datalake(&self, datalake_name: &str) -> Result<DatalakeDescription>;

    /// List every environment visible to the caller
    async fn list_environments(&self) -> Result<EnvironmentList>;

    /// Describe an environment by name
    async fn describe_environment(&self, environment_name: &str)
    -> Result<EnvironmentDescription>;

    /// Submit a backup (or validation-only backup) request
    async fn create_backup(&self, request: &BackupRequest) -> Result<BackupCreated>;

    /// Read the current state of a backup job
    async fn backup_status(
        &self,
        datalake_name: &str,
        backup_id: &str,
    ) -> Result<BackupStatusSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let spawn = ServiceError::Spawn {
            command: "cdp".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let timeout = ServiceError::Timeout {
            command: "cdp".to_string(),
            seconds: 5,
        };

        assert!(spawn.is_transient() && spawn.is_unsent());
        assert!(timeout.is_transient());
        assert!(!timeout.is_unsent());
    }
}
