use thiserror::Error;

use crate::client::{BackupStatus, ServiceError};

/// Lookup failures while turning a datalake name into a backup location
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("datalake '{datalake}' has no environment CRN")]
    MissingEnvironmentCrn { datalake: String },

    #[error("no environment matches CRN '{crn}'")]
    EnvironmentNotFound { crn: String },

    #[error("CRN '{crn}' matches {} environments: {}", .matches.len(), .matches.join(", "))]
    AmbiguousEnvironment { crn: String, matches: Vec<String> },

    #[error("environment matching CRN '{crn}' has no name")]
    UnnamedEnvironment { crn: String },

    #[error("environment '{environment}' has no backup storage location")]
    MissingBackupLocation { environment: String },
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("backup request for datalake '{datalake}' returned no backup ID")]
    MissingBackupId { datalake: String },
}

/// Every failure of a backup run; all of them are fatal
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("trigger failed: {0}")]
    Trigger(#[from] TriggerError),

    #[error("backup {backup_id} ended in {status}: {reason}")]
    TerminalFailure {
        backup_id: String,
        status: BackupStatus,
        reason: String,
    },

    #[error("backup {backup_id} still {last_status} after {attempts} status checks")]
    Timeout {
        backup_id: String,
        attempts: u64,
        last_status: BackupStatus,
    },

    #[error("service call failed: {0}")]
    Service(#[from] ServiceError),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
