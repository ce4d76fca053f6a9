use serde::Serialize;
use std::time::Duration;

use crate::client::BackupStatus;

use super::report::DurationBreakdown;

/// Output of the resolver stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentContext {
    pub datalake_name: String,
    pub environment_crn: String,
    pub environment_name: String,
    pub backup_location: String,
}

/// Handle to a submitted backup job; input of the poller stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHandle {
    pub datalake_name: String,
    /// Unknown when resuming an existing backup by ID
    pub backup_name: Option<String>,
    pub backup_id: String,
    pub validation_only: bool,
}

impl JobHandle {
    /// Handle for a backup that was started elsewhere
    pub fn existing(datalake_name: impl Into<String>, backup_id: impl Into<String>) -> Self {
        Self {
            datalake_name: datalake_name.into(),
            backup_name: None,
            backup_id: backup_id.into(),
            validation_only: false,
        }
    }
}

/// What the caller asks the workflow to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupOptions {
    pub datalake_name: String,
    pub backup_name: Option<String>,
    pub validation_only: bool,
}

/// Result of a successful poll loop
#[derive(Debug, Clone)]
pub struct FinalReport {
    pub backup_id: String,
    pub status: BackupStatus,
    /// Number of status queries issued
    pub attempts: u64,
    pub elapsed: Duration,
    pub breakdown: DurationBreakdown,
}
