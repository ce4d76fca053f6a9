//! Response records returned by the CDP datalake and environment services.
//!
//! Only the fields the backup workflow consumes are modelled; everything else in
//! the service payloads is ignored. All fields are optional because the services
//! omit keys freely (and sometimes send explicit `null`s).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel rendered for any duration the service has not reported yet.
pub const NOT_AVAILABLE: &str = "N/A";

/// `datalake describe-datalake` payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatalakeDescription {
    #[serde(default)]
    pub datalake: DatalakeDetails,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatalakeDetails {
    #[serde(default)]
    pub datalake_name: Option<String>,
    #[serde(default)]
    pub environment_crn: Option<String>,
}

/// `environments list-environments` payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnvironmentList {
    #[serde(default)]
    pub environments: Vec<EnvironmentSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    #[serde(default)]
    pub environment_name: Option<String>,
    #[serde(default)]
    pub crn: Option<String>,
}

/// `environments describe-environment` payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnvironmentDescription {
    #[serde(default)]
    pub environment: EnvironmentDetails,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDetails {
    #[serde(default)]
    pub environment_name: Option<String>,
    #[serde(default)]
    pub backup_storage: Option<BackupStorage>,
}

/// Cloud-specific backup storage settings; exactly one provider block is normally set
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStorage {
    #[serde(default)]
    pub aws_details: Option<StorageDetails>,
    #[serde(default)]
    pub azure_details: Option<StorageDetails>,
    #[serde(default)]
    pub gcp_details: Option<StorageDetails>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDetails {
    #[serde(default)]
    pub storage_location_base: Option<String>,
}

impl BackupStorage {
    /// First configured base location, checking AWS, Azure, then GCP
    pub fn base_location(&self) -> Option<&str> {
        [&self.aws_details, &self.azure_details, &self.gcp_details]
            .into_iter()
            .flatten()
            .filter_map(|details| details.storage_location_base.as_deref())
            .find(|location| is_present(location))
    }
}

/// `datalake backup-datalake` payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCreated {
    #[serde(default)]
    pub backup_id: Option<String>,
    #[serde(default)]
    pub backup_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Point-in-time read of a backup job (`datalake backup-datalake-status`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatusSnapshot {
    #[serde(default)]
    pub backup_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub total_predicted_duration_in_minutes: Option<Minutes>,
    #[serde(default)]
    pub operation_states: Option<OperationStates>,
}

impl BackupStatusSnapshot {
    pub fn parsed_status(&self) -> BackupStatus {
        BackupStatus::parse(self.status.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStates {
    #[serde(default)]
    pub admin_operations: Option<AdminOperations>,
    #[serde(default)]
    pub hbase: Option<HbaseOperations>,
    #[serde(default)]
    pub solr: Option<SolrOperations>,
    #[serde(default)]
    pub database: Option<OperationState>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOperations {
    #[serde(default)]
    pub precheck_storage_permission: Option<OperationState>,
    #[serde(default)]
    pub ranger_audit_collection_validation: Option<OperationState>,
    #[serde(default)]
    pub dry_run_validation: Option<OperationState>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HbaseOperations {
    #[serde(default)]
    pub atlas_entity_audit_event_table: Option<OperationState>,
    #[serde(default)]
    pub atlas_janus_table: Option<OperationState>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolrOperations {
    #[serde(default)]
    pub edge_index_collection: Option<OperationState>,
    #[serde(default)]
    pub fulltext_index_collection: Option<OperationState>,
    #[serde(default)]
    pub ranger_audits_collection: Option<OperationState>,
    #[serde(default)]
    pub vertex_index_collection: Option<OperationState>,
}

/// Progress of a single backup sub-operation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationState {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub duration_in_minutes: Option<Minutes>,
    #[serde(default)]
    pub predicted_duration_in_minutes: Option<Minutes>,
}

impl OperationState {
    /// Actual duration if reported, else the prediction
    pub fn best_duration(&self) -> Option<&Minutes> {
        self.duration_in_minutes
            .as_ref()
            .filter(|m| m.is_present())
            .or_else(|| {
                self.predicted_duration_in_minutes
                    .as_ref()
                    .filter(|m| m.is_present())
            })
    }
}

/// Duration in minutes as the service reports it (number or string)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Minutes {
    Number(f64),
    Text(String),
}

impl Minutes {
    fn is_present(&self) -> bool {
        match self {
            Minutes::Number(_) => true,
            Minutes::Text(text) => is_present(text),
        }
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Minutes::Number(value) => write!(f, "{}", value),
            Minutes::Text(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// Backup job status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    Pending,
    InProgress,
    Running,
    ValidationSuccessful,
    Successful,
    ValidationFailed,
    Failed,
    /// Anything the service sends that we do not recognise, including an empty status
    Unknown(String),
}

impl BackupStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => BackupStatus::Pending,
            "IN_PROGRESS" => BackupStatus::InProgress,
            "RUNNING" => BackupStatus::Running,
            "VALIDATION_SUCCESSFUL" => BackupStatus::ValidationSuccessful,
            "SUCCESSFUL" => BackupStatus::Successful,
            "VALIDATION_FAILED" => BackupStatus::ValidationFailed,
            "FAILED" => BackupStatus::Failed,
            _ => BackupStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            BackupStatus::ValidationSuccessful | BackupStatus::Successful
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BackupStatus::ValidationFailed | BackupStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BackupStatus::Pending => "PENDING",
            BackupStatus::InProgress => "IN_PROGRESS",
            BackupStatus::Running => "RUNNING",
            BackupStatus::ValidationSuccessful => "VALIDATION_SUCCESSFUL",
            BackupStatus::Successful => "SUCCESSFUL",
            BackupStatus::ValidationFailed => "VALIDATION_FAILED",
            BackupStatus::Failed => "FAILED",
            BackupStatus::Unknown(raw) if raw.is_empty() => "<empty>",
            BackupStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for a usable identifier: not empty and not the literal `null`
pub fn is_present(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "null"
}
