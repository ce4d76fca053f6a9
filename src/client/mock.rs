//! Scripted in-memory [`BackupService`] for tests and local dry runs

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::models::{
    BackupCreated, BackupStatusSnapshot, BackupStorage, DatalakeDescription, DatalakeDetails,
    EnvironmentDescription, EnvironmentDetails, EnvironmentList, EnvironmentSummary,
    StorageDetails,
};
use super::{BackupRequest, BackupService, Result, ServiceError};

/// Calls recorded by [`MockBackupService`], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    DescribeDatalake(String),
    ListEnvironments,
    DescribeEnvironment(String),
    CreateBackup(BackupRequest),
    BackupStatus { datalake: String, backup_id: String },
}

/// Mock service that answers from scripted fixtures.
///
/// Unknown names answer with empty records rather than errors, the way the
/// real services answer with missing fields. Status snapshots are handed out
/// in order; the last one repeats forever.
#[derive(Debug, Default)]
pub struct MockBackupService {
    datalakes: HashMap<String, DatalakeDescription>,
    environments: Vec<EnvironmentSummary>,
    descriptions: HashMap<String, EnvironmentDescription>,
    created: Option<BackupCreated>,
    statuses: Mutex<VecDeque<BackupStatusSnapshot>>,
    failures: Mutex<u32>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl MockBackupService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datalake(mut self, name: &str, environment_crn: &str) -> Self {
        self.datalakes.insert(
            name.to_string(),
            DatalakeDescription {
                datalake: DatalakeDetails {
                    datalake_name: Some(name.to_string()),
                    environment_crn: Some(environment_crn.to_string()),
                },
            },
        );
        self
    }

    pub fn with_environment(mut self, name: &str, crn: &str) -> Self {
        self.environments.push(EnvironmentSummary {
            environment_name: Some(name.to_string()),
            crn: Some(crn.to_string()),
        });
        self
    }

    pub fn with_backup_location(mut self, environment_name: &str, location: &str) -> Self {
        self.descriptions.insert(
            environment_name.to_string(),
            EnvironmentDescription {
                environment: EnvironmentDetails {
                    environment_name: Some(environment_name.to_string()),
                    backup_storage: Some(BackupStorage {
                        aws_details: Some(StorageDetails {
                            storage_location_base: Some(location.to_string()),
                        }),
                        ..Default::default()
                    }),
                },
            },
        );
        self
    }

    pub fn with_backup_id(mut self, backup_id: &str) -> Self {
        self.created = Some(BackupCreated {
            backup_id: Some(backup_id.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn with_created(mut self, created: BackupCreated) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = BackupStatusSnapshot>) -> Self {
        if let Ok(mut queue) = self.statuses.lock() {
            queue.extend(statuses);
        }
        self
    }

    /// Make the next `count` calls fail with a transient command failure
    pub fn failing_next(self, count: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            *failures = count;
        }
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::BackupStatus { .. }))
            .count()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::CreateBackup(_)))
            .count()
    }

    fn record(&self, call: ServiceCall) -> Result<()> {
        tracing::debug!(?call, "Mock service call");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        if let Ok(mut failures) = self.failures.lock() {
            if *failures > 0 {
                *failures -= 1;
                return Err(ServiceError::CommandFailed {
                    command: "mock".to_string(),
                    status: "exit status: 255".to_string(),
                    stderr: "injected failure".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BackupService for MockBackupService {
    async fn describe_datalake(&self, datalake_name: &str) -> Result<DatalakeDescription> {
        self.record(ServiceCall::DescribeDatalake(datalake_name.to_string()))?;
        Ok(self
            .datalakes
            .get(datalake_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_environments(&self) -> Result<EnvironmentList> {
        self.record(ServiceCall::ListEnvironments)?;
        Ok(EnvironmentList {
            environments: self.environments.clone(),
        })
    }

    async fn describe_environment(
        &self,
        environment_name: &str,
    ) -> Result<EnvironmentDescription> {
        self.record(ServiceCall::DescribeEnvironment(environment_name.to_string()))?;
        Ok(self
            .descriptions
            .get(environment_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_backup(&self, request: &BackupRequest) -> Result<BackupCreated> {
        self.record(ServiceCall::CreateBackup(request.clone()))?;
        Ok(self.created.clone().unwrap_or_default())
    }

    async fn backup_status(
        &self,
        datalake_name: &str,
        backup_id: &str,
    ) -> Result<BackupStatusSnapshot> {
        self.record(ServiceCall::BackupStatus {
            datalake: datalake_name.to_string(),
            backup_id: backup_id.to_string(),
        })?;

        let mut queue = match self.statuses.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        let snapshot = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(snapshot.unwrap_or_default())
    }
}
