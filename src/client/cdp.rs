//! `cdp` CLI transport
//!
//! Every call is a single blocking round trip through the CDP command-line
//! client, which owns authentication. Output is requested as JSON and decoded
//! into the records in [`super::models`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::models::{
    BackupCreated, BackupStatusSnapshot, DatalakeDescription, EnvironmentDescription,
    EnvironmentList,
};
use super::{BackupRequest, BackupService, Result, ServiceError};
use crate::config::CdpConfig;

/// [`BackupService`] backed by the `cdp` executable
#[derive(Debug, Clone)]
pub struct CdpCli {
    binary: String,
    profile: Option<String>,
    timeout: Duration,
}

impl CdpCli {
    pub fn new(config: &CdpConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            profile: config.profile.clone().filter(|p| !p.trim().is_empty()),
            timeout: config.command_timeout.as_duration(),
        }
    }

    /// Full argument vector for a `cdp <service> <operation>` call
    pub fn command_args(&self, service: &str, operation: &str, args: &[&str]) -> Vec<String> {
        let mut argv: Vec<String> = vec![service.to_string(), operation.to_string()];
        argv.extend(args.iter().map(|a| a.to_string()));
        argv.push("--output".to_string());
        argv.push("json".to_string());
        if let Some(profile) = &self.profile {
            argv.push("--profile".to_string());
            argv.push(profile.clone());
        }
        argv
    }

    async fn call<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        args: &[&str],
    ) -> Result<T> {
        let argv = self.command_args(service, operation, args);
        let command = format!("{} {} {}", self.binary, service, operation);

        debug!(command = %command, "Invoking cdp CLI");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .args(&argv)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ServiceError::Timeout {
            command: command.clone(),
            seconds: self.timeout.as_secs(),
        })?
        .map_err(|source| ServiceError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(command = %command, size = output.stdout.len(), "cdp CLI call completed");

        decode(&command, &output.stdout)
    }
}

/// Decode a CLI response body, treating an empty body as an empty object
pub(crate) fn decode<T: DeserializeOwned>(command: &str, body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|source| ServiceError::Decode {
        command: command.to_string(),
        source,
    })
}

#[async_trait]
impl BackupService for CdpCli {
    async fn describe_datalake(&self, datalake_name: &str) -> Result<DatalakeDescription> {
        self.call(
            "datalake",
            "describe-datalake",
            &["--datalake-name", datalake_name],
        )
        .await
    }

    async fn list_environments(&self) -> Result<EnvironmentList> {
        self.call("environments", "list-environments", &[]).await
    }

    async fn describe_environment(
        &self,
        environment_name: &str,
    ) -> Result<EnvironmentDescription> {
        self.call(
            "environments",
            "describe-environment",
            &["--environment-name", environment_name],
        )
        .await
    }

    async fn create_backup(&self, request: &BackupRequest) -> Result<BackupCreated> {
        let mut args = vec![
            "--datalake-name",
            request.datalake_name.as_str(),
            "--backup-name",
            request.backup_name.as_str(),
            "--backup-location",
            request.backup_location.as_str(),
        ];
        if request.validation_only {
            args.push("--validation-only");
        }

        self.call("datalake", "backup-datalake", &args).await
    }

    async fn backup_status(
        &self,
        datalake_name: &str,
        backup_id: &str,
    ) -> Result<BackupStatusSnapshot> {
        self.call(
            "datalake",
            "backup-datalake-status",
            &["--datalake-name", datalake_name, "--backup-id", backup_id],
        )
        .await
    }
}
