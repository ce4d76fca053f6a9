//! Backup orchestration pipeline
//!
//! A run is three stages, each returning a typed value consumed by the next:
//!
//! 1. [`Resolver`]: datalake name → [`EnvironmentContext`]
//! 2. [`Trigger`]: context + options → [`JobHandle`]
//! 3. [`Poller`]: handle → [`FinalReport`]
//!
//! Any error ends the run; there is no partial-success path.

pub mod error;
pub mod poller;
pub mod report;
pub mod resolver;
pub mod trigger;
pub mod types;

pub use error::{ResolutionError, Result, TriggerError, WorkflowError};
pub use poller::{Poller, max_attempts};
pub use report::{DurationBreakdown, DurationRow};
pub use resolver::Resolver;
pub use trigger::{Trigger, backup_name_or_default, default_backup_name};
pub use types::{BackupOptions, EnvironmentContext, FinalReport, JobHandle};

use std::io::Write;
use tracing::info;

use crate::client::BackupService;
use crate::config::{PollingConfig, ResolverConfig};

/// Owns the service client and the per-stage settings
pub struct Workflow<S> {
    service: S,
    resolver: ResolverConfig,
    polling: PollingConfig,
}

impl<S: BackupService> Workflow<S> {
    pub fn new(service: S, resolver: ResolverConfig, polling: PollingConfig) -> Self {
        Self {
            service,
            resolver,
            polling,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn resolve(&self, datalake_name: &str) -> Result<EnvironmentContext> {
        Resolver::new(&self.service, self.resolver)
            .resolve(datalake_name)
            .await
    }

    pub async fn trigger(
        &self,
        context: &EnvironmentContext,
        options: &BackupOptions,
    ) -> Result<JobHandle> {
        Trigger::new(&self.service)
            .trigger_for(
                context,
                options.backup_name.as_deref(),
                options.validation_only,
            )
            .await
    }

    pub async fn poll<W: Write + ?Sized>(
        &self,
        handle: &JobHandle,
        out: &mut W,
    ) -> Result<FinalReport> {
        Poller::new(&self.service, self.polling)
            .poll(handle, out)
            .await
    }

    /// Resolve, trigger, then poll to completion
    pub async fn run<W: Write + ?Sized>(
        &self,
        options: &BackupOptions,
        out: &mut W,
    ) -> Result<FinalReport> {
        let context = self.resolve(&options.datalake_name).await?;
        writeln!(
            out,
            "Environment: {} ({})",
            context.environment_name, context.environment_crn
        )?;
        writeln!(out, "Backup location: {}", context.backup_location)?;

        let handle = self.trigger(&context, options).await?;
        writeln!(
            out,
            "Backup {} submitted as '{}'{}",
            handle.backup_id,
            handle.backup_name.as_deref().unwrap_or_default(),
            if handle.validation_only {
                " (validation only)"
            } else {
                ""
            }
        )?;

        let report = self.poll(&handle, out).await?;

        info!(
            datalake = %options.datalake_name,
            backup_id = %report.backup_id,
            status = %report.status,
            attempts = report.attempts,
            "Backup workflow completed"
        );

        Ok(report)
    }
}
