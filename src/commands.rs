//! Subcommand handlers for the dlbackup binary

use std::io::Write;
use tracing::info;

use dlbackup::client::{CdpCli, RetryPolicy, RetryingService};
use dlbackup::config::Config;
use dlbackup::humanize::HumanDuration;
use dlbackup::workflow::{BackupOptions, FinalReport, JobHandle, Workflow};

use crate::cli::{BackupArgs, ResolveArgs, StatusArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn build_workflow(config: &Config) -> Workflow<RetryingService<CdpCli>> {
    let service = RetryingService::new(CdpCli::new(&config.cdp), RetryPolicy::from(&config.retry));
    Workflow::new(service, config.resolver, config.polling)
}

fn print_summary(out: &mut impl Write, report: &FinalReport) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Backup ID:     {}", report.backup_id)?;
    writeln!(out, "Final status:  {}", report.status)?;
    writeln!(out, "Status checks: {}", report.attempts)?;
    writeln!(out, "Elapsed:       {}", HumanDuration::from(report.elapsed))
}

pub async fn backup(args: BackupArgs, config: &Config) -> Result<(), AnyError> {
    info!(datalake = %args.datalake, validation_only = args.validation_only, "Starting datalake backup");

    let workflow = build_workflow(config);
    let options = BackupOptions {
        datalake_name: args.datalake,
        backup_name: args.backup_name,
        validation_only: args.validation_only,
    };

    let mut out = std::io::stdout();
    let report = workflow.run(&options, &mut out).await?;
    print_summary(&mut out, &report)?;

    Ok(())
}

pub async fn status(args: StatusArgs, config: &Config) -> Result<(), AnyError> {
    info!(datalake = %args.datalake, backup_id = %args.backup_id, "Following existing backup");

    let workflow = build_workflow(config);
    let handle = JobHandle::existing(args.datalake, args.backup_id);

    let mut out = std::io::stdout();
    let report = workflow.poll(&handle, &mut out).await?;
    print_summary(&mut out, &report)?;

    Ok(())
}

pub async fn resolve(args: ResolveArgs, config: &Config) -> Result<(), AnyError> {
    let workflow = build_workflow(config);
    let context = workflow.resolve(&args.datalake).await?;

    let mut out = std::io::stdout();
    writeln!(out, "Datalake:        {}", context.datalake_name)?;
    writeln!(out, "Environment:     {}", context.environment_name)?;
    writeln!(out, "Environment CRN: {}", context.environment_crn)?;
    writeln!(out, "Backup location: {}", context.backup_location)?;

    Ok(())
}

pub fn show_config(config: &Config) -> Result<(), AnyError> {
    print!("{}", config.to_toml()?);
    Ok(())
}
