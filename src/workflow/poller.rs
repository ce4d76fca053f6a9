//! Bounded status polling for a submitted backup

use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::{Result, WorkflowError};
use super::report::DurationBreakdown;
use super::types::{FinalReport, JobHandle};
use crate::client::{BackupService, BackupStatus};
use crate::config::PollingConfig;
use crate::humanize::HumanDuration;

/// `ceil(max_minutes * 60 / interval_seconds)`
pub fn max_attempts(config: &PollingConfig) -> u64 {
    let budget = config.max_minutes.saturating_mul(60);
    budget.div_ceil(config.interval_seconds.max(1))
}

pub struct Poller<'a, S: ?Sized> {
    service: &'a S,
    config: PollingConfig,
}

impl<'a, S: BackupService + ?Sized> Poller<'a, S> {
    pub fn new(service: &'a S, config: PollingConfig) -> Self {
        Self { service, config }
    }

    /// Poll until the backup reaches a terminal state or the budget runs out.
    ///
    /// The duration breakdown is written to `out` on the first non-terminal
    /// observation and again on the terminal one.
    pub async fn poll<W: Write + ?Sized>(
        &self,
        handle: &JobHandle,
        out: &mut W,
    ) -> Result<FinalReport> {
        let budget = max_attempts(&self.config);
        let interval = Duration::from_secs(self.config.interval_seconds);
        let started = Instant::now();
        let mut shown_initial = false;
        let mut last_status = BackupStatus::Unknown(String::new());

        info!(
            backup_id = %handle.backup_id,
            max_attempts = budget,
            interval_seconds = self.config.interval_seconds,
            "Polling backup status"
        );

        for attempt in 1..=budget {
            let snapshot = self
                .service
                .backup_status(&handle.datalake_name, &handle.backup_id)
                .await?;
            let status = snapshot.parsed_status();
            let elapsed = HumanDuration::from(started.elapsed());

            debug!(backup_id = %handle.backup_id, attempt, status = %status, "Status observed");

            if status.is_terminal() {
                let breakdown = DurationBreakdown::from_snapshot(&snapshot);
                writeln!(out, "[{}] Backup {} finished: {}", elapsed, handle.backup_id, status)?;
                write!(out, "{}", breakdown)?;

                if status.is_failure() {
                    let reason = snapshot
                        .failure_reason
                        .filter(|r| !r.trim().is_empty())
                        .unwrap_or_else(|| "Unknown".to_string());
                    writeln!(out, "Failure reason: {}", reason)?;
                    return Err(WorkflowError::TerminalFailure {
                        backup_id: handle.backup_id.clone(),
                        status,
                        reason,
                    });
                }

                info!(backup_id = %handle.backup_id, attempts = attempt, status = %status, "Backup finished");
                return Ok(FinalReport {
                    backup_id: handle.backup_id.clone(),
                    status,
                    attempts: attempt,
                    elapsed: started.elapsed(),
                    breakdown,
                });
            }

            if let BackupStatus::Unknown(raw) = &status {
                warn!(
                    backup_id = %handle.backup_id,
                    attempt,
                    status = %raw,
                    "Unrecognised backup status, treating as in progress"
                );
            }

            writeln!(
                out,
                "[{}] Attempt {}/{}: status {}",
                elapsed, attempt, budget, status
            )?;

            if !shown_initial {
                write!(out, "{}", DurationBreakdown::from_snapshot(&snapshot))?;
                shown_initial = true;
            }

            last_status = status;

            if attempt < budget {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(
            backup_id = %handle.backup_id,
            attempts = budget,
            last_status = %last_status,
            "Polling budget exhausted"
        );

        Err(WorkflowError::Timeout {
            backup_id: handle.backup_id.clone(),
            attempts: budget,
            last_status,
        })
    }
}
