//! Optional retry decorator for [`BackupService`]
//!
//! The default policy is a single attempt: every failure surfaces immediately.
//! Raising `max_attempts` retries transient transport failures with exponential
//! backoff; decode failures are never retried. Backup creation is only
//! retried when the CLI could not be launched at all.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{
    BackupCreated, BackupStatusSnapshot, DatalakeDescription, EnvironmentDescription,
    EnvironmentList,
};
use super::{BackupRequest, BackupService, Result, ServiceError};
use crate::config::RetryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_secs(2),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff.as_duration(),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based): backoff, 2x, 4x, ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }
}

/// Wraps a service and retries transient failures according to a [`RetryPolicy`]
#[derive(Debug)]
pub struct RetryingService<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: BackupService> RetryingService<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn retry<T, F, Fut>(
        &self,
        operation: &'static str,
        retryable: fn(&ServiceError) -> bool,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match call().await {
                Ok(value) => {
                    if attempts > 1 {
                        debug!(operation, attempts, "Service call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if retryable(&e) && attempts < self.policy.max_attempts => {
                    let delay = self.policy.delay_after(attempts);
                    warn!(
                        operation,
                        attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Service call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if attempts > 1 {
                        warn!(operation, attempts, error = %e, "Service call failed after retries");
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl<S: BackupService> BackupService for RetryingService<S> {
    async fn describe_datalake(&self, datalake_name: &str) -> Result<DatalakeDescription> {
        self.retry("describe_datalake", ServiceError::is_transient, || {
            self.inner.describe_datalake(datalake_name)
        })
        .await
    }

    async fn list_environments(&self) -> Result<EnvironmentList> {
        self.retry("list_environments", ServiceError::is_transient, || {
            self.inner.list_environments()
        })
        .await
    }

    async fn describe_environment(
        &self,
        environment_name: &str,
    ) -> Result<EnvironmentDescription> {
        self.retry("describe_environment", ServiceError::is_transient, || {
            self.inner.describe_environment(environment_name)
        })
        .await
    }

    async fn create_backup(&self, request: &BackupRequest) -> Result<BackupCreated> {
        // Not idempotent: only retry when the request never left this process
        self.retry("create_backup", ServiceError::is_unsent, || {
            self.inner.create_backup(request)
        })
        .await
    }

    async fn backup_status(
        &self,
        datalake_name: &str,
        backup_id: &str,
    ) -> Result<BackupStatusSnapshot> {
        self.retry("backup_status", ServiceError::is_transient, || {
            self.inner.backup_status(datalake_name, backup_id)
        })
        .await
    }
}
