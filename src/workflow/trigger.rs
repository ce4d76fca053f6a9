//! Backup submission

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use super::error::{Result, TriggerError};
use super::types::{EnvironmentContext, JobHandle};
use crate::client::models::is_present;
use crate::client::{BackupRequest, BackupService};

/// `<datalake>-backup-<YYYYMMDD-HHMMSS>`
pub fn default_backup_name<Tz: TimeZone>(datalake_name: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-backup-{}", datalake_name, now.format("%Y%m%d-%H%M%S"))
}

/// Caller-supplied name if usable, otherwise the timestamped default
pub fn backup_name_or_default(datalake_name: &str, requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_backup_name(datalake_name, &Local::now()))
}

pub struct Trigger<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: BackupService + ?Sized> Trigger<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Submit the backup and return the handle the poller follows
    pub async fn trigger_backup(
        &self,
        datalake_name: &str,
        backup_name: &str,
        backup_location: &str,
        validation_only: bool,
    ) -> Result<JobHandle> {
        let request = BackupRequest::builder()
            .datalake_name(datalake_name)
            .backup_name(backup_name)
            .backup_location(backup_location)
            .validation_only(validation_only)
            .build();

        info!(
            datalake = datalake_name,
            backup_name,
            location = backup_location,
            validation_only,
            "Submitting backup request"
        );

        let created = self.service.create_backup(&request).await?;

        let backup_id = created
            .backup_id
            .filter(|id| is_present(id))
            .ok_or_else(|| TriggerError::MissingBackupId {
                datalake: datalake_name.to_string(),
            })?;

        info!(datalake = datalake_name, backup_id = %backup_id, "Backup accepted");

        Ok(JobHandle {
            datalake_name: datalake_name.to_string(),
            backup_name: Some(request.backup_name),
            backup_id,
            validation_only,
        })
    }

    /// Trigger against a resolved environment, naming the backup if needed
    pub async fn trigger_for(
        &self,
        context: &EnvironmentContext,
        backup_name: Option<&str>,
        validation_only: bool,
    ) -> Result<JobHandle> {
        let name = backup_name_or_default(&context.datalake_name, backup_name);
        self.trigger_backup(
            &context.datalake_name,
            &name,
            &context.backup_location,
            validation_only,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BackupCreated, MockBackupService, ServiceCall};
    use crate::workflow::WorkflowError;
    use chrono::Utc;

    fn is_default_name(datalake: &str, name: &str) -> bool {
        let Some(suffix) = name.strip_prefix(&format!("{datalake}-backup-")) else {
            return false;
        };
        let parts: Vec<&str> = suffix.split('-').collect();
        parts.len() == 2
            && parts[0].len() == 8
            && parts[1].len() == 6
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn test_default_backup_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(
            default_backup_name("dl-01", &at),
            "dl-01-backup-20240309-070502"
        );
    }

    #[test]
    fn test_default_names_differ_a_second_apart() {
        let first = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        let second = first + chrono::Duration::seconds(1);
        assert_ne!(
            default_backup_name("dl-01", &first),
            default_backup_name("dl-01", &second)
        );
    }

    #[test]
    fn test_backup_name_or_default() {
        assert_eq!(backup_name_or_default("dl-01", Some("nightly")), "nightly");
        assert!(is_default_name("dl-01", &backup_name_or_default("dl-01", None)));
        assert!(is_default_name("dl-01", &backup_name_or_default("dl-01", Some("  "))));
    }

    #[tokio::test]
    async fn test_trigger_returns_handle() {
        let mock = MockBackupService::new().with_backup_id("bkp-123");

        let handle = Trigger::new(&mock)
            .trigger_backup("dl-01", "nightly", "s3a://bucket/backup", true)
            .await
            .unwrap();

        assert_eq!(handle.backup_id, "bkp-123");
        assert_eq!(handle.backup_name.as_deref(), Some("nightly"));
        assert!(handle.validation_only);
        assert_eq!(
            mock.calls(),
            vec![ServiceCall::CreateBackup(BackupRequest {
                datalake_name: "dl-01".to_string(),
                backup_name: "nightly".to_string(),
                backup_location: "s3a://bucket/backup".to_string(),
                validation_only: true,
            })]
        );
    }

    #[tokio::test]
    async fn test_missing_backup_id() {
        for created in [
            BackupCreated::default(),
            BackupCreated {
                backup_id: Some("null".to_string()),
                ..Default::default()
            },
            BackupCreated {
                backup_id: Some(String::new()),
                ..Default::default()
            },
        ] {
            let mock = MockBackupService::new().with_created(created);

            let err = Trigger::new(&mock)
                .trigger_backup("dl-01", "nightly", "s3a://bucket/backup", false)
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                WorkflowError::Trigger(TriggerError::MissingBackupId { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_trigger_for_generates_name() {
        let mock = MockBackupService::new().with_backup_id("bkp-9");
        let context = EnvironmentContext {
            datalake_name: "dl-01".to_string(),
            environment_crn: "crn:env:abc".to_string(),
            environment_name: "env-01".to_string(),
            backup_location: "s3a://bucket/backup".to_string(),
        };

        let handle = Trigger::new(&mock)
            .trigger_for(&context, None, false)
            .await
            .unwrap();

        let name = handle.backup_name.unwrap();
        assert!(is_default_name("dl-01", &name), "unexpected name {name}");
    }
}
