//! End-to-end workflow tests against the scripted service client
//!
//! These drive the public pipeline (resolve → trigger → poll) exactly as the
//! binary does, with `MockBackupService` standing in for the cdp CLI and tokio's
//! paused clock standing in for wall-clock waits.

use serde_json::json;

use dlbackup::client::{
    BackupStatus, BackupStatusSnapshot, MockBackupService, RetryPolicy, RetryingService,
    ServiceCall,
};
use dlbackup::config::{PollingConfig, ResolverConfig};
use dlbackup::workflow::{BackupOptions, JobHandle, ResolutionError, Workflow, WorkflowError};

fn snapshot(value: serde_json::Value) -> BackupStatusSnapshot {
    serde_json::from_value(value).expect("valid status fixture")
}

fn in_progress() -> BackupStatusSnapshot {
    snapshot(json!({ "status": "IN_PROGRESS" }))
}

/// Datalake dl-01 → crn:env:abc → env-01 → s3a://bucket/backup, backup ID bkp-123
fn resolvable_mock() -> MockBackupService {
    MockBackupService::new()
        .with_datalake("dl-01", "crn:env:abc")
        .with_environment("env-01", "crn:env:abc")
        .with_backup_location("env-01", "s3a://bucket/backup")
        .with_backup_id("bkp-123")
}

fn workflow(mock: MockBackupService, polling: PollingConfig) -> Workflow<MockBackupService> {
    Workflow::new(mock, ResolverConfig::default(), polling)
}

fn validation_options() -> BackupOptions {
    BackupOptions {
        datalake_name: "dl-01".to_string(),
        backup_name: None,
        validation_only: true,
    }
}

#[tokio::test(start_paused = true)]
async fn validation_run_reports_actual_durations() {
    let running = snapshot(json!({
        "status": "RUNNING",
        "totalPredictedDurationInMinutes": 25,
        "operationStates": {
            "adminOperations": {
                "precheckStoragePermission": { "predictedDurationInMinutes": 1 },
                "rangerAuditCollectionValidation": { "predictedDurationInMinutes": 2 },
                "dryRunValidation": { "predictedDurationInMinutes": 3 }
            },
            "hbase": {
                "atlasEntityAuditEventTable": { "predictedDurationInMinutes": 4 },
                "atlasJanusTable": { "predictedDurationInMinutes": 5 }
            },
            "database": { "predictedDurationInMinutes": 6 }
        }
    }));
    let done = snapshot(json!({
        "status": "VALIDATION_SUCCESSFUL",
        "totalPredictedDurationInMinutes": 25,
        "operationStates": {
            "adminOperations": {
                "precheckStoragePermission": {
                    "durationInMinutes": 0.5,
                    "predictedDurationInMinutes": 1
                },
                "rangerAuditCollectionValidation": {
                    "durationInMinutes": 1,
                    "predictedDurationInMinutes": 2
                },
                "dryRunValidation": {
                    "durationInMinutes": 2,
                    "predictedDurationInMinutes": 3
                }
            },
            "hbase": {
                "atlasEntityAuditEventTable": { "predictedDurationInMinutes": 4 },
                "atlasJanusTable": { "durationInMinutes": 3, "predictedDurationInMinutes": 5 }
            },
            "database": { "durationInMinutes": 7, "predictedDurationInMinutes": 6 }
        }
    }));

    let workflow = workflow(
        resolvable_mock().with_statuses([running, done]),
        PollingConfig::default(),
    );
    let mut out = Vec::new();

    let report = workflow
        .run(&validation_options(), &mut out)
        .await
        .expect("validation backup succeeds");

    assert_eq!(report.backup_id, "bkp-123");
    assert_eq!(report.status, BackupStatus::ValidationSuccessful);
    assert_eq!(report.attempts, 2);

    let breakdown = &report.breakdown;
    assert_eq!(breakdown.total_predicted, "25");
    assert_eq!(breakdown.row("Storage permission precheck").unwrap().minutes, "0.5");
    assert_eq!(breakdown.row("Dry run validation").unwrap().minutes, "2");
    assert_eq!(breakdown.row("Atlas entity audit event table").unwrap().minutes, "4");
    assert_eq!(breakdown.row("Atlas Janus table").unwrap().minutes, "3");
    assert_eq!(breakdown.row("Edge index collection").unwrap().minutes, "N/A");
    assert_eq!(breakdown.database.minutes, "7");

    let calls = workflow.service().calls();
    assert_eq!(
        &calls[..3],
        &[
            ServiceCall::DescribeDatalake("dl-01".to_string()),
            ServiceCall::ListEnvironments,
            ServiceCall::DescribeEnvironment("env-01".to_string()),
        ]
    );
    match &calls[3] {
        ServiceCall::CreateBackup(request) => {
            assert_eq!(request.datalake_name, "dl-01");
            assert_eq!(request.backup_location, "s3a://bucket/backup");
            assert!(request.validation_only);
            assert!(request.backup_name.starts_with("dl-01-backup-"));
        }
        other => panic!("expected create call, got {other:?}"),
    }
    assert_eq!(workflow.service().status_calls(), 2);

    let rendered = String::from_utf8(out).unwrap();
    assert!(rendered.contains("Backup location: s3a://bucket/backup"));
    assert!(rendered.contains("(validation only)"));
    assert_eq!(rendered.matches("Duration breakdown").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unmatched_crn_never_triggers() {
    let mock = MockBackupService::new()
        .with_datalake("dl-01", "crn:env:abc")
        .with_environment("env-02", "crn:env:other")
        .with_backup_id("bkp-123");
    let workflow = workflow(mock, PollingConfig::default());
    let mut out = Vec::new();

    let err = workflow
        .run(&validation_options(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Resolution(ResolutionError::EnvironmentNotFound { .. })
    ));
    assert_eq!(workflow.service().create_calls(), 0);
    assert_eq!(workflow.service().status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn stuck_backup_times_out_after_budget() {
    let polling = PollingConfig {
        max_minutes: 1,
        interval_seconds: 5,
    };
    let workflow = workflow(resolvable_mock().with_statuses([in_progress()]), polling);
    let mut out = Vec::new();

    let err = workflow
        .run(&validation_options(), &mut out)
        .await
        .unwrap_err();

    match err {
        WorkflowError::Timeout {
            backup_id,
            attempts,
            last_status,
        } => {
            assert_eq!(backup_id, "bkp-123");
            assert_eq!(attempts, 12);
            assert_eq!(last_status, BackupStatus::InProgress);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(workflow.service().status_calls(), 12);
}

#[tokio::test(start_paused = true)]
async fn explicit_backup_name_is_used_verbatim() {
    let workflow = workflow(
        resolvable_mock().with_statuses([snapshot(json!({ "status": "SUCCESSFUL" }))]),
        PollingConfig::default(),
    );
    let options = BackupOptions {
        datalake_name: "dl-01".to_string(),
        backup_name: Some("pre-upgrade".to_string()),
        validation_only: false,
    };
    let mut out = Vec::new();

    let report = workflow.run(&options, &mut out).await.unwrap();

    assert_eq!(report.status, BackupStatus::Successful);
    let created = workflow
        .service()
        .calls()
        .into_iter()
        .find_map(|call| match call {
            ServiceCall::CreateBackup(request) => Some(request),
            _ => None,
        })
        .unwrap();
    assert_eq!(created.backup_name, "pre-upgrade");
    assert!(!created.validation_only);
}

#[tokio::test(start_paused = true)]
async fn resume_polls_without_resolving() {
    let workflow = workflow(
        MockBackupService::new().with_statuses([
            in_progress(),
            snapshot(json!({ "status": "FAILED", "failureReason": "Solr unreachable" })),
        ]),
        PollingConfig::default(),
    );
    let mut out = Vec::new();

    let err = workflow
        .poll(&JobHandle::existing("dl-01", "bkp-777"), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::TerminalFailure { ref reason, .. } if reason == "Solr unreachable"
    ));
    assert!(workflow.service().calls().iter().all(|call| matches!(
        call,
        ServiceCall::BackupStatus { backup_id, .. } if backup_id == "bkp-777"
    )));
}

#[tokio::test(start_paused = true)]
async fn retry_policy_absorbs_transient_failure() {
    let service = RetryingService::new(
        resolvable_mock()
            .with_statuses([snapshot(json!({ "status": "VALIDATION_SUCCESSFUL" }))])
            .failing_next(1),
        RetryPolicy {
            max_attempts: 2,
            backoff: std::time::Duration::from_secs(1),
        },
    );
    let workflow = Workflow::new(service, ResolverConfig::default(), PollingConfig::default());
    let mut out = Vec::new();

    let report = workflow.run(&validation_options(), &mut out).await.unwrap();

    assert_eq!(report.status, BackupStatus::ValidationSuccessful);
    // describe_datalake was issued twice: the injected failure plus the retry
    let describes = workflow
        .service()
        .inner()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ServiceCall::DescribeDatalake(_)))
        .count();
    assert_eq!(describes, 2);
}
