//! Duration breakdown rendered while a backup is polled

use std::fmt;

use crate::client::models::{BackupStatusSnapshot, Minutes, OperationState};
use crate::client::NOT_AVAILABLE;

/// One rendered value per backup sub-operation.
///
/// Each value is the actual duration when reported, else the predicted
/// duration, else [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationBreakdown {
    pub total_predicted: String,
    pub admin: Vec<DurationRow>,
    pub hbase: Vec<DurationRow>,
    pub solr: Vec<DurationRow>,
    pub database: DurationRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationRow {
    pub label: &'static str,
    pub minutes: String,
}

impl DurationRow {
    fn new(label: &'static str, state: Option<&OperationState>) -> Self {
        let minutes = state
            .and_then(OperationState::best_duration)
            .map(Minutes::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self { label, minutes }
    }
}

impl DurationBreakdown {
    pub fn from_snapshot(snapshot: &BackupStatusSnapshot) -> Self {
        let states = snapshot.operation_states.as_ref();
        let admin = states.and_then(|s| s.admin_operations.as_ref());
        let hbase = states.and_then(|s| s.hbase.as_ref());
        let solr = states.and_then(|s| s.solr.as_ref());

        Self {
            total_predicted: snapshot
                .total_predicted_duration_in_minutes
                .as_ref()
                .map(Minutes::to_string)
                .filter(|m| crate::client::models::is_present(m))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            admin: vec![
                DurationRow::new(
                    "Storage permission precheck",
                    admin.and_then(|a| a.precheck_storage_permission.as_ref()),
                ),
                DurationRow::new(
                    "Ranger audit collection validation",
                    admin.and_then(|a| a.ranger_audit_collection_validation.as_ref()),
                ),
                DurationRow::new(
                    "Dry run validation",
                    admin.and_then(|a| a.dry_run_validation.as_ref()),
                ),
            ],
            hbase: vec![
                DurationRow::new(
                    "Atlas entity audit event table",
                    hbase.and_then(|h| h.atlas_entity_audit_event_table.as_ref()),
                ),
                DurationRow::new(
                    "Atlas Janus table",
                    hbase.and_then(|h| h.atlas_janus_table.as_ref()),
                ),
            ],
            solr: vec![
                DurationRow::new(
                    "Edge index collection",
                    solr.and_then(|s| s.edge_index_collection.as_ref()),
                ),
                DurationRow::new(
                    "Fulltext index collection",
                    solr.and_then(|s| s.fulltext_index_collection.as_ref()),
                ),
                DurationRow::new(
                    "Ranger audits collection",
                    solr.and_then(|s| s.ranger_audits_collection.as_ref()),
                ),
                DurationRow::new(
                    "Vertex index collection",
                    solr.and_then(|s| s.vertex_index_collection.as_ref()),
                ),
            ],
            database: DurationRow::new("Database", states.and_then(|s| s.database.as_ref())),
        }
    }

    /// All rows in display order
    pub fn rows(&self) -> impl Iterator<Item = &DurationRow> {
        self.admin
            .iter()
            .chain(self.hbase.iter())
            .chain(self.solr.iter())
            .chain(std::iter::once(&self.database))
    }

    pub fn row(&self, label: &str) -> Option<&DurationRow> {
        self.rows().find(|row| row.label == label)
    }
}

const LABEL_WIDTH: usize = 38;

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, rows: &[DurationRow]) -> fmt::Result {
    writeln!(f, "  {}:", title)?;
    for row in rows {
        writeln!(f, "    {:<width$} {}", row.label, row.minutes, width = LABEL_WIDTH)?;
    }
    Ok(())
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Duration breakdown (minutes)")?;
        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(f, "  Total predicted duration: {}", self.total_predicted)?;
        write_section(f, "Admin operations", &self.admin)?;
        write_section(f, "HBase", &self.hbase)?;
        write_section(f, "Solr", &self.solr)?;
        write_section(f, "Database", std::slice::from_ref(&self.database))?;
        writeln!(f, "{}", "-".repeat(60))
    }
}
