//! Alert history models.

use healthmesh_core::error::CoreError;
use healthmesh_core::matrix::AlertSnapshot;
use healthmesh_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alert_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertHistoryEntry {
    pub id: DbId,
    pub rule_id: Option<DbId>,
    pub module: String,
    pub metric_name: String,
    pub metric_value: Option<f64>,
    pub threshold: Option<f64>,
    pub message: String,
    pub severity: String,
    pub triggered_at: Timestamp,
    pub is_resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub is_acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    pub acknowledged_by: Option<DbId>,
}

impl AlertHistoryEntry {
    /// The aggregator's view of this entry.
    pub fn snapshot(&self) -> Result<AlertSnapshot, CoreError> {
        Ok(AlertSnapshot {
            module: self.module.parse()?,
            triggered_at: self.triggered_at,
            is_resolved: self.is_resolved,
            is_acknowledged: self.is_acknowledged,
        })
    }
}

/// A fired alert to be recorded.
#[derive(Debug, Clone)]
pub struct CreateAlertHistory {
    pub rule_id: DbId,
    pub module: String,
    pub metric_name: String,
    pub metric_value: f64,
    pub threshold: f64,
    pub message: String,
    pub severity: String,
    pub triggered_at: Timestamp,
}

/// Open alert counts.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct AlertHistoryCounts {
    pub active: i64,
    pub unacknowledged: i64,
}
