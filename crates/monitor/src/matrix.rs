//! Loads a store snapshot and aggregates it into the health matrix.

use chrono::Duration;

use healthmesh_core::matrix::{aggregate, MatrixResponse, LOOKBACK_HOURS};
use healthmesh_core::types::Timestamp;
use healthmesh_db::repositories::{AlertHistoryRepo, MetricRecordRepo, ModuleConfigRepo};
use healthmesh_db::DbPool;

use crate::MonitorError;

/// Build the matrix as of `now`.
///
/// Rows that no longer parse (an unknown module id or status) are skipped
/// with a warning rather than failing the whole matrix.
pub async fn load_matrix(pool: &DbPool, now: Timestamp) -> Result<MatrixResponse, MonitorError> {
    let configs = ModuleConfigRepo::list(pool).await?;
    let records = MetricRecordRepo::list_since(pool, now - Duration::hours(LOOKBACK_HOURS)).await?;
    let open_alerts = AlertHistoryRepo::list_unresolved(pool).await?;

    let modules: Vec<_> = configs
        .iter()
        .filter_map(|c| match c.snapshot() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(module = %c.module, error = %e, "Skipping module config");
                None
            }
        })
        .collect();

    let samples: Vec<_> = records
        .iter()
        .filter_map(|r| match r.sample() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(record_id = r.id, error = %e, "Skipping metric record");
                None
            }
        })
        .collect();

    let alerts: Vec<_> = open_alerts
        .iter()
        .filter_map(|a| match a.snapshot() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(alert_id = a.id, error = %e, "Skipping alert");
                None
            }
        })
        .collect();

    Ok(aggregate(&modules, &samples, &alerts, now))
}
