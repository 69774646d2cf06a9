//! Retention cleanup of the metric store.

use chrono::Duration;
use serde::Serialize;

use healthmesh_core::collection::ModuleError;
use healthmesh_core::types::Timestamp;
use healthmesh_db::models::module_config::ModuleConfig;
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};
use healthmesh_db::DbPool;

use crate::MonitorError;

/// Rows deleted for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePruned {
    pub module: String,
    pub deleted: u64,
}

/// Outcome of one prune pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
    pub modules: Vec<ModulePruned>,
    pub errors: Vec<ModuleError>,
}

impl PruneReport {
    pub fn total_deleted(&self) -> u64 {
        self.modules.iter().map(|m| m.deleted).sum()
    }
}

/// Oldest `collected_at` that `config` keeps at `now`.
pub fn retention_cutoff(config: &ModuleConfig, now: Timestamp) -> Timestamp {
    now - Duration::days(i64::from(config.retention_days))
}

/// Delete expired records for every configured module, enabled or not.
pub async fn prune(pool: &DbPool, now: Timestamp) -> Result<PruneReport, MonitorError> {
    let configs = ModuleConfigRepo::list(pool).await?;
    Ok(prune_modules(pool, &configs, now).await)
}

/// Delete expired records for `configs`, one statement per module.
///
/// A failing module is logged and reported; the others are still pruned.
pub async fn prune_modules(pool: &DbPool, configs: &[ModuleConfig], now: Timestamp) -> PruneReport {
    let mut report = PruneReport::default();

    for config in configs {
        let cutoff = retention_cutoff(config, now);
        match MetricRecordRepo::delete_older_than(pool, &config.module, cutoff).await {
            Ok(deleted) => {
                if deleted > 0 {
                    tracing::info!(module = %config.module, deleted, "Metric retention: purged old rows");
                } else {
                    tracing::debug!(module = %config.module, "Metric retention: no rows to purge");
                }
                report.modules.push(ModulePruned {
                    module: config.module.clone(),
                    deleted,
                });
            }
            Err(e) => {
                tracing::error!(module = %config.module, error = %e, "Metric retention: cleanup failed");
                report.errors.push(ModuleError {
                    module: config.module.clone(),
                    error: format!("retention: {e}"),
                });
            }
        }
    }

    report
}
