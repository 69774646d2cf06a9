//! One metric collection pass.

use serde::Serialize;

use healthmesh_core::collection::{gather, CollectionTarget, CounterSource, ModuleError};
use healthmesh_core::error::CoreError;
use healthmesh_core::types::Timestamp;
use healthmesh_db::models::metric_record::CreateMetricRecord;
use healthmesh_db::models::module_config::ModuleConfig;
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};
use healthmesh_db::DbPool;

use crate::retention;
use crate::MonitorError;

/// Outcome of a collection pass, including the prune that follows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub metrics_collected: u64,
    pub timestamp: Timestamp,
    pub errors: Vec<ModuleError>,
    pub pruned: u64,
}

/// Collect every enabled module, then prune.
pub async fn collect_enabled(
    pool: &DbPool,
    source: &dyn CounterSource,
    now: Timestamp,
) -> Result<CollectionReport, MonitorError> {
    let enabled = ModuleConfigRepo::list_enabled(pool).await?;
    collect_modules(pool, source, &enabled, now).await
}

/// Collect `configs` as one batch stamped `now`, then prune every module.
///
/// Disabled configs are skipped. Per-module query failures are reported in
/// `errors`; a failed batch insert fails the whole pass.
pub async fn collect_modules(
    pool: &DbPool,
    source: &dyn CounterSource,
    configs: &[ModuleConfig],
    now: Timestamp,
) -> Result<CollectionReport, MonitorError> {
    let mut errors = Vec::new();
    let mut targets = Vec::with_capacity(configs.len());
    for config in configs.iter().filter(|c| c.is_enabled) {
        match config.module_id() {
            Ok(module) => targets.push(CollectionTarget {
                module,
                capacity_total: config.capacity_total,
            }),
            Err(e) => errors.push(ModuleError {
                module: config.module.clone(),
                error: e.to_string(),
            }),
        }
    }

    let outcome = gather(source, &targets, now).await;
    for err in &outcome.errors {
        tracing::warn!(module = %err.module, error = %err.error, "Metric collection failed for module");
    }
    errors.extend(outcome.errors);

    let records: Vec<CreateMetricRecord> = outcome.metrics.iter().map(CreateMetricRecord::from).collect();
    let metrics_collected = MetricRecordRepo::insert_batch(pool, now, &records)
        .await
        .map_err(|e| CoreError::Upstream {
            source_name: "metric_records".to_string(),
            message: e.to_string(),
        })?;

    let all_configs = ModuleConfigRepo::list(pool).await?;
    let prune = retention::prune_modules(pool, &all_configs, now).await;
    let pruned = prune.total_deleted();
    errors.extend(prune.errors);

    tracing::info!(
        modules = targets.len(),
        metrics_collected,
        pruned,
        errors = errors.len(),
        "Metric collection pass complete"
    );

    Ok(CollectionReport {
        metrics_collected,
        timestamp: now,
        errors,
        pruned,
    })
}
