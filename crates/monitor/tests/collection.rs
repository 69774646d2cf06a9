//! Integration tests for collection passes and retention.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use healthmesh_core::catalog::{counters as c, RawCounters};
use healthmesh_core::collection::CounterSource;
use healthmesh_core::error::CoreError;
use healthmesh_core::modules::ModuleId;
use healthmesh_core::types::Timestamp;
use healthmesh_db::models::metric_record::CreateMetricRecord;
use healthmesh_db::models::module_config::UpdateModuleConfig;
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};
use healthmesh_monitor::collect::{collect_enabled, collect_modules};
use healthmesh_monitor::retention;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns fixed counters for the database module, empty counters for the
/// rest, and fails for every module in `failing`.
#[derive(Default)]
struct StubSource {
    failing: HashSet<ModuleId>,
}

#[async_trait]
impl CounterSource for StubSource {
    async fn counters(&self, module: ModuleId, _now: Timestamp) -> Result<RawCounters, CoreError> {
        if self.failing.contains(&module) {
            return Err(CoreError::Upstream {
                source_name: module.to_string(),
                message: "relation does not exist".into(),
            });
        }
        Ok(match module {
            ModuleId::Database => RawCounters::new()
                .with(c::SIZE_MB, 7800.0)
                .with(c::CONNECTIONS_ACTIVE, 12.0),
            _ => RawCounters::new(),
        })
    }
}

fn old_record(module: &str) -> CreateMetricRecord {
    CreateMetricRecord {
        module: module.to_string(),
        metric_name: "size_mb".to_string(),
        value: 100.0,
        unit: "MB".to_string(),
        status: "healthy".to_string(),
        metadata: serde_json::json!({}),
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn collection_writes_classified_metrics(pool: PgPool) {
    let now = Utc::now();
    let report = collect_enabled(&pool, &StubSource::default(), now).await.unwrap();

    assert_eq!(report.metrics_collected, 3);
    assert!(report.errors.is_empty());
    assert_eq!(report.timestamp, now);

    let usage = MetricRecordRepo::latest(&pool, "database", "usage_percent")
        .await
        .unwrap()
        .unwrap();
    assert!((usage.value - 95.21).abs() < 0.01);
    assert_eq!(usage.status, "critical");
    assert_eq!(usage.unit, "%");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failing_module_is_isolated(pool: PgPool) {
    let source = StubSource {
        failing: HashSet::from([ModuleId::Backend, ModuleId::Email]),
    };
    let report = collect_enabled(&pool, &source, Utc::now()).await.unwrap();

    assert_eq!(report.metrics_collected, 3);
    let failed: Vec<_> = report.errors.iter().map(|e| e.module.as_str()).collect();
    assert_eq!(failed, vec!["backend", "email"]);
    assert!(report.errors[0].error.contains("relation does not exist"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_module_is_skipped(pool: PgPool) {
    ModuleConfigRepo::update(
        &pool,
        "database",
        &UpdateModuleConfig {
            is_enabled: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let report = collect_enabled(&pool, &StubSource::default(), Utc::now()).await.unwrap();

    assert_eq!(report.metrics_collected, 0);
    assert!(MetricRecordRepo::latest(&pool, "database", "size_mb")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_disabled_configs_are_filtered(pool: PgPool) {
    let mut configs = ModuleConfigRepo::list(&pool).await.unwrap();
    for config in &mut configs {
        config.is_enabled = false;
    }
    let report = collect_modules(&pool, &StubSource::default(), &configs, Utc::now())
        .await
        .unwrap();
    assert_eq!(report.metrics_collected, 0);
    assert!(report.errors.is_empty());
}

// ---------------------------------------------------------------------------
// Retention
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn collection_prunes_expired_rows(pool: PgPool) {
    let now = Utc::now();
    // database keeps 30 days
    MetricRecordRepo::insert_batch(&pool, now - Duration::days(31), &[old_record("database")])
        .await
        .unwrap();
    MetricRecordRepo::insert_batch(&pool, now - Duration::days(29), &[old_record("database")])
        .await
        .unwrap();

    let report = collect_enabled(&pool, &StubSource::default(), now).await.unwrap();

    assert_eq!(report.pruned, 1);
    let kept = MetricRecordRepo::list_for_module(&pool, "database", now - Duration::days(60), 100)
        .await
        .unwrap();
    assert_eq!(kept.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn prune_covers_disabled_modules(pool: PgPool) {
    let now = Utc::now();
    ModuleConfigRepo::update(
        &pool,
        "logs",
        &UpdateModuleConfig {
            is_enabled: Some(false),
            retention_days: Some(7),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    MetricRecordRepo::insert_batch(&pool, now - Duration::days(8), &[old_record("logs")])
        .await
        .unwrap();

    let report = retention::prune(&pool, now).await.unwrap();

    assert_eq!(report.total_deleted(), 1);
    assert!(report.errors.is_empty());
    let logs = report.modules.iter().find(|m| m.module == "logs").unwrap();
    assert_eq!(logs.deleted, 1);
}
