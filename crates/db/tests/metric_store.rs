//! Integration tests for the metric store and module configuration.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use healthmesh_db::models::metric_record::CreateMetricRecord;
use healthmesh_db::models::module_config::UpdateModuleConfig;
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};

fn record(module: &str, name: &str, value: f64, status: &str) -> CreateMetricRecord {
    CreateMetricRecord {
        module: module.to_string(),
        metric_name: name.to_string(),
        value,
        unit: "count".to_string(),
        status: status.to_string(),
        metadata: serde_json::json!({ "window": "1h" }),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn batch_shares_one_collected_at(pool: PgPool) {
    let now = Utc::now();
    let written = MetricRecordRepo::insert_batch(
        &pool,
        now,
        &[
            record("backend", "error_rate", 1.5, "healthy"),
            record("backend", "latency_p95", 1200.0, "warning"),
            record("email", "queue_size", 3.0, "healthy"),
        ],
    )
    .await
    .unwrap();
    assert_eq!(written, 3);

    let rows = MetricRecordRepo::list_since(&pool, now - Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    let first = rows[0].collected_at;
    assert!(rows.iter().all(|r| r.collected_at == first));
    assert_eq!(rows[0].metadata["window"], "1h");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_batch_writes_nothing(pool: PgPool) {
    let written = MetricRecordRepo::insert_batch(&pool, Utc::now(), &[]).await.unwrap();
    assert_eq!(written, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_status_fails_the_whole_batch(pool: PgPool) {
    let result = MetricRecordRepo::insert_batch(
        &pool,
        Utc::now(),
        &[
            record("backend", "error_rate", 1.0, "healthy"),
            record("backend", "latency_p95", 1.0, "degraded"),
        ],
    )
    .await;
    assert!(result.is_err());

    let rows = MetricRecordRepo::list_since(&pool, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_returns_newest_value(pool: PgPool) {
    let now = Utc::now();
    MetricRecordRepo::insert_batch(&pool, now - Duration::minutes(10), &[record("database", "usage_percent", 70.0, "healthy")])
        .await
        .unwrap();
    MetricRecordRepo::insert_batch(&pool, now, &[record("database", "usage_percent", 95.0, "critical")])
        .await
        .unwrap();

    let latest = MetricRecordRepo::latest(&pool, "database", "usage_percent")
        .await
        .unwrap()
        .expect("a record");
    assert_eq!(latest.value, 95.0);

    let missing = MetricRecordRepo::latest(&pool, "database", "size_mb").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_older_than_is_scoped_to_module(pool: PgPool) {
    let now = Utc::now();
    let old = now - Duration::days(40);
    MetricRecordRepo::insert_batch(
        &pool,
        old,
        &[
            record("backend", "error_rate", 1.0, "healthy"),
            record("email", "queue_size", 1.0, "healthy"),
        ],
    )
    .await
    .unwrap();
    MetricRecordRepo::insert_batch(&pool, now, &[record("backend", "error_rate", 2.0, "healthy")])
        .await
        .unwrap();

    let deleted = MetricRecordRepo::delete_older_than(&pool, "backend", now - Duration::days(30))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = MetricRecordRepo::list_since(&pool, old - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().any(|r| r.module == "email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_collected_per_module(pool: PgPool) {
    let now = Utc::now();
    MetricRecordRepo::insert_batch(&pool, now - Duration::minutes(30), &[record("backend", "error_rate", 1.0, "healthy")])
        .await
        .unwrap();
    MetricRecordRepo::insert_batch(&pool, now, &[record("backend", "error_rate", 1.0, "healthy")])
        .await
        .unwrap();

    let last = MetricRecordRepo::last_collected_per_module(&pool).await.unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].0, "backend");
    assert!((last[0].1 - now).num_milliseconds().abs() < 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn module_update_is_partial(pool: PgPool) {
    let before = ModuleConfigRepo::find_by_module(&pool, "email")
        .await
        .unwrap()
        .expect("seeded");

    let updated = ModuleConfigRepo::update(
        &pool,
        "email",
        &UpdateModuleConfig {
            is_enabled: Some(false),
            retention_days: Some(7),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("updated");

    assert!(!updated.is_enabled);
    assert_eq!(updated.retention_days, 7);
    assert_eq!(updated.display_name, before.display_name);
    assert_eq!(updated.collection_interval_seconds, before.collection_interval_seconds);

    let enabled = ModuleConfigRepo::list_enabled(&pool).await.unwrap();
    assert!(enabled.iter().all(|m| m.module != "email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_unknown_module_returns_none(pool: PgPool) {
    let result = ModuleConfigRepo::update(&pool, "mainframe", &UpdateModuleConfig::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_check_constraint(pool: PgPool) {
    let result = ModuleConfigRepo::update(
        &pool,
        "logs",
        &UpdateModuleConfig {
            retention_days: Some(0),
            ..Default::default()
        },
    )
    .await;
    assert!(result.is_err());
}
