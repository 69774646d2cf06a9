//! Repository for the `metric_records` table (append-only time-series).

use sqlx::PgPool;
use healthmesh_core::types::Timestamp;

use crate::models::metric_record::{CreateMetricRecord, MetricRecord};

/// Column list for `metric_records` SELECT queries.
const COLUMNS: &str = "id, module, metric_name, value, unit, status, collected_at, metadata";

/// Column list for `metric_records` INSERT statements.
const INSERT_COLUMNS: &str = "module, metric_name, value, unit, status, collected_at, metadata";

/// Bound parameters per inserted row.
const PARAMS_PER_ROW: usize = 7;

/// Provides query operations for stored metrics.
pub struct MetricRecordRepo;

impl MetricRecordRepo {
    /// Write a collection batch with one shared `collected_at`.
    ///
    /// Uses a single multi-row INSERT, so the batch is stored entirely or not
    /// at all. Returns the number of rows written.
    pub async fn insert_batch(
        pool: &PgPool,
        collected_at: Timestamp,
        records: &[CreateMetricRecord],
    ) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut query = format!("INSERT INTO metric_records ({INSERT_COLUMNS}) VALUES ");
        let mut param_idx = 1usize;
        for (i, _) in records.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push('(');
            for j in 0..PARAMS_PER_ROW {
                if j > 0 {
                    query.push_str(", ");
                }
                query.push('$');
                query.push_str(&param_idx.to_string());
                param_idx += 1;
            }
            query.push(')');
        }

        let mut q = sqlx::query(&query);
        for r in records {
            q = q
                .bind(&r.module)
                .bind(&r.metric_name)
                .bind(r.value)
                .bind(&r.unit)
                .bind(&r.status)
                .bind(collected_at)
                .bind(&r.metadata);
        }

        let result = q.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Every record collected at or after `since`, newest first.
    pub async fn list_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<MetricRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_records \
             WHERE collected_at >= $1 \
             ORDER BY collected_at DESC, id"
        );
        sqlx::query_as::<_, MetricRecord>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Metric history for one module, newest first.
    pub async fn list_for_module(
        pool: &PgPool,
        module: &str,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<MetricRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_records \
             WHERE module = $1 AND collected_at >= $2 \
             ORDER BY collected_at DESC, metric_name \
             LIMIT $3"
        );
        sqlx::query_as::<_, MetricRecord>(&query)
            .bind(module)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The most recent value of `(module, metric_name)`.
    pub async fn latest(
        pool: &PgPool,
        module: &str,
        metric_name: &str,
    ) -> Result<Option<MetricRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_records \
             WHERE module = $1 AND metric_name = $2 \
             ORDER BY collected_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, MetricRecord>(&query)
            .bind(module)
            .bind(metric_name)
            .fetch_optional(pool)
            .await
    }

    /// Latest `collected_at` per module that has any records.
    pub async fn last_collected_per_module(
        pool: &PgPool,
    ) -> Result<Vec<(String, Timestamp)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT module, MAX(collected_at) FROM metric_records GROUP BY module ORDER BY module",
        )
        .fetch_all(pool)
        .await
    }

    /// Delete one module's records collected before `cutoff`.
    ///
    /// Returns the number of rows deleted.
    pub async fn delete_older_than(
        pool: &PgPool,
        module: &str,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM metric_records WHERE module = $1 AND collected_at < $2")
                .bind(module)
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
