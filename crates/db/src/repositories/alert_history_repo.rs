//! Repository for the `alert_history` table.

use sqlx::PgPool;
use healthmesh_core::types::DbId;

use crate::models::alert_history::{AlertHistoryCounts, AlertHistoryEntry, CreateAlertHistory};

/// Column list for `alert_history` queries.
const COLUMNS: &str = "\
    id, rule_id, module, metric_name, metric_value, threshold, message, severity, \
    triggered_at, is_resolved, resolved_at, is_acknowledged, acknowledged_at, acknowledged_by";

/// Provides query operations for fired alerts.
pub struct AlertHistoryRepo;

impl AlertHistoryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAlertHistory,
    ) -> Result<AlertHistoryEntry, sqlx::Error> {
        Self::insert(pool, input).await
    }

    /// Insert through any executor, so the claim transaction can record the
    /// alert it fires.
    pub(crate) async fn insert<'e, E>(
        executor: E,
        input: &CreateAlertHistory,
    ) -> Result<AlertHistoryEntry, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let query = format!(
            "INSERT INTO alert_history \
                (rule_id, module, metric_name, metric_value, threshold, message, severity, triggered_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(input.rule_id)
            .bind(&input.module)
            .bind(&input.metric_name)
            .bind(input.metric_value)
            .bind(input.threshold)
            .bind(&input.message)
            .bind(&input.severity)
            .bind(input.triggered_at)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AlertHistoryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_history WHERE id = $1");
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts newest first.
    ///
    /// When `unresolved_only` is `true`, resolved alerts are excluded.
    pub async fn list(
        pool: &PgPool,
        unresolved_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertHistoryEntry>, sqlx::Error> {
        let filter = if unresolved_only {
            "WHERE is_resolved = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM alert_history {filter} \
             ORDER BY triggered_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All unresolved alerts, newest first.
    pub async fn list_unresolved(pool: &PgPool) -> Result<Vec<AlertHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_history \
             WHERE is_resolved = false \
             ORDER BY triggered_at DESC, id DESC"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Every alert fired by one rule, oldest first.
    pub async fn list_for_rule(
        pool: &PgPool,
        rule_id: DbId,
    ) -> Result<Vec<AlertHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_history WHERE rule_id = $1 ORDER BY triggered_at, id"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(rule_id)
            .fetch_all(pool)
            .await
    }

    /// Mark an alert acknowledged.
    ///
    /// Acknowledging twice keeps the first acknowledger and timestamp.
    pub async fn acknowledge(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<AlertHistoryEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_history SET \
                is_acknowledged = true, \
                acknowledged_at = COALESCE(acknowledged_at, NOW()), \
                acknowledged_by = COALESCE(acknowledged_by, $2) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark an alert resolved. Resolving twice keeps the first timestamp.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AlertHistoryEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_history SET \
                is_resolved = true, \
                resolved_at = COALESCE(resolved_at, NOW()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertHistoryEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Counts of unresolved alerts and of those not yet acknowledged.
    pub async fn counts(pool: &PgPool) -> Result<AlertHistoryCounts, sqlx::Error> {
        sqlx::query_as::<_, AlertHistoryCounts>(
            "SELECT \
                COUNT(*) AS active, \
                COUNT(*) FILTER (WHERE is_acknowledged = false) AS unacknowledged \
             FROM alert_history WHERE is_resolved = false",
        )
        .fetch_one(pool)
        .await
    }
}
