//! Repository for the `alert_rules` table.

use sqlx::PgPool;
use healthmesh_core::types::{DbId, Timestamp};

use crate::models::alert_history::{AlertHistoryEntry, CreateAlertHistory};
use crate::models::alert_rule::{AlertRule, CreateAlertRule, UpdateAlertRule};
use crate::repositories::AlertHistoryRepo;

/// Column list for `alert_rules` queries.
const COLUMNS: &str = "\
    id, name, module, metric_name, condition, threshold, severity, \
    notification_channels, cooldown_minutes, is_active, last_triggered_at, \
    created_at, updated_at";

/// Provides CRUD operations and the trigger claim for alert rules.
pub struct AlertRuleRepo;

impl AlertRuleRepo {
    pub async fn create(pool: &PgPool, input: &CreateAlertRule) -> Result<AlertRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_rules \
                (name, module, metric_name, condition, threshold, severity, \
                 notification_channels, cooldown_minutes, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(input.name.trim())
            .bind(&input.module)
            .bind(&input.metric_name)
            .bind(&input.condition)
            .bind(input.threshold)
            .bind(&input.severity)
            .bind(&input.notification_channels)
            .bind(input.cooldown_minutes)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AlertRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_rules WHERE id = $1");
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rules, optionally narrowed to one module.
    pub async fn list(pool: &PgPool, module: Option<&str>) -> Result<Vec<AlertRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_rules \
             WHERE ($1::text IS NULL OR module = $1) \
             ORDER BY module, name, id"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(module)
            .fetch_all(pool)
            .await
    }

    /// Rules the alert pass evaluates.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<AlertRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_rules WHERE is_active ORDER BY id");
        sqlx::query_as::<_, AlertRule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the rule does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAlertRule,
    ) -> Result<Option<AlertRule>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_rules SET \
                name = COALESCE($2, name), \
                module = COALESCE($3, module), \
                metric_name = COALESCE($4, metric_name), \
                condition = COALESCE($5, condition), \
                threshold = COALESCE($6, threshold), \
                severity = COALESCE($7, severity), \
                notification_channels = COALESCE($8, notification_channels), \
                cooldown_minutes = COALESCE($9, cooldown_minutes), \
                is_active = COALESCE($10, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.module)
            .bind(&input.metric_name)
            .bind(&input.condition)
            .bind(input.threshold)
            .bind(&input.severity)
            .bind(&input.notification_channels)
            .bind(input.cooldown_minutes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a rule. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alert_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically claim the right to fire `id` at `now`.
    ///
    /// The update only matches while the rule is active and outside its
    /// cooldown as stored in the row, so concurrent evaluators racing on the
    /// same rule see exactly one `Some`. Returns the rule as it was claimed.
    pub async fn claim_trigger(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<AlertRule>, sqlx::Error> {
        Self::claim_trigger_inner(pool, id, now).await
    }

    /// Claim `id` at `now` and record the fired alert in one transaction.
    ///
    /// `entry` builds the history row from the claimed rule. If the insert
    /// fails the claim rolls back with it, so the rule is not left in
    /// cooldown without a recorded alert.
    pub async fn claim_and_record<F>(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
        entry: F,
    ) -> Result<Option<(AlertRule, AlertHistoryEntry)>, sqlx::Error>
    where
        F: FnOnce(&AlertRule) -> CreateAlertHistory + Send,
    {
        let mut tx = pool.begin().await?;

        let Some(rule) = Self::claim_trigger_inner(&mut *tx, id, now).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let alert = AlertHistoryRepo::insert(&mut *tx, &entry(&rule)).await?;

        tx.commit().await?;
        Ok(Some((rule, alert)))
    }

    async fn claim_trigger_inner<'e, E>(
        executor: E,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<AlertRule>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let query = format!(
            "UPDATE alert_rules SET last_triggered_at = $2 \
             WHERE id = $1 \
               AND is_active \
               AND (last_triggered_at IS NULL \
                    OR last_triggered_at <= $2 - make_interval(mins => cooldown_minutes)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(executor)
            .await
    }
}
