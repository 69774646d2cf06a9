//! Raw counter queries over the operational source tables.
//!
//! Each module has one single-row query whose column names are
//! `healthmesh_core::catalog::counters` names. A `NULL` column (for example
//! an average over no rows) is left out of the counter map so the catalog
//! skips the metrics it feeds.

use sqlx::{Column, PgPool, Row};
use healthmesh_core::catalog::RawCounters;
use healthmesh_core::modules::ModuleId;
use healthmesh_core::types::Timestamp;

const DATABASE: &str = "\
    SELECT \
        (pg_database_size(current_database()) / 1048576.0)::float8 AS size_mb, \
        (SELECT COUNT(*) FROM pg_stat_activity \
          WHERE datname = current_database() AND state = 'active')::float8 AS connections_active";

const BACKEND: &str = "\
    SELECT \
        COUNT(*)::float8 AS request_count_1h, \
        (COUNT(*) FILTER (WHERE status_code >= 500))::float8 AS error_count_1h, \
        AVG(latency_ms)::float8 AS latency_avg, \
        (percentile_cont(0.95) WITHIN GROUP (ORDER BY latency_ms))::float8 AS latency_p95 \
    FROM request_logs \
    WHERE created_at > $1 - INTERVAL '1 hour' AND created_at <= $1";

const EMAIL: &str = "\
    SELECT \
        (COUNT(*) FILTER (WHERE status IN ('sent', 'delivered') \
            AND created_at > $1 - INTERVAL '1 hour'))::float8 AS sent_count_1h, \
        (COUNT(*) FILTER (WHERE status IN ('sent', 'delivered')))::float8 AS sent_count_24h, \
        (COUNT(*) FILTER (WHERE status IN ('failed', 'bounced') \
            AND created_at > $1 - INTERVAL '1 hour'))::float8 AS failed_count_1h, \
        (COUNT(*) FILTER (WHERE status <> 'queued' \
            AND created_at > $1 - INTERVAL '1 hour'))::float8 AS attempted_count_1h, \
        (SELECT COUNT(*) FROM email_logs WHERE status = 'queued')::float8 AS queue_size \
    FROM email_logs \
    WHERE created_at > $1 - INTERVAL '24 hours' AND created_at <= $1";

const AUTH: &str = "\
    SELECT \
        (COUNT(*) FILTER (WHERE action IN ('login', 'login_failed')))::float8 AS login_count_1h, \
        (COUNT(*) FILTER (WHERE action = 'login_failed'))::float8 AS login_failure_1h, \
        (SELECT COUNT(*) FROM security_events \
          WHERE event_type = 'suspicious_activity' \
            AND created_at > $1 - INTERVAL '1 hour' AND created_at <= $1)::float8 AS suspicious_events_1h \
    FROM audit_logs \
    WHERE created_at > $1 - INTERVAL '1 hour' AND created_at <= $1";

const USERS: &str = "\
    SELECT \
        COUNT(*)::float8 AS total_users, \
        (COUNT(*) FILTER (WHERE last_seen_at > $1 - INTERVAL '24 hours'))::float8 AS active_users_24h, \
        (COUNT(*) FILTER (WHERE created_at > $1 - INTERVAL '24 hours'))::float8 AS new_users_24h \
    FROM app_users \
    WHERE created_at <= $1";

const SECURITY: &str = "\
    SELECT \
        COUNT(*)::float8 AS security_events_24h, \
        (COUNT(*) FILTER (WHERE severity = 'critical'))::float8 AS critical_events_24h, \
        (COUNT(*) FILTER (WHERE is_blocked \
            AND created_at > $1 - INTERVAL '1 hour'))::float8 AS blocked_requests_1h \
    FROM security_events \
    WHERE created_at > $1 - INTERVAL '24 hours' AND created_at <= $1";

const STORAGE: &str = "\
    SELECT \
        COUNT(*)::float8 AS document_count, \
        (COALESCE(SUM(size_bytes), 0) / 1048576.0)::float8 AS storage_used_mb, \
        (COUNT(*) FILTER (WHERE created_at > $1 - INTERVAL '24 hours'))::float8 AS uploads_24h \
    FROM documents \
    WHERE created_at <= $1";

const LOGS: &str = "\
    SELECT \
        (COUNT(*) FILTER (WHERE created_at > $1 - INTERVAL '1 hour'))::float8 AS log_volume_1h, \
        COUNT(*)::float8 AS log_volume_24h, \
        (COUNT(*) FILTER (WHERE severity IN ('error', 'critical') \
            AND created_at > $1 - INTERVAL '1 hour'))::float8 AS error_logs_1h \
    FROM audit_logs \
    WHERE created_at > $1 - INTERVAL '24 hours' AND created_at <= $1";

const NOTIFICATIONS: &str = "\
    SELECT \
        (COUNT(*) FILTER (WHERE created_at > $1 - INTERVAL '1 hour'))::float8 AS notifications_sent_1h, \
        (COUNT(*) FILTER (WHERE created_at > $1 - INTERVAL '24 hours'))::float8 AS notifications_24h, \
        (COUNT(*) FILTER (WHERE is_read = false))::float8 AS unread_count \
    FROM notifications \
    WHERE created_at <= $1";

const INTEGRATIONS: &str = "\
    SELECT \
        COUNT(*)::float8 AS integration_calls_1h, \
        (COUNT(*) FILTER (WHERE status = 'failed'))::float8 AS integration_failures_1h, \
        (COUNT(*) FILTER (WHERE status = 'success'))::float8 AS integration_successes_1h, \
        AVG(latency_ms)::float8 AS latency_avg \
    FROM integration_logs \
    WHERE created_at > $1 - INTERVAL '1 hour' AND created_at <= $1";

const CRON: &str = "\
    SELECT \
        COUNT(*)::float8 AS job_runs_24h, \
        (COUNT(*) FILTER (WHERE status = 'failed'))::float8 AS job_failures_24h, \
        (COUNT(*) FILTER (WHERE status = 'success'))::float8 AS job_successes_24h, \
        (COUNT(*) FILTER (WHERE status <> 'running'))::float8 AS jobs_finished_24h, \
        (AVG(duration_ms) FILTER (WHERE status <> 'running'))::float8 AS duration_avg \
    FROM cron_runs \
    WHERE started_at > $1 - INTERVAL '24 hours' AND started_at <= $1";

/// Provides the per-module raw counter queries.
pub struct OperationalRepo;

impl OperationalRepo {
    /// The counter query for `module`, and whether it takes `now` as `$1`.
    fn query_for(module: ModuleId) -> (&'static str, bool) {
        match module {
            ModuleId::Database => (DATABASE, false),
            ModuleId::Backend => (BACKEND, true),
            ModuleId::Email => (EMAIL, true),
            ModuleId::Auth => (AUTH, true),
            ModuleId::Users => (USERS, true),
            ModuleId::Security => (SECURITY, true),
            ModuleId::Storage => (STORAGE, true),
            ModuleId::Logs => (LOGS, true),
            ModuleId::Notifications => (NOTIFICATIONS, true),
            ModuleId::Integrations => (INTEGRATIONS, true),
            ModuleId::Cron => (CRON, true),
        }
    }

    /// Gather the raw counters for `module` as of `now`.
    pub async fn counters(
        pool: &PgPool,
        module: ModuleId,
        now: Timestamp,
    ) -> Result<RawCounters, sqlx::Error> {
        let (sql, binds_now) = Self::query_for(module);
        let mut query = sqlx::query(sql);
        if binds_now {
            query = query.bind(now);
        }
        let row = query.fetch_one(pool).await?;

        let mut counters = RawCounters::new();
        for (idx, column) in row.columns().iter().enumerate() {
            if let Some(value) = row.try_get::<Option<f64>, _>(idx)? {
                counters.set(column.name(), value);
            }
        }
        Ok(counters)
    }
}
