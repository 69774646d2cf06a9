//! System-health matrix aggregation.
//!
//! Projects a snapshot of recent metric records, the module configuration and
//! the open alerts into a [`MatrixResponse`]. The projection is pure: the same
//! inputs and the same `now` always produce the same output.
//!
//! Which metric feeds each matrix column is declared per module in
//! [`FALLBACK_CHAINS`]; the first metric in a chain that has a value wins.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::modules::ModuleId;
use crate::status::{worst_of, HealthStatus};
use crate::types::Timestamp;

/// How far back the matrix looks for metric records.
pub const LOOKBACK_HOURS: i64 = 24;

/// Substrings that mark a metric as failure-related.
pub const FAILURE_KEYWORDS: [&str; 5] = ["error", "failure", "failed", "error_count", "failures"];

/// Usage above this percentage recommends a plan upgrade.
pub const UPGRADE_USAGE_PERCENT: f64 = 80.0;

/// Trend ratio bounds: above `TREND_UP_RATIO` is up, below `TREND_DOWN_RATIO` is down.
pub const TREND_UP_RATIO: f64 = 1.1;
pub const TREND_DOWN_RATIO: f64 = 0.9;

// ---------------------------------------------------------------------------
// Fallback chains
// ---------------------------------------------------------------------------

/// Where a module's error rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRateSource {
    /// The module reports no error rate.
    None,
    /// Read a raw error-rate metric.
    Direct(&'static [&'static str]),
    /// `100 - rate` of a delivery or success rate metric.
    Complement(&'static [&'static str]),
}

/// Ordered candidate metrics for each matrix column of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackChains {
    pub module: ModuleId,
    pub used: &'static [&'static str],
    pub error_rate: ErrorRateSource,
    pub latency_ms: &'static [&'static str],
    pub usage_percent: &'static [&'static str],
}

use ErrorRateSource::{Complement, Direct, None as NoRate};

#[rustfmt::skip]
pub static FALLBACK_CHAINS: &[FallbackChains] = &[
    FallbackChains { module: ModuleId::Database, used: &["size_mb"], error_rate: NoRate, latency_ms: &[], usage_percent: &["usage_percent"] },
    FallbackChains { module: ModuleId::Backend, used: &["request_count_1h", "invocations_1h"], error_rate: Direct(&["error_rate"]), latency_ms: &["latency_p95", "latency_avg"], usage_percent: &[] },
    FallbackChains { module: ModuleId::Email, used: &["sent_count_24h", "sent_count_1h"], error_rate: Complement(&["delivery_rate"]), latency_ms: &[], usage_percent: &[] },
    FallbackChains { module: ModuleId::Auth, used: &["login_count_1h"], error_rate: Direct(&["login_failure_rate"]), latency_ms: &[], usage_percent: &[] },
    FallbackChains { module: ModuleId::Users, used: &["total_users", "active_users_24h"], error_rate: NoRate, latency_ms: &[], usage_percent: &["usage_percent"] },
    FallbackChains { module: ModuleId::Security, used: &["security_events_24h"], error_rate: NoRate, latency_ms: &[], usage_percent: &[] },
    FallbackChains { module: ModuleId::Storage, used: &["storage_used_mb", "document_count"], error_rate: NoRate, latency_ms: &[], usage_percent: &["usage_percent"] },
    FallbackChains { module: ModuleId::Logs, used: &["log_volume_24h", "log_volume_1h"], error_rate: NoRate, latency_ms: &[], usage_percent: &[] },
    FallbackChains { module: ModuleId::Notifications, used: &["notifications_24h", "notifications_sent_1h"], error_rate: NoRate, latency_ms: &[], usage_percent: &[] },
    FallbackChains { module: ModuleId::Integrations, used: &["integration_calls_1h"], error_rate: Complement(&["success_rate"]), latency_ms: &["latency_avg"], usage_percent: &[] },
    FallbackChains { module: ModuleId::Cron, used: &["job_runs_24h"], error_rate: Complement(&["success_rate"]), latency_ms: &["duration_avg"], usage_percent: &[] },
];

/// Fallback chains for `module`.
pub fn chains_for(module: ModuleId) -> Option<&'static FallbackChains> {
    FALLBACK_CHAINS.iter().find(|c| c.module == module)
}

/// Whether `metric_name` counts toward failure totals and the trend.
pub fn is_failure_metric(metric_name: &str) -> bool {
    FAILURE_KEYWORDS.iter().any(|k| metric_name.contains(k))
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Module configuration as seen by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSnapshot {
    pub module: ModuleId,
    pub display_name: String,
    pub icon: Option<String>,
    pub is_enabled: bool,
    pub capacity_total: Option<f64>,
    pub capacity_unit: Option<String>,
    pub sort_order: i32,
}

/// A stored metric record.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub module: ModuleId,
    pub metric_name: String,
    pub value: f64,
    pub status: HealthStatus,
    pub collected_at: Timestamp,
}

/// A stored alert history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSnapshot {
    pub module: ModuleId,
    pub triggered_at: Timestamp,
    pub is_resolved: bool,
    pub is_acknowledged: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Direction of a module's failure metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// One row of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleHealth {
    pub module: ModuleId,
    pub display_name: String,
    pub icon: Option<String>,
    pub is_enabled: bool,
    pub sort_order: i32,
    pub status: HealthStatus,
    pub used: Option<f64>,
    pub capacity_total: Option<f64>,
    pub capacity_unit: Option<String>,
    pub usage_percent: Option<f64>,
    pub error_rate: Option<f64>,
    pub latency_ms: Option<f64>,
    pub failures_1h: f64,
    pub failures_24h: f64,
    pub trend: Trend,
    pub upgrade_recommended: bool,
    pub last_incident: Option<Timestamp>,
    pub last_collected_at: Option<Timestamp>,
}

/// Platform-wide module status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatrixSummary {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    pub total: usize,
}

/// Open alert counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub active: usize,
    pub unacknowledged: usize,
}

/// The full matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub modules: Vec<ModuleHealth>,
    pub summary: MatrixSummary,
    pub alerts: AlertCounts,
    pub generated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the matrix from a snapshot.
///
/// Samples older than [`LOOKBACK_HOURS`] before `now` are ignored. Modules are
/// ordered by `sort_order`, then id.
pub fn aggregate(
    modules: &[ModuleSnapshot],
    samples: &[MetricSample],
    alerts: &[AlertSnapshot],
    now: Timestamp,
) -> MatrixResponse {
    let lookback_start = now - Duration::hours(LOOKBACK_HOURS);

    let mut by_module: HashMap<ModuleId, Vec<&MetricSample>> = HashMap::new();
    for sample in samples.iter().filter(|s| s.collected_at >= lookback_start) {
        by_module.entry(sample.module).or_default().push(sample);
    }

    let mut rows: Vec<ModuleHealth> = modules
        .iter()
        .map(|config| {
            let module_samples = by_module.get(&config.module).map(Vec::as_slice).unwrap_or(&[]);
            module_health(config, module_samples, alerts, now)
        })
        .collect();
    rows.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.module.cmp(&b.module)));

    let mut summary = MatrixSummary {
        total: rows.len(),
        ..MatrixSummary::default()
    };
    for row in &rows {
        match row.status {
            HealthStatus::Healthy => summary.healthy += 1,
            HealthStatus::Warning => summary.warning += 1,
            HealthStatus::Critical => summary.critical += 1,
        }
    }

    let open: Vec<_> = alerts.iter().filter(|a| !a.is_resolved).collect();
    let alert_counts = AlertCounts {
        active: open.len(),
        unacknowledged: open.iter().filter(|a| !a.is_acknowledged).count(),
    };

    MatrixResponse {
        modules: rows,
        summary,
        alerts: alert_counts,
        generated_at: now,
    }
}

fn module_health(
    config: &ModuleSnapshot,
    samples: &[&MetricSample],
    alerts: &[AlertSnapshot],
    now: Timestamp,
) -> ModuleHealth {
    let latest = latest_per_metric(samples);
    let chains = chains_for(config.module);

    let status = if config.is_enabled {
        worst_of(latest.values().map(|s| s.status))
    } else {
        HealthStatus::Healthy
    };

    let used = chains.and_then(|c| pick(&latest, c.used));
    let error_rate = chains.and_then(|c| match c.error_rate {
        ErrorRateSource::None => None,
        ErrorRateSource::Direct(names) => pick(&latest, names),
        ErrorRateSource::Complement(names) => pick(&latest, names).map(|rate| round2(100.0 - rate)),
    });
    let latency_ms = chains.and_then(|c| pick(&latest, c.latency_ms));
    let usage_percent = chains
        .and_then(|c| pick(&latest, c.usage_percent))
        .or_else(|| match (used, config.capacity_total) {
            (Some(used), Some(total)) if total > 0.0 => Some(round2(used / total * 100.0)),
            _ => None,
        });

    let one_hour_ago = now - Duration::hours(1);
    let failures_1h = failure_sum(samples, one_hour_ago);
    let failures_24h = failure_sum(samples, now - Duration::hours(LOOKBACK_HOURS));

    let last_incident = alerts
        .iter()
        .filter(|a| a.module == config.module && !a.is_resolved)
        .map(|a| a.triggered_at)
        .max();

    let upgrade_recommended =
        usage_percent.is_some_and(|u| u > UPGRADE_USAGE_PERCENT) || status == HealthStatus::Critical;

    ModuleHealth {
        module: config.module,
        display_name: config.display_name.clone(),
        icon: config.icon.clone(),
        is_enabled: config.is_enabled,
        sort_order: config.sort_order,
        status,
        used,
        capacity_total: config.capacity_total,
        capacity_unit: config.capacity_unit.clone(),
        usage_percent,
        error_rate,
        latency_ms,
        failures_1h,
        failures_24h,
        trend: trend(samples),
        upgrade_recommended,
        last_incident,
        last_collected_at: samples.iter().map(|s| s.collected_at).max(),
    }
}

/// Latest sample per metric name. Ties keep the first sample seen.
fn latest_per_metric<'a>(samples: &[&'a MetricSample]) -> HashMap<&'a str, &'a MetricSample> {
    let mut latest: HashMap<&str, &MetricSample> = HashMap::new();
    for sample in samples {
        latest
            .entry(sample.metric_name.as_str())
            .and_modify(|current| {
                if sample.collected_at > current.collected_at {
                    *current = sample;
                }
            })
            .or_insert(sample);
    }
    latest
}

fn pick(latest: &HashMap<&str, &MetricSample>, chain: &[&str]) -> Option<f64> {
    chain.iter().find_map(|name| latest.get(name).map(|s| s.value))
}

fn failure_sum(samples: &[&MetricSample], since: Timestamp) -> f64 {
    samples
        .iter()
        .filter(|s| s.collected_at >= since && is_failure_metric(&s.metric_name))
        .map(|s| s.value)
        .sum()
}

/// Compare the newest failure sample with the mean of older samples of the
/// same metric.
///
/// The series is the metric of the most recent failure-related sample (ties
/// broken by metric name). Fewer than two samples is `Stable`; a zero
/// historical mean is `Up` when the newest value is positive.
fn trend(samples: &[&MetricSample]) -> Trend {
    let newest = samples
        .iter()
        .filter(|s| is_failure_metric(&s.metric_name))
        .max_by(|a, b| {
            a.collected_at
                .cmp(&b.collected_at)
                .then_with(|| b.metric_name.cmp(&a.metric_name))
        });
    let Some(newest) = newest else {
        return Trend::Stable;
    };

    let older: Vec<f64> = samples
        .iter()
        .filter(|s| s.metric_name == newest.metric_name && s.collected_at < newest.collected_at)
        .map(|s| s.value)
        .collect();
    if older.is_empty() {
        return Trend::Stable;
    }

    let mean = older.iter().sum::<f64>() / older.len() as f64;
    if mean == 0.0 {
        return if newest.value > 0.0 { Trend::Up } else { Trend::Stable };
    }

    let ratio = newest.value / mean;
    if ratio > TREND_UP_RATIO {
        Trend::Up
    } else if ratio < TREND_DOWN_RATIO {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn config(module: ModuleId, enabled: bool, sort_order: i32) -> ModuleSnapshot {
        ModuleSnapshot {
            module,
            display_name: module.as_str().to_string(),
            icon: None,
            is_enabled: enabled,
            capacity_total: None,
            capacity_unit: None,
            sort_order,
        }
    }

    fn sample(
        module: ModuleId,
        name: &str,
        value: f64,
        status: HealthStatus,
        minutes_ago: i64,
    ) -> MetricSample {
        MetricSample {
            module,
            metric_name: name.to_string(),
            value,
            status,
            collected_at: now() - Duration::minutes(minutes_ago),
        }
    }

    fn row(matrix: &MatrixResponse, module: ModuleId) -> &ModuleHealth {
        matrix.modules.iter().find(|m| m.module == module).unwrap()
    }

    #[test]
    fn status_is_worst_of_latest_values() {
        let samples = vec![
            // An old critical sample superseded by a healthy one.
            sample(ModuleId::Backend, "error_rate", 9.0, HealthStatus::Critical, 30),
            sample(ModuleId::Backend, "error_rate", 0.5, HealthStatus::Healthy, 5),
            sample(ModuleId::Backend, "latency_p95", 1200.0, HealthStatus::Warning, 5),
        ];
        let matrix = aggregate(&[config(ModuleId::Backend, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Backend).status, HealthStatus::Warning);
    }

    #[test]
    fn disabled_module_is_always_healthy() {
        let samples = vec![sample(ModuleId::Email, "failed_count_1h", 500.0, HealthStatus::Critical, 1)];
        let matrix = aggregate(&[config(ModuleId::Email, false, 1)], &samples, &[], now());
        let email = row(&matrix, ModuleId::Email);
        assert_eq!(email.status, HealthStatus::Healthy);
        assert_eq!(matrix.summary.healthy, 1);
        assert_eq!(matrix.summary.critical, 0);
    }

    #[test]
    fn used_follows_fallback_order() {
        let samples = vec![sample(ModuleId::Backend, "invocations_1h", 42.0, HealthStatus::Healthy, 1)];
        let matrix = aggregate(&[config(ModuleId::Backend, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Backend).used, Some(42.0));

        let samples = vec![
            sample(ModuleId::Backend, "invocations_1h", 42.0, HealthStatus::Healthy, 1),
            sample(ModuleId::Backend, "request_count_1h", 900.0, HealthStatus::Healthy, 1),
        ];
        let matrix = aggregate(&[config(ModuleId::Backend, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Backend).used, Some(900.0));
    }

    #[test]
    fn error_rate_complements_delivery_rate() {
        let samples = vec![sample(ModuleId::Email, "delivery_rate", 97.5, HealthStatus::Healthy, 1)];
        let matrix = aggregate(&[config(ModuleId::Email, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Email).error_rate, Some(2.5));
    }

    #[test]
    fn usage_derives_from_capacity_when_chain_is_empty() {
        let mut cfg = config(ModuleId::Logs, true, 1);
        cfg.capacity_total = Some(1000.0);
        let samples = vec![sample(ModuleId::Logs, "log_volume_24h", 850.0, HealthStatus::Healthy, 1)];
        let matrix = aggregate(&[cfg], &samples, &[], now());
        let logs = row(&matrix, ModuleId::Logs);
        assert_eq!(logs.usage_percent, Some(85.0));
        assert!(logs.upgrade_recommended);
    }

    #[test]
    fn critical_status_recommends_upgrade() {
        let samples = vec![sample(ModuleId::Cron, "job_failures_24h", 4.0, HealthStatus::Critical, 1)];
        let matrix = aggregate(&[config(ModuleId::Cron, true, 1)], &samples, &[], now());
        assert!(row(&matrix, ModuleId::Cron).upgrade_recommended);
    }

    #[test]
    fn failures_are_summed_by_keyword_and_age() {
        let samples = vec![
            sample(ModuleId::Email, "failed_count_1h", 3.0, HealthStatus::Healthy, 10),
            sample(ModuleId::Email, "failed_count_1h", 4.0, HealthStatus::Healthy, 120),
            sample(ModuleId::Email, "sent_count_1h", 1000.0, HealthStatus::Healthy, 10),
            // Outside the lookback entirely.
            sample(ModuleId::Email, "failed_count_1h", 99.0, HealthStatus::Healthy, 25 * 60),
        ];
        let matrix = aggregate(&[config(ModuleId::Email, true, 1)], &samples, &[], now());
        let email = row(&matrix, ModuleId::Email);
        assert_eq!(email.failures_1h, 3.0);
        assert_eq!(email.failures_24h, 7.0);
    }

    #[test]
    fn trend_compares_newest_with_older_mean() {
        let rising = vec![
            sample(ModuleId::Cron, "job_failures_24h", 1.0, HealthStatus::Warning, 60),
            sample(ModuleId::Cron, "job_failures_24h", 1.0, HealthStatus::Warning, 30),
            sample(ModuleId::Cron, "job_failures_24h", 2.0, HealthStatus::Warning, 1),
        ];
        let matrix = aggregate(&[config(ModuleId::Cron, true, 1)], &rising, &[], now());
        assert_eq!(row(&matrix, ModuleId::Cron).trend, Trend::Up);

        let falling = vec![
            sample(ModuleId::Cron, "job_failures_24h", 10.0, HealthStatus::Critical, 60),
            sample(ModuleId::Cron, "job_failures_24h", 5.0, HealthStatus::Critical, 1),
        ];
        let matrix = aggregate(&[config(ModuleId::Cron, true, 1)], &falling, &[], now());
        assert_eq!(row(&matrix, ModuleId::Cron).trend, Trend::Down);

        let flat = vec![
            sample(ModuleId::Cron, "job_failures_24h", 10.0, HealthStatus::Critical, 60),
            sample(ModuleId::Cron, "job_failures_24h", 10.5, HealthStatus::Critical, 1),
        ];
        let matrix = aggregate(&[config(ModuleId::Cron, true, 1)], &flat, &[], now());
        assert_eq!(row(&matrix, ModuleId::Cron).trend, Trend::Stable);
    }

    #[test]
    fn trend_follows_only_the_newest_failure_metric() {
        // A large older count from a different failure metric must not drag
        // the error-rate series down.
        let samples = vec![
            sample(ModuleId::Backend, "error_rate", 2.0, HealthStatus::Healthy, 60),
            sample(ModuleId::Backend, "error_count_1h", 500.0, HealthStatus::Warning, 30),
            sample(ModuleId::Backend, "error_rate", 2.0, HealthStatus::Healthy, 1),
        ];
        let matrix = aggregate(&[config(ModuleId::Backend, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Backend).trend, Trend::Stable);
    }

    #[test]
    fn trend_is_stable_without_history() {
        let samples = vec![sample(ModuleId::Auth, "login_failure_1h", 4.0, HealthStatus::Healthy, 1)];
        let matrix = aggregate(&[config(ModuleId::Auth, true, 1)], &samples, &[], now());
        assert_eq!(row(&matrix, ModuleId::Auth).trend, Trend::Stable);
    }

    #[test]
    fn last_incident_is_newest_unresolved_alert() {
        let alerts = vec![
            AlertSnapshot {
                module: ModuleId::Database,
                triggered_at: now() - Duration::minutes(90),
                is_resolved: false,
                is_acknowledged: true,
            },
            AlertSnapshot {
                module: ModuleId::Database,
                triggered_at: now() - Duration::minutes(5),
                is_resolved: true,
                is_acknowledged: true,
            },
            AlertSnapshot {
                module: ModuleId::Email,
                triggered_at: now() - Duration::minutes(2),
                is_resolved: false,
                is_acknowledged: false,
            },
        ];
        let modules = [config(ModuleId::Database, true, 1), config(ModuleId::Email, true, 2)];
        let matrix = aggregate(&modules, &[], &alerts, now());

        assert_eq!(
            row(&matrix, ModuleId::Database).last_incident,
            Some(now() - Duration::minutes(90))
        );
        assert_eq!(matrix.alerts, AlertCounts { active: 2, unacknowledged: 1 });
    }

    #[test]
    fn summary_counts_and_ordering() {
        let modules = [
            config(ModuleId::Cron, true, 3),
            config(ModuleId::Database, true, 1),
            config(ModuleId::Email, true, 2),
        ];
        let samples = vec![
            sample(ModuleId::Email, "queue_size", 200.0, HealthStatus::Warning, 1),
            sample(ModuleId::Cron, "job_failures_24h", 5.0, HealthStatus::Critical, 1),
        ];
        let matrix = aggregate(&modules, &samples, &[], now());

        let order: Vec<_> = matrix.modules.iter().map(|m| m.module).collect();
        assert_eq!(order, vec![ModuleId::Database, ModuleId::Email, ModuleId::Cron]);
        assert_eq!(
            matrix.summary,
            MatrixSummary { healthy: 1, warning: 1, critical: 1, total: 3 }
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let modules = [config(ModuleId::Backend, true, 1), config(ModuleId::Email, true, 2)];
        let samples = vec![
            sample(ModuleId::Backend, "error_rate", 3.0, HealthStatus::Warning, 1),
            sample(ModuleId::Backend, "error_count_1h", 30.0, HealthStatus::Healthy, 1),
            sample(ModuleId::Backend, "error_count_1h", 20.0, HealthStatus::Healthy, 40),
            sample(ModuleId::Email, "delivery_rate", 91.0, HealthStatus::Warning, 1),
        ];
        let first = aggregate(&modules, &samples, &[], now());
        let second = aggregate(&modules, &samples, &[], now());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let matrix = aggregate(&[config(ModuleId::Database, true, 1)], &[], &[], now());
        let json = serde_json::to_value(&matrix).unwrap();
        let module = &json["modules"][0];
        assert!(module.get("failures1h").is_some());
        assert!(module.get("upgradeRecommended").is_some());
        assert_eq!(module["trend"], "stable");
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn every_module_has_fallback_chains() {
        for module in ModuleId::ALL {
            assert!(chains_for(module).is_some(), "{module} has no chains");
        }
    }

    #[test]
    fn failure_keywords_match_substrings() {
        assert!(is_failure_metric("failed_count_1h"));
        assert!(is_failure_metric("login_failure_rate"));
        assert!(is_failure_metric("error_logs_1h"));
        assert!(!is_failure_metric("delivery_rate"));
    }
}
