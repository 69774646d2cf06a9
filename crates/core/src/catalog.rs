//! The metric catalog: which metrics each module produces, how each value is
//! computed from raw counters, and the thresholds that classify it.
//!
//! The catalog is a static table ([`CATALOG`]) rather than per-module
//! branching. The collector gathers a [`RawCounters`] map per module (see
//! [`counters`] for the names) and [`evaluate_module`] turns it into
//! classified metrics.

use std::collections::HashMap;

use serde_json::json;

use crate::modules::ModuleId;
use crate::status::{determine_status, HealthStatus};

// ---------------------------------------------------------------------------
// Raw counter names
// ---------------------------------------------------------------------------

/// Raw counter names produced by the operational queries.
///
/// Where a counter is published unchanged as a metric, the counter name and
/// the metric name are the same string.
pub mod counters {
    // database
    pub const SIZE_MB: &str = "size_mb";
    pub const CONNECTIONS_ACTIVE: &str = "connections_active";

    // backend
    pub const REQUEST_COUNT_1H: &str = "request_count_1h";
    pub const ERROR_COUNT_1H: &str = "error_count_1h";
    pub const LATENCY_AVG: &str = "latency_avg";
    pub const LATENCY_P95: &str = "latency_p95";

    // email
    pub const SENT_COUNT_1H: &str = "sent_count_1h";
    pub const SENT_COUNT_24H: &str = "sent_count_24h";
    pub const FAILED_COUNT_1H: &str = "failed_count_1h";
    pub const ATTEMPTED_COUNT_1H: &str = "attempted_count_1h";
    pub const QUEUE_SIZE: &str = "queue_size";

    // auth
    pub const LOGIN_COUNT_1H: &str = "login_count_1h";
    pub const LOGIN_FAILURE_1H: &str = "login_failure_1h";
    pub const SUSPICIOUS_EVENTS_1H: &str = "suspicious_events_1h";

    // users
    pub const TOTAL_USERS: &str = "total_users";
    pub const ACTIVE_USERS_24H: &str = "active_users_24h";
    pub const NEW_USERS_24H: &str = "new_users_24h";

    // security
    pub const SECURITY_EVENTS_24H: &str = "security_events_24h";
    pub const CRITICAL_EVENTS_24H: &str = "critical_events_24h";
    pub const BLOCKED_REQUESTS_1H: &str = "blocked_requests_1h";

    // storage
    pub const DOCUMENT_COUNT: &str = "document_count";
    pub const STORAGE_USED_MB: &str = "storage_used_mb";
    pub const UPLOADS_24H: &str = "uploads_24h";

    // logs
    pub const LOG_VOLUME_1H: &str = "log_volume_1h";
    pub const LOG_VOLUME_24H: &str = "log_volume_24h";
    pub const ERROR_LOGS_1H: &str = "error_logs_1h";

    // notifications
    pub const NOTIFICATIONS_SENT_1H: &str = "notifications_sent_1h";
    pub const NOTIFICATIONS_24H: &str = "notifications_24h";
    pub const UNREAD_COUNT: &str = "unread_count";

    // integrations
    pub const INTEGRATION_CALLS_1H: &str = "integration_calls_1h";
    pub const INTEGRATION_FAILURES_1H: &str = "integration_failures_1h";
    pub const INTEGRATION_SUCCESSES_1H: &str = "integration_successes_1h";
    pub const INTEGRATION_LATENCY_AVG: &str = "latency_avg";

    // cron
    pub const JOB_RUNS_24H: &str = "job_runs_24h";
    pub const JOB_FAILURES_24H: &str = "job_failures_24h";
    pub const JOB_SUCCESSES_24H: &str = "job_successes_24h";
    pub const JOBS_FINISHED_24H: &str = "jobs_finished_24h";
    pub const DURATION_AVG: &str = "duration_avg";
}

use counters as c;

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// Time window a metric value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    OneHour,
    OneDay,
    /// A point-in-time gauge (sizes, queue depth, totals).
    Current,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::OneHour => "1h",
            Window::OneDay => "24h",
            Window::Current => "current",
        }
    }
}

/// How a metric value is derived from a module's raw counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Computation {
    /// The raw counter, unchanged.
    Counter(&'static str),
    /// `part / whole * 100`. A zero `whole` yields `neutral`.
    Percent {
        part: &'static str,
        whole: &'static str,
        neutral: f64,
    },
    /// `counter / capacity_total * 100`, skipped when the module has no capacity.
    PercentOfCapacity(&'static str),
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub module: ModuleId,
    pub metric_name: &'static str,
    pub unit: &'static str,
    pub window: Window,
    pub computation: Computation,
    pub warning: f64,
    pub critical: f64,
    pub higher_is_bad: bool,
}

/// Threshold used for informational metrics that never degrade.
const NEVER: f64 = f64::INFINITY;

#[allow(clippy::too_many_arguments)]
const fn spec(
    module: ModuleId,
    metric_name: &'static str,
    unit: &'static str,
    window: Window,
    computation: Computation,
    warning: f64,
    critical: f64,
    higher_is_bad: bool,
) -> MetricSpec {
    MetricSpec {
        module,
        metric_name,
        unit,
        window,
        computation,
        warning,
        critical,
        higher_is_bad,
    }
}

use Computation::{Counter, Percent, PercentOfCapacity};
use ModuleId as M;
use Window::{Current, OneDay, OneHour};

/// The full metric catalog.
#[rustfmt::skip]
pub static CATALOG: &[MetricSpec] = &[
    // database
    spec(M::Database, "size_mb", "MB", Current, Counter(c::SIZE_MB), 4096.0, 8192.0, true),
    spec(M::Database, "connections_active", "count", Current, Counter(c::CONNECTIONS_ACTIVE), 80.0, 95.0, true),
    spec(M::Database, "usage_percent", "%", Current, PercentOfCapacity(c::SIZE_MB), 75.0, 90.0, true),
    // backend
    spec(M::Backend, "request_count_1h", "count", OneHour, Counter(c::REQUEST_COUNT_1H), 50_000.0, 100_000.0, true),
    spec(M::Backend, "error_count_1h", "count", OneHour, Counter(c::ERROR_COUNT_1H), 50.0, 200.0, true),
    spec(M::Backend, "error_rate", "%", OneHour, Percent { part: c::ERROR_COUNT_1H, whole: c::REQUEST_COUNT_1H, neutral: 0.0 }, 2.0, 5.0, true),
    spec(M::Backend, "latency_avg", "ms", OneHour, Counter(c::LATENCY_AVG), 500.0, 1500.0, true),
    spec(M::Backend, "latency_p95", "ms", OneHour, Counter(c::LATENCY_P95), 1000.0, 3000.0, true),
    // email
    spec(M::Email, "sent_count_1h", "count", OneHour, Counter(c::SENT_COUNT_1H), 1000.0, 5000.0, true),
    spec(M::Email, "sent_count_24h", "count", OneDay, Counter(c::SENT_COUNT_24H), 20_000.0, 50_000.0, true),
    spec(M::Email, "failed_count_1h", "count", OneHour, Counter(c::FAILED_COUNT_1H), 5.0, 10.0, true),
    spec(M::Email, "delivery_rate", "%", OneHour, Percent { part: c::SENT_COUNT_1H, whole: c::ATTEMPTED_COUNT_1H, neutral: 100.0 }, 95.0, 90.0, false),
    spec(M::Email, "queue_size", "count", Current, Counter(c::QUEUE_SIZE), 100.0, 500.0, true),
    // auth
    spec(M::Auth, "login_count_1h", "count", OneHour, Counter(c::LOGIN_COUNT_1H), 5000.0, 20_000.0, true),
    spec(M::Auth, "login_failure_1h", "count", OneHour, Counter(c::LOGIN_FAILURE_1H), 20.0, 50.0, true),
    spec(M::Auth, "login_failure_rate", "%", OneHour, Percent { part: c::LOGIN_FAILURE_1H, whole: c::LOGIN_COUNT_1H, neutral: 0.0 }, 10.0, 25.0, true),
    spec(M::Auth, "suspicious_events_1h", "count", OneHour, Counter(c::SUSPICIOUS_EVENTS_1H), 1.0, 5.0, true),
    // users
    spec(M::Users, "total_users", "users", Current, Counter(c::TOTAL_USERS), NEVER, NEVER, true),
    spec(M::Users, "active_users_24h", "users", OneDay, Counter(c::ACTIVE_USERS_24H), NEVER, NEVER, true),
    spec(M::Users, "new_users_24h", "users", OneDay, Counter(c::NEW_USERS_24H), 500.0, 2000.0, true),
    spec(M::Users, "usage_percent", "%", Current, PercentOfCapacity(c::TOTAL_USERS), 80.0, 95.0, true),
    // security
    spec(M::Security, "security_events_24h", "count", OneDay, Counter(c::SECURITY_EVENTS_24H), 100.0, 500.0, true),
    spec(M::Security, "critical_events_24h", "count", OneDay, Counter(c::CRITICAL_EVENTS_24H), 1.0, 3.0, true),
    spec(M::Security, "blocked_requests_1h", "count", OneHour, Counter(c::BLOCKED_REQUESTS_1H), 50.0, 200.0, true),
    // storage
    spec(M::Storage, "document_count", "files", Current, Counter(c::DOCUMENT_COUNT), NEVER, NEVER, true),
    spec(M::Storage, "storage_used_mb", "MB", Current, Counter(c::STORAGE_USED_MB), NEVER, NEVER, true),
    spec(M::Storage, "uploads_24h", "files", OneDay, Counter(c::UPLOADS_24H), 5000.0, 20_000.0, true),
    spec(M::Storage, "usage_percent", "%", Current, PercentOfCapacity(c::STORAGE_USED_MB), 80.0, 95.0, true),
    // logs
    spec(M::Logs, "log_volume_1h", "entries", OneHour, Counter(c::LOG_VOLUME_1H), 10_000.0, 50_000.0, true),
    spec(M::Logs, "log_volume_24h", "entries", OneDay, Counter(c::LOG_VOLUME_24H), 200_000.0, 1_000_000.0, true),
    spec(M::Logs, "error_logs_1h", "entries", OneHour, Counter(c::ERROR_LOGS_1H), 10.0, 50.0, true),
    // notifications
    spec(M::Notifications, "notifications_sent_1h", "count", OneHour, Counter(c::NOTIFICATIONS_SENT_1H), 5000.0, 20_000.0, true),
    spec(M::Notifications, "notifications_24h", "count", OneDay, Counter(c::NOTIFICATIONS_24H), 50_000.0, 200_000.0, true),
    spec(M::Notifications, "unread_count", "count", Current, Counter(c::UNREAD_COUNT), 1000.0, 5000.0, true),
    // integrations
    spec(M::Integrations, "integration_calls_1h", "count", OneHour, Counter(c::INTEGRATION_CALLS_1H), 10_000.0, 50_000.0, true),
    spec(M::Integrations, "integration_failures_1h", "count", OneHour, Counter(c::INTEGRATION_FAILURES_1H), 5.0, 20.0, true),
    spec(M::Integrations, "success_rate", "%", OneHour, Percent { part: c::INTEGRATION_SUCCESSES_1H, whole: c::INTEGRATION_CALLS_1H, neutral: 100.0 }, 95.0, 90.0, false),
    spec(M::Integrations, "latency_avg", "ms", OneHour, Counter(c::INTEGRATION_LATENCY_AVG), 1000.0, 5000.0, true),
    // cron
    spec(M::Cron, "job_runs_24h", "runs", OneDay, Counter(c::JOB_RUNS_24H), NEVER, NEVER, true),
    spec(M::Cron, "job_failures_24h", "runs", OneDay, Counter(c::JOB_FAILURES_24H), 1.0, 3.0, true),
    spec(M::Cron, "success_rate", "%", OneDay, Percent { part: c::JOB_SUCCESSES_24H, whole: c::JOBS_FINISHED_24H, neutral: 100.0 }, 95.0, 80.0, false),
    spec(M::Cron, "duration_avg", "ms", OneDay, Counter(c::DURATION_AVG), 60_000.0, 300_000.0, true),
];

/// Catalog rows for a single module, in table order.
pub fn specs_for(module: ModuleId) -> impl Iterator<Item = &'static MetricSpec> {
    CATALOG.iter().filter(move |s| s.module == module)
}

/// Look up the catalog row for `(module, metric_name)`.
pub fn find(module: ModuleId, metric_name: &str) -> Option<&'static MetricSpec> {
    specs_for(module).find(|s| s.metric_name == metric_name)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Raw counter values gathered for one module in one collection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCounters {
    values: HashMap<String, f64>,
}

impl RawCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A classified metric value ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedMetric {
    pub module: ModuleId,
    pub metric_name: &'static str,
    pub unit: &'static str,
    pub value: f64,
    pub status: HealthStatus,
    pub spec: &'static MetricSpec,
}

impl ComputedMetric {
    /// Metadata persisted alongside the record.
    ///
    /// Infinite thresholds serialize as `null`.
    pub fn metadata(&self) -> serde_json::Value {
        json!({
            "window": self.spec.window.as_str(),
            "higher_is_bad": self.spec.higher_is_bad,
            "warning_threshold": finite_or_none(self.spec.warning),
            "critical_threshold": finite_or_none(self.spec.critical),
        })
    }
}

fn finite_or_none(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Compute the value of one catalog row, or `None` when its inputs are absent.
pub fn compute(spec: &MetricSpec, counters: &RawCounters, capacity_total: Option<f64>) -> Option<f64> {
    match spec.computation {
        Computation::Counter(name) => counters.get(name),
        Computation::Percent {
            part,
            whole,
            neutral,
        } => {
            let part = counters.get(part)?;
            let whole = counters.get(whole)?;
            if whole <= 0.0 {
                Some(neutral)
            } else {
                Some(round2(part / whole * 100.0))
            }
        }
        Computation::PercentOfCapacity(name) => {
            let used = counters.get(name)?;
            match capacity_total {
                Some(total) if total > 0.0 => Some(round2(used / total * 100.0)),
                _ => None,
            }
        }
    }
}

/// Run every catalog row for `module` against its raw counters.
///
/// Rows whose inputs are missing are skipped rather than zero-filled.
pub fn evaluate_module(
    module: ModuleId,
    counters: &RawCounters,
    capacity_total: Option<f64>,
) -> Vec<ComputedMetric> {
    specs_for(module)
        .filter_map(|spec| {
            let value = compute(spec, counters, capacity_total)?;
            Some(ComputedMetric {
                module,
                metric_name: spec.metric_name,
                unit: spec.unit,
                value,
                status: determine_status(value, spec.warning, spec.critical, spec.higher_is_bad),
                spec,
            })
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
