/// Default number of rows returned by the metric history endpoint.
const DEFAULT_METRIC_HISTORY_LIMIT: i64 = 5000;

/// Default upper bound on the `hours` window of the metric history endpoint.
const DEFAULT_METRIC_HISTORY_MAX_HOURS: i64 = 24 * 30;

/// Tunables for the monitoring units of work.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Maximum rows returned for one module's metric history.
    pub metric_history_limit: i64,
    /// Largest history window a client may request, in hours.
    pub metric_history_max_hours: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            metric_history_limit: DEFAULT_METRIC_HISTORY_LIMIT,
            metric_history_max_hours: DEFAULT_METRIC_HISTORY_MAX_HOURS,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `METRIC_HISTORY_LIMIT`     | `5000`  |
    /// | `METRIC_HISTORY_MAX_HOURS` | `720`   |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            metric_history_limit: std::env::var("METRIC_HISTORY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.metric_history_limit),
            metric_history_max_hours: std::env::var("METRIC_HISTORY_MAX_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.metric_history_max_hours),
        }
    }
}
