use std::time::Duration;

/// Default tick period in seconds.
const DEFAULT_TICK_SECS: u64 = 30;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How often the scheduler checks for due modules and runs an alert pass.
    pub tick: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(DEFAULT_TICK_SECS),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Default |
    /// |--------------------|---------|
    /// | `WORKER_TICK_SECS` | `30`    |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparsable or zero values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_secs = lookup("WORKER_TICK_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_SECS);
        Self {
            tick: Duration::from_secs(tick_secs),
        }
    }
}
