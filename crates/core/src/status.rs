//! Health status classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Health of a single metric or of a whole module.
///
/// Variants are declared in severity order so `Ord` ranks
/// `Healthy < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(HealthStatus::Healthy),
            "warning" => Ok(HealthStatus::Warning),
            "critical" => Ok(HealthStatus::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown health status: '{other}'"
            ))),
        }
    }
}

/// Classify a metric value against its warning and critical thresholds.
///
/// When `higher_is_bad` the value degrades as it rises (error counts,
/// latency): `value >= critical` is critical, `value >= warning` is warning.
/// Otherwise the value degrades as it falls (delivery or success rates):
/// `value <= critical` is critical, `value <= warning` is warning.
pub fn determine_status(value: f64, warning: f64, critical: f64, higher_is_bad: bool) -> HealthStatus {
    if higher_is_bad {
        if value >= critical {
            HealthStatus::Critical
        } else if value >= warning {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    } else if value <= critical {
        HealthStatus::Critical
    } else if value <= warning {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}

/// The worst status in `statuses`, or `Healthy` when empty.
pub fn worst_of(statuses: impl IntoIterator<Item = HealthStatus>) -> HealthStatus {
    statuses.into_iter().max().unwrap_or(HealthStatus::Healthy)
}
