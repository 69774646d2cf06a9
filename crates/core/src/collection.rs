//! One metric collection pass over a set of modules.
//!
//! The raw counter queries live behind [`CounterSource`] so the pass itself
//! (catalog evaluation and per-module failure isolation) stays testable
//! without a database.

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::{evaluate_module, ComputedMetric, RawCounters};
use crate::error::CoreError;
use crate::modules::ModuleId;
use crate::types::Timestamp;

/// Supplies raw counters for a module as of `now`.
#[async_trait]
pub trait CounterSource: Send + Sync {
    async fn counters(&self, module: ModuleId, now: Timestamp) -> Result<RawCounters, CoreError>;
}

/// A module selected for collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionTarget {
    pub module: ModuleId,
    pub capacity_total: Option<f64>,
}

/// A per-module failure recorded during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleError {
    pub module: String,
    pub error: String,
}

/// Result of a collection pass before persistence.
#[derive(Debug, Default)]
pub struct CollectionOutcome {
    pub metrics: Vec<ComputedMetric>,
    pub errors: Vec<ModuleError>,
}

/// Gather and classify metrics for each target.
///
/// A failing module is recorded in `errors` and the remaining modules are
/// still collected.
pub async fn gather(
    source: &dyn CounterSource,
    targets: &[CollectionTarget],
    now: Timestamp,
) -> CollectionOutcome {
    let mut outcome = CollectionOutcome::default();

    for target in targets {
        match source.counters(target.module, now).await {
            Ok(counters) => {
                let metrics = evaluate_module(target.module, &counters, target.capacity_total);
                outcome.metrics.extend(metrics);
            }
            Err(e) => outcome.errors.push(ModuleError {
                module: target.module.to_string(),
                error: e.to_string(),
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::counters as c;
    use chrono::Utc;

    /// Fails for one module, returns fixed counters for the rest.
    struct FlakySource {
        failing: ModuleId,
    }

    #[async_trait]
    impl CounterSource for FlakySource {
        async fn counters(&self, module: ModuleId, _now: Timestamp) -> Result<RawCounters, CoreError> {
            if module == self.failing {
                return Err(CoreError::Upstream {
                    source_name: module.to_string(),
                    message: "relation \"email_logs\" does not exist".into(),
                });
            }
            Ok(match module {
                ModuleId::Backend => RawCounters::new()
                    .with(c::REQUEST_COUNT_1H, 1000.0)
                    .with(c::ERROR_COUNT_1H, 10.0),
                ModuleId::Cron => RawCounters::new().with(c::JOB_FAILURES_24H, 0.0),
                _ => RawCounters::new(),
            })
        }
    }

    fn target(module: ModuleId) -> CollectionTarget {
        CollectionTarget {
            module,
            capacity_total: None,
        }
    }

    #[tokio::test]
    async fn failing_module_does_not_abort_the_pass() {
        let source = FlakySource {
            failing: ModuleId::Email,
        };
        let targets = [
            target(ModuleId::Backend),
            target(ModuleId::Email),
            target(ModuleId::Cron),
        ];

        let outcome = gather(&source, &targets, Utc::now()).await;

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].module, "email");
        assert!(outcome.errors[0].error.contains("email_logs"));

        let modules: Vec<_> = outcome.metrics.iter().map(|m| m.module).collect();
        assert!(modules.contains(&ModuleId::Backend));
        assert!(modules.contains(&ModuleId::Cron));
        assert!(!modules.contains(&ModuleId::Email));
    }

    #[tokio::test]
    async fn computes_derived_metrics_from_counters() {
        let source = FlakySource {
            failing: ModuleId::Email,
        };
        let outcome = gather(&source, &[target(ModuleId::Backend)], Utc::now()).await;

        let rate = outcome
            .metrics
            .iter()
            .find(|m| m.metric_name == "error_rate")
            .expect("error_rate computed");
        assert_eq!(rate.value, 1.0);
    }

    #[tokio::test]
    async fn empty_target_list_yields_empty_outcome() {
        let source = FlakySource {
            failing: ModuleId::Email,
        };
        let outcome = gather(&source, &[], Utc::now()).await;
        assert!(outcome.metrics.is_empty());
        assert!(outcome.errors.is_empty());
    }
}
