//! The tick loop.

use std::collections::HashMap;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use healthmesh_core::collection::CounterSource;
use healthmesh_core::types::Timestamp;
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};
use healthmesh_db::DbPool;
use healthmesh_events::NotificationDispatcher;
use healthmesh_monitor::alerts::{process_alerts, AlertPassReport};
use healthmesh_monitor::collect::{collect_modules, CollectionReport};
use healthmesh_monitor::schedule::due_modules;
use healthmesh_monitor::MonitorError;

use crate::WorkerConfig;

/// What one tick did.
#[derive(Debug)]
pub struct TickReport {
    /// Modules collected this tick, if any were due.
    pub collected_modules: Vec<String>,
    /// `None` when no module was due.
    pub collection: Option<CollectionReport>,
    pub alerts: AlertPassReport,
}

/// Run one tick as of `now`.
pub async fn run_tick(
    pool: &DbPool,
    source: &dyn CounterSource,
    dispatcher: &NotificationDispatcher,
    now: Timestamp,
) -> Result<TickReport, MonitorError> {
    let enabled = ModuleConfigRepo::list_enabled(pool).await?;
    let last_collected: HashMap<String, Timestamp> =
        MetricRecordRepo::last_collected_per_module(pool)
            .await?
            .into_iter()
            .collect();

    let due = due_modules(&enabled, &last_collected, now);
    let collected_modules: Vec<String> = due.iter().map(|c| c.module.clone()).collect();
    let collection = if due.is_empty() {
        None
    } else {
        Some(collect_modules(pool, source, &due, now).await?)
    };

    let alerts = process_alerts(pool, dispatcher, now).await?;

    Ok(TickReport {
        collected_modules,
        collection,
        alerts,
    })
}

/// Tick every `config.tick` until `cancel` is triggered.
///
/// A failed tick is logged and the loop carries on.
pub async fn run(
    pool: DbPool,
    source: &dyn CounterSource,
    dispatcher: NotificationDispatcher,
    config: WorkerConfig,
    cancel: CancellationToken,
) {
    tracing::info!(tick_secs = config.tick.as_secs(), "Monitoring scheduler started");

    let mut interval = tokio::time::interval(config.tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Monitoring scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                match run_tick(&pool, source, &dispatcher, Utc::now()).await {
                    Ok(report) => {
                        if !report.collected_modules.is_empty() {
                            tracing::info!(
                                modules = ?report.collected_modules,
                                alerts_fired = report.alerts.alerts_fired,
                                "Scheduler tick complete"
                            );
                        } else {
                            tracing::debug!(
                                alerts_fired = report.alerts.alerts_fired,
                                "Scheduler tick complete, no module due"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduler tick failed");
                    }
                }
            }
        }
    }
}
