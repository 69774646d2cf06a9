use std::sync::Arc;

use healthmesh_core::collection::CounterSource;
use healthmesh_events::NotificationDispatcher;
use healthmesh_monitor::MonitorConfig;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: healthmesh_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    pub monitor: Arc<MonitorConfig>,
    /// Raw counter queries used by collection passes.
    pub counters: Arc<dyn CounterSource>,
    /// Alert fan-out to in-app and email channels.
    pub dispatcher: NotificationDispatcher,
}
