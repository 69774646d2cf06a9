//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use healthmesh_db::repositories::ModuleConfigRepo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Modules with monitoring enabled. Absent when the database is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_modules: Option<usize>,
}

/// GET /health
///
/// Unauthenticated. Always 200; the body carries the degraded state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let enabled_modules = match healthmesh_db::health_check(&state.pool).await {
        Ok(()) => ModuleConfigRepo::list_enabled(&state.pool)
            .await
            .map(|configs| configs.len())
            .map_err(|e| tracing::warn!(error = %e, "Health check could not list modules"))
            .ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check database probe failed");
            None
        }
    };
    let db_healthy = enabled_modules.is_some();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        enabled_modules,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
