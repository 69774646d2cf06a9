//! Handlers for the monitoring trigger operations.
//!
//! Each trigger runs one unit of work to completion and returns its report.
//! All endpoints require a platform admin.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use healthmesh_core::matrix::MatrixResponse;
use healthmesh_monitor::alerts::{process_alerts, AlertPassReport};
use healthmesh_monitor::collect::{collect_enabled, CollectionReport};
use healthmesh_monitor::matrix::load_matrix;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::{data, DataResponse};
use crate::state::AppState;

/// POST /api/v1/monitoring/collect
///
/// Collect every enabled module, then prune expired records.
pub async fn collect(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CollectionReport>>> {
    tracing::info!(user_id = admin.user_id, "Manual metric collection requested");
    let report = collect_enabled(&state.pool, state.counters.as_ref(), Utc::now()).await?;
    Ok(data(report))
}

/// GET /api/v1/monitoring/matrix
pub async fn matrix(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MatrixResponse>>> {
    let matrix = load_matrix(&state.pool, Utc::now()).await?;
    Ok(data(matrix))
}

/// POST /api/v1/monitoring/alerts/process
///
/// Evaluate every active alert rule against the latest metrics.
pub async fn process(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AlertPassReport>>> {
    tracing::info!(user_id = admin.user_id, "Manual alert pass requested");
    let report = process_alerts(&state.pool, &state.dispatcher, Utc::now()).await?;
    Ok(data(report))
}
