//! Handlers for fired alerts (`/alerts`).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use healthmesh_core::error::CoreError;
use healthmesh_core::types::DbId;
use healthmesh_db::models::alert_history::{AlertHistoryCounts, AlertHistoryEntry};
use healthmesh_db::repositories::AlertHistoryRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::query::PaginationParams;
use crate::response::{data, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub unresolved_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/monitoring/alerts?unresolved_only=&limit=&offset=
pub async fn list_alerts(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> AppResult<Json<DataResponse<Vec<AlertHistoryEntry>>>> {
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let alerts =
        AlertHistoryRepo::list(&state.pool, params.unresolved_only, page.limit(), page.offset())
            .await?;
    Ok(data(alerts))
}

/// GET /api/v1/monitoring/alerts/counts
pub async fn alert_counts(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AlertHistoryCounts>>> {
    let counts = AlertHistoryRepo::counts(&state.pool).await?;
    Ok(data(counts))
}

/// POST /api/v1/monitoring/alerts/{id}/acknowledge
///
/// Idempotent; the first acknowledger is kept.
pub async fn acknowledge_alert(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AlertHistoryEntry>>> {
    let alert = AlertHistoryRepo::acknowledge(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Alert", id))?;
    tracing::info!(user_id = admin.user_id, alert_id = id, "Alert acknowledged");
    Ok(data(alert))
}

/// POST /api/v1/monitoring/alerts/{id}/resolve
pub async fn resolve_alert(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AlertHistoryEntry>>> {
    let alert = AlertHistoryRepo::resolve(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Alert", id))?;
    tracing::info!(user_id = admin.user_id, alert_id = id, "Alert resolved");
    Ok(data(alert))
}
