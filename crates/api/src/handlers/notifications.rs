//! Handlers for the current admin's in-app notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use healthmesh_core::error::CoreError;
use healthmesh_core::types::DbId;
use healthmesh_db::models::notification::Notification;
use healthmesh_db::repositories::NotificationRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::query::PaginationParams;
use crate::response::{data, CountResponse, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/monitoring/notifications
pub async fn list_notifications(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let page = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        admin.user_id,
        params.unread_only,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(data(notifications))
}

/// GET /api/v1/monitoring/notifications/unread-count
pub async fn unread_count(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CountResponse>>> {
    let count = NotificationRepo::unread_count(&state.pool, admin.user_id).await?;
    Ok(data(CountResponse { count }))
}

/// POST /api/v1/monitoring/notifications/{id}/read
///
/// 204 on success, 404 if the notification is not an unread one of the
/// caller's.
pub async fn mark_read(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, id, admin.user_id).await? {
        return Err(CoreError::not_found("Notification", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
