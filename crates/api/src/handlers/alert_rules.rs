//! Handlers for the `/alert-rules` resource.
//!
//! Rules are validated in full on create and after merging on update, and
//! the condition is stored under its canonical name.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use healthmesh_core::error::CoreError;
use healthmesh_core::types::DbId;
use healthmesh_core::validation::{validate_alert_rule, AlertRuleInput};
use healthmesh_db::models::alert_rule::{AlertRule, CreateAlertRule, UpdateAlertRule};
use healthmesh_db::repositories::AlertRuleRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::{data, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /alert-rules`.
#[derive(Debug, Deserialize)]
pub struct AlertRuleQuery {
    pub module: Option<String>,
}

/// GET /api/v1/monitoring/alert-rules?module=
pub async fn list_rules(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Query(params): Query<AlertRuleQuery>,
) -> AppResult<Json<DataResponse<Vec<AlertRule>>>> {
    let rules = AlertRuleRepo::list(&state.pool, params.module.as_deref()).await?;
    Ok(data(rules))
}

/// POST /api/v1/monitoring/alert-rules
pub async fn create_rule(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateAlertRule>,
) -> AppResult<impl IntoResponse> {
    let validated = validate_alert_rule(&AlertRuleInput {
        name: &input.name,
        module: &input.module,
        metric_name: &input.metric_name,
        condition: &input.condition,
        threshold: input.threshold,
        severity: &input.severity,
        notification_channels: &input.notification_channels,
        cooldown_minutes: input.cooldown_minutes,
    })?;
    input.condition = validated.condition.as_str().to_string();

    let rule = AlertRuleRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = admin.user_id,
        rule_id = rule.id,
        module = %rule.module,
        metric = %rule.metric_name,
        "Alert rule created"
    );
    Ok((StatusCode::CREATED, data(rule)))
}

/// GET /api/v1/monitoring/alert-rules/{id}
pub async fn get_rule(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AlertRule>>> {
    let rule = AlertRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("AlertRule", id))?;
    Ok(data(rule))
}

/// PUT /api/v1/monitoring/alert-rules/{id}
///
/// Partial update. The merged rule must still be valid as a whole.
pub async fn update_rule(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAlertRule>,
) -> AppResult<Json<DataResponse<AlertRule>>> {
    let existing = AlertRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("AlertRule", id))?;

    let validated = validate_alert_rule(&AlertRuleInput {
        name: input.name.as_deref().unwrap_or(&existing.name),
        module: input.module.as_deref().unwrap_or(&existing.module),
        metric_name: input.metric_name.as_deref().unwrap_or(&existing.metric_name),
        condition: input.condition.as_deref().unwrap_or(&existing.condition),
        threshold: input.threshold.unwrap_or(existing.threshold),
        severity: input.severity.as_deref().unwrap_or(&existing.severity),
        notification_channels: input
            .notification_channels
            .as_deref()
            .unwrap_or(&existing.notification_channels),
        cooldown_minutes: input.cooldown_minutes.unwrap_or(existing.cooldown_minutes),
    })?;
    if input.condition.is_some() {
        input.condition = Some(validated.condition.as_str().to_string());
    }

    let rule = AlertRuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("AlertRule", id))?;
    tracing::info!(user_id = admin.user_id, rule_id = id, "Alert rule updated");
    Ok(data(rule))
}

/// DELETE /api/v1/monitoring/alert-rules/{id}
///
/// Alert history recorded for the rule is kept.
pub async fn delete_rule(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AlertRuleRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("AlertRule", id).into());
    }
    tracing::info!(user_id = admin.user_id, rule_id = id, "Alert rule deleted");
    Ok(StatusCode::NO_CONTENT)
}
