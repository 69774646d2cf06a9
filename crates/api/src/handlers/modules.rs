//! Handlers for module configuration and metric history.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use healthmesh_core::error::CoreError;
use healthmesh_core::modules::ModuleId;
use healthmesh_core::validation::validate_module_settings;
use healthmesh_db::models::metric_record::MetricRecord;
use healthmesh_db::models::module_config::{ModuleConfig, UpdateModuleConfig};
use healthmesh_db::repositories::{MetricRecordRepo, ModuleConfigRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequirePlatformAdmin;
use crate::response::{data, DataResponse};
use crate::state::AppState;

/// Default window for `GET /modules/{module}/metrics`.
const DEFAULT_HISTORY_HOURS: i64 = 24;

/// Query parameters for `GET /modules/{module}/metrics`.
#[derive(Debug, Deserialize)]
pub struct MetricHistoryQuery {
    pub hours: Option<i64>,
}

/// Unknown module ids are reported as missing resources.
fn parse_module(module: &str) -> Result<ModuleId, CoreError> {
    module
        .parse()
        .map_err(|_| CoreError::not_found("Module", module))
}

/// GET /api/v1/monitoring/modules
pub async fn list_modules(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ModuleConfig>>>> {
    let configs = ModuleConfigRepo::list(&state.pool).await?;
    Ok(data(configs))
}

/// GET /api/v1/monitoring/modules/{module}
pub async fn get_module(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> AppResult<Json<DataResponse<ModuleConfig>>> {
    let module = parse_module(&module)?;
    let config = ModuleConfigRepo::find_by_module(&state.pool, module.as_str())
        .await?
        .ok_or_else(|| CoreError::not_found("Module", module))?;
    Ok(data(config))
}

/// PUT /api/v1/monitoring/modules/{module}
///
/// Partial update; absent fields are left unchanged.
pub async fn update_module(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(module): Path<String>,
    Json(input): Json<UpdateModuleConfig>,
) -> AppResult<Json<DataResponse<ModuleConfig>>> {
    let module = parse_module(&module)?;
    validate_module_settings(
        input.collection_interval_seconds,
        input.retention_days,
        input.capacity_total,
    )?;

    let config = ModuleConfigRepo::update(&state.pool, module.as_str(), &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Module", module))?;

    tracing::info!(
        user_id = admin.user_id,
        module = %module,
        is_enabled = config.is_enabled,
        "Module configuration updated"
    );
    Ok(data(config))
}

/// GET /api/v1/monitoring/modules/{module}/metrics?hours=
///
/// Newest first. `hours` defaults to 24 and is clamped to the configured
/// maximum.
pub async fn module_metrics(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(state): State<AppState>,
    Path(module): Path<String>,
    Query(params): Query<MetricHistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<MetricRecord>>>> {
    let module = parse_module(&module)?;
    let hours = params
        .hours
        .unwrap_or(DEFAULT_HISTORY_HOURS)
        .clamp(1, state.monitor.metric_history_max_hours);
    let since = Utc::now() - Duration::hours(hours);

    let records = MetricRecordRepo::list_for_module(
        &state.pool,
        module.as_str(),
        since,
        state.monitor.metric_history_limit,
    )
    .await?;
    Ok(data(records))
}
