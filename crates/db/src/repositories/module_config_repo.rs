//! Repository for the `module_configs` table.

use sqlx::PgPool;

use crate::models::module_config::{ModuleConfig, UpdateModuleConfig};

/// Column list for `module_configs` queries.
const COLUMNS: &str = "\
    id, module, display_name, icon, is_enabled, collection_interval_seconds, \
    retention_days, capacity_total, capacity_unit, sort_order, created_at, updated_at";

/// Provides query operations for module configuration.
pub struct ModuleConfigRepo;

impl ModuleConfigRepo {
    /// List every module in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ModuleConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM module_configs ORDER BY sort_order, module");
        sqlx::query_as::<_, ModuleConfig>(&query)
            .fetch_all(pool)
            .await
    }

    /// List enabled modules in display order.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<ModuleConfig>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM module_configs WHERE is_enabled ORDER BY sort_order, module"
        );
        sqlx::query_as::<_, ModuleConfig>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_module(
        pool: &PgPool,
        module: &str,
    ) -> Result<Option<ModuleConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM module_configs WHERE module = $1");
        sqlx::query_as::<_, ModuleConfig>(&query)
            .bind(module)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the module has no row.
    pub async fn update(
        pool: &PgPool,
        module: &str,
        input: &UpdateModuleConfig,
    ) -> Result<Option<ModuleConfig>, sqlx::Error> {
        let query = format!(
            "UPDATE module_configs SET \
                display_name = COALESCE($2, display_name), \
                icon = COALESCE($3, icon), \
                is_enabled = COALESCE($4, is_enabled), \
                collection_interval_seconds = COALESCE($5, collection_interval_seconds), \
                retention_days = COALESCE($6, retention_days), \
                capacity_total = COALESCE($7, capacity_total), \
                capacity_unit = COALESCE($8, capacity_unit), \
                sort_order = COALESCE($9, sort_order), \
                updated_at = NOW() \
             WHERE module = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModuleConfig>(&query)
            .bind(module)
            .bind(&input.display_name)
            .bind(&input.icon)
            .bind(input.is_enabled)
            .bind(input.collection_interval_seconds)
            .bind(input.retention_days)
            .bind(input.capacity_total)
            .bind(&input.capacity_unit)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }
}
