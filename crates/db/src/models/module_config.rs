//! Module configuration models.

use healthmesh_core::error::CoreError;
use healthmesh_core::matrix::ModuleSnapshot;
use healthmesh_core::modules::ModuleId;
use healthmesh_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `module_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModuleConfig {
    pub id: DbId,
    pub module: String,
    pub display_name: String,
    pub icon: Option<String>,
    pub is_enabled: bool,
    pub collection_interval_seconds: i32,
    pub retention_days: i32,
    pub capacity_total: Option<f64>,
    pub capacity_unit: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ModuleConfig {
    pub fn module_id(&self) -> Result<ModuleId, CoreError> {
        self.module.parse()
    }

    /// The aggregator's view of this configuration.
    pub fn snapshot(&self) -> Result<ModuleSnapshot, CoreError> {
        Ok(ModuleSnapshot {
            module: self.module_id()?,
            display_name: self.display_name.clone(),
            icon: self.icon.clone(),
            is_enabled: self.is_enabled,
            capacity_total: self.capacity_total,
            capacity_unit: self.capacity_unit.clone(),
            sort_order: self.sort_order,
        })
    }
}

/// DTO for updating a module configuration. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateModuleConfig {
    pub display_name: Option<String>,
    pub icon: Option<String>,
    pub is_enabled: Option<bool>,
    pub collection_interval_seconds: Option<i32>,
    pub retention_days: Option<i32>,
    pub capacity_total: Option<f64>,
    pub capacity_unit: Option<String>,
    pub sort_order: Option<i32>,
}
