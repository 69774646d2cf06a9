//! Alert rule models and DTOs.

use healthmesh_core::alerting::RuleState;
use healthmesh_core::error::CoreError;
use healthmesh_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `alert_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRule {
    pub id: DbId,
    pub name: String,
    pub module: String,
    pub metric_name: String,
    pub condition: String,
    pub threshold: f64,
    pub severity: String,
    pub notification_channels: Vec<String>,
    pub cooldown_minutes: i32,
    pub is_active: bool,
    pub last_triggered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AlertRule {
    /// The trigger-relevant fields, with the stored condition parsed.
    pub fn state(&self) -> Result<RuleState, CoreError> {
        Ok(RuleState {
            condition: self.condition.parse()?,
            threshold: self.threshold,
            cooldown_minutes: self.cooldown_minutes,
            last_triggered_at: self.last_triggered_at,
        })
    }
}

/// DTO for creating an alert rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlertRule {
    pub name: String,
    pub module: String,
    pub metric_name: String,
    pub condition: String,
    pub threshold: f64,
    pub severity: String,
    pub notification_channels: Vec<String>,
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i32,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_cooldown_minutes() -> i32 {
    60
}

fn default_is_active() -> bool {
    true
}

/// DTO for updating an alert rule. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAlertRule {
    pub name: Option<String>,
    pub module: Option<String>,
    pub metric_name: Option<String>,
    pub condition: Option<String>,
    pub threshold: Option<f64>,
    pub severity: Option<String>,
    pub notification_channels: Option<Vec<String>>,
    pub cooldown_minutes: Option<i32>,
    pub is_active: Option<bool>,
}
