//! In-app notification models.

use healthmesh_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Category used for notifications raised by alert rules.
pub const CATEGORY_SYSTEM_ALERT: &str = "system_alert";

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub category: String,
    pub module: Option<String>,
    pub rule_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Notification content to fan out to a set of users.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub title: String,
    pub message: String,
    pub category: String,
    pub module: Option<String>,
    pub rule_id: Option<DbId>,
}
