//! Platform administrator models.

use healthmesh_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `platform_admins` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformAdmin {
    pub id: DbId,
    pub user_id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}
