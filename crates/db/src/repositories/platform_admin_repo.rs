//! Repository for the `platform_admins` table.

use sqlx::PgPool;
use healthmesh_core::types::DbId;

use crate::models::platform_admin::PlatformAdmin;

/// Column list for `platform_admins` queries.
const COLUMNS: &str = "id, user_id, email, display_name, is_active, created_at";

/// Provides lookups for platform administrators.
pub struct PlatformAdminRepo;

impl PlatformAdminRepo {
    /// Whether `user_id` is an active platform administrator.
    pub async fn is_platform_admin(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM platform_admins WHERE user_id = $1 AND is_active)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Active administrators, the recipients of alert notifications.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<PlatformAdmin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM platform_admins WHERE is_active ORDER BY user_id"
        );
        sqlx::query_as::<_, PlatformAdmin>(&query)
            .fetch_all(pool)
            .await
    }

    /// Register an administrator, reactivating an existing row for the same user.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<PlatformAdmin, sqlx::Error> {
        let query = format!(
            "INSERT INTO platform_admins (user_id, email, display_name) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET \
                email = EXCLUDED.email, \
                display_name = EXCLUDED.display_name, \
                is_active = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlatformAdmin>(&query)
            .bind(user_id)
            .bind(email)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    /// Deactivate an administrator. Returns `true` if a row changed.
    pub async fn deactivate(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE platform_admins SET is_active = false WHERE user_id = $1 AND is_active",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
