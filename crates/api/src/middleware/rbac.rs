//! Platform-admin authorization.
//!
//! Admin status lives in `platform_admins`, not in the token role, so it can
//! be revoked without waiting for tokens to expire.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use healthmesh_core::error::CoreError;
use healthmesh_db::repositories::PlatformAdminRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an active platform admin. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequirePlatformAdmin(user): RequirePlatformAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePlatformAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequirePlatformAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !PlatformAdminRepo::is_platform_admin(&state.pool, user.user_id).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "Platform admin access required".into(),
            )));
        }
        Ok(RequirePlatformAdmin(user))
    }
}
