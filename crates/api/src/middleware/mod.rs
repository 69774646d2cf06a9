//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//! - [`rbac::RequirePlatformAdmin`] -- an active platform admin.

pub mod auth;
pub mod rbac;
