//! Bearer token validation.
//!
//! Tokens are issued by the platform's identity service; this server only
//! verifies them.

pub mod jwt;
