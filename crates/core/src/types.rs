//! Shared id and time aliases.

/// Row ids of `module_configs`, `alert_rules`, `alert_history`,
/// `notifications` and `platform_admins` (BIGSERIAL), and user ids.
pub type DbId = i64;

/// Collection, trigger and acknowledgement times, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
