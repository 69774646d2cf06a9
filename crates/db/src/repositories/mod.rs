//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod alert_history_repo;
pub mod alert_rule_repo;
pub mod metric_record_repo;
pub mod module_config_repo;
pub mod notification_repo;
pub mod operational_repo;
pub mod platform_admin_repo;

pub use alert_history_repo::AlertHistoryRepo;
pub use alert_rule_repo::AlertRuleRepo;
pub use metric_record_repo::MetricRecordRepo;
pub use module_config_repo::ModuleConfigRepo;
pub use notification_repo::NotificationRepo;
pub use operational_repo::OperationalRepo;
pub use platform_admin_repo::PlatformAdminRepo;
