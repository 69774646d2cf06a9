//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the API creates rows
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod alert_history;
pub mod alert_rule;
pub mod metric_record;
pub mod module_config;
pub mod notification;
pub mod platform_admin;
