pub mod alert_rules;
pub mod alerts;
pub mod modules;
pub mod monitoring;
pub mod notifications;
