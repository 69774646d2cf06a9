//! Monitored platform modules.
//!
//! A module is one subsystem of the HR platform that gets its own row in
//! `module_configs` and its own slice of the metric catalog. The string ids
//! below are the storage and wire representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a monitored platform subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Database,
    Backend,
    Email,
    Auth,
    Users,
    Security,
    Storage,
    Logs,
    Notifications,
    Integrations,
    Cron,
}

impl ModuleId {
    /// Every module, in default display order.
    pub const ALL: [ModuleId; 11] = [
        ModuleId::Database,
        ModuleId::Backend,
        ModuleId::Email,
        ModuleId::Auth,
        ModuleId::Users,
        ModuleId::Security,
        ModuleId::Storage,
        ModuleId::Logs,
        ModuleId::Notifications,
        ModuleId::Integrations,
        ModuleId::Cron,
    ];

    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Database => "database",
            ModuleId::Backend => "backend",
            ModuleId::Email => "email",
            ModuleId::Auth => "auth",
            ModuleId::Users => "users",
            ModuleId::Security => "security",
            ModuleId::Storage => "storage",
            ModuleId::Logs => "logs",
            ModuleId::Notifications => "notifications",
            ModuleId::Integrations => "integrations",
            ModuleId::Cron => "cron",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown module: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_module() {
        for module in ModuleId::ALL {
            assert_eq!(module.as_str().parse::<ModuleId>().unwrap(), module);
        }
    }

    #[test]
    fn rejects_unknown_module() {
        let err = "payroll".parse::<ModuleId>().unwrap_err();
        assert!(err.to_string().contains("Unknown module"));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ModuleId::Integrations).unwrap();
        assert_eq!(json, "\"integrations\"");
    }
}
