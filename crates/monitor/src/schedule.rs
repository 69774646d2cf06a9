//! Which modules are due for collection.

use std::collections::HashMap;

use chrono::Duration;

use healthmesh_core::types::Timestamp;
use healthmesh_db::models::module_config::ModuleConfig;

/// Enabled modules whose last collection is at least
/// `collection_interval_seconds` old, or that were never collected.
pub fn due_modules(
    configs: &[ModuleConfig],
    last_collected: &HashMap<String, Timestamp>,
    now: Timestamp,
) -> Vec<ModuleConfig> {
    configs
        .iter()
        .filter(|c| c.is_enabled)
        .filter(|c| match last_collected.get(&c.module) {
            None => true,
            Some(last) => {
                *last + Duration::seconds(i64::from(c.collection_interval_seconds)) <= now
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config(module: &str, enabled: bool, interval: i32) -> ModuleConfig {
        let now = Utc::now();
        ModuleConfig {
            id: 1,
            module: module.to_string(),
            display_name: module.to_string(),
            icon: None,
            is_enabled: enabled,
            collection_interval_seconds: interval,
            retention_days: 30,
            capacity_total: None,
            capacity_unit: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn never_collected_module_is_due() {
        let due = due_modules(&[config("backend", true, 60)], &HashMap::new(), Utc::now());
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn respects_interval() {
        let now = Utc::now();
        let last = HashMap::from([
            ("backend".to_string(), now - Duration::seconds(30)),
            ("email".to_string(), now - Duration::seconds(300)),
        ]);
        let configs = [config("backend", true, 60), config("email", true, 300)];
        let due: Vec<_> = due_modules(&configs, &last, now)
            .into_iter()
            .map(|c| c.module)
            .collect();
        assert_eq!(due, vec!["email"]);
    }

    #[test]
    fn disabled_module_is_never_due() {
        let due = due_modules(&[config("cron", false, 60)], &HashMap::new(), Utc::now());
        assert!(due.is_empty());
    }
}
