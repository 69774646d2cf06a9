//! Input validation for alert rules and module configuration.
//!
//! Each helper returns a `CoreError::Validation` naming the offending field.

use crate::alerting::{Condition, Severity};
use crate::catalog;
use crate::channels::{is_known_channel, KNOWN_CHANNELS};
use crate::error::CoreError;
use crate::modules::ModuleId;

pub const MAX_RULE_NAME_LEN: usize = 200;

/// Borrowed view of a complete alert rule as submitted by a client.
#[derive(Debug, Clone, Copy)]
pub struct AlertRuleInput<'a> {
    pub name: &'a str,
    pub module: &'a str,
    pub metric_name: &'a str,
    pub condition: &'a str,
    pub threshold: f64,
    pub severity: &'a str,
    pub notification_channels: &'a [String],
    pub cooldown_minutes: i32,
}

/// The typed parts of a rule that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRule {
    pub module: ModuleId,
    pub condition: Condition,
    pub severity: Severity,
}

/// Validate every field of a new or replaced alert rule.
pub fn validate_alert_rule(input: &AlertRuleInput<'_>) -> Result<ValidatedRule, CoreError> {
    validate_rule_name(input.name)?;
    let module: ModuleId = input.module.parse()?;
    validate_metric(module, input.metric_name)?;
    let condition: Condition = input.condition.parse()?;
    let severity: Severity = input.severity.parse()?;
    validate_threshold(input.threshold)?;
    validate_channels(input.notification_channels)?;
    validate_cooldown(input.cooldown_minutes)?;
    Ok(ValidatedRule {
        module,
        condition,
        severity,
    })
}

pub fn validate_rule_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if trimmed.len() > MAX_RULE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_RULE_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// The metric must be one the catalog produces for `module`.
pub fn validate_metric(module: ModuleId, metric_name: &str) -> Result<(), CoreError> {
    if catalog::find(module, metric_name).is_none() {
        return Err(CoreError::Validation(format!(
            "metric_name '{metric_name}' is not collected for module '{module}'"
        )));
    }
    Ok(())
}

pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if !threshold.is_finite() {
        return Err(CoreError::Validation(
            "threshold must be a finite number".into(),
        ));
    }
    Ok(())
}

pub fn validate_channels(channels: &[String]) -> Result<(), CoreError> {
    if channels.is_empty() {
        return Err(CoreError::Validation(
            "notification_channels must not be empty".into(),
        ));
    }
    if let Some(unknown) = channels.iter().find(|c| !is_known_channel(c)) {
        return Err(CoreError::Validation(format!(
            "Unknown notification channel '{unknown}', expected one of {KNOWN_CHANNELS:?}"
        )));
    }
    Ok(())
}

pub fn validate_cooldown(cooldown_minutes: i32) -> Result<(), CoreError> {
    if cooldown_minutes < 1 {
        return Err(CoreError::Validation(format!(
            "cooldown_minutes must be at least 1, got {cooldown_minutes}"
        )));
    }
    Ok(())
}

/// Validate the editable numeric settings of a module configuration.
///
/// `None` means the field is not being changed.
pub fn validate_module_settings(
    collection_interval_seconds: Option<i32>,
    retention_days: Option<i32>,
    capacity_total: Option<f64>,
) -> Result<(), CoreError> {
    if let Some(interval) = collection_interval_seconds {
        if interval <= 0 {
            return Err(CoreError::Validation(format!(
                "collection_interval_seconds must be positive, got {interval}"
            )));
        }
    }
    if let Some(days) = retention_days {
        if days < 1 {
            return Err(CoreError::Validation(format!(
                "retention_days must be at least 1, got {days}"
            )));
        }
    }
    if let Some(capacity) = capacity_total {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(CoreError::Validation(format!(
                "capacity_total must be a non-negative number, got {capacity}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn channels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn input<'a>(channels: &'a [String]) -> AlertRuleInput<'a> {
        AlertRuleInput {
            name: "DB nearly full",
            module: "database",
            metric_name: "usage_percent",
            condition: "greater_than",
            threshold: 90.0,
            severity: "critical",
            notification_channels: channels,
            cooldown_minutes: 60,
        }
    }

    #[test]
    fn accepts_well_formed_rule() {
        let ch = channels(&["in_app", "email"]);
        let validated = validate_alert_rule(&input(&ch)).unwrap();
        assert_eq!(validated.module, ModuleId::Database);
        assert_eq!(validated.condition, Condition::GreaterThan);
        assert_eq!(validated.severity, Severity::Critical);
    }

    #[test]
    fn rejects_blank_name() {
        let ch = channels(&["in_app"]);
        let rule = AlertRuleInput {
            name: "   ",
            ..input(&ch)
        };
        assert_matches!(validate_alert_rule(&rule), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_module_and_metric() {
        let ch = channels(&["in_app"]);
        let rule = AlertRuleInput {
            module: "mainframe",
            ..input(&ch)
        };
        assert_matches!(validate_alert_rule(&rule), Err(CoreError::Validation(_)));

        let rule = AlertRuleInput {
            metric_name: "open_tickets",
            ..input(&ch)
        };
        assert_matches!(validate_alert_rule(&rule), Err(CoreError::Validation(msg)) if msg.contains("open_tickets"));
    }

    #[test]
    fn rejects_empty_or_unknown_channels() {
        assert_matches!(validate_channels(&[]), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_channels(&channels(&["in_app", "sms"])),
            Err(CoreError::Validation(msg)) if msg.contains("sms")
        );
    }

    #[test]
    fn cooldown_must_be_at_least_one_minute() {
        assert!(validate_cooldown(1).is_ok());
        assert!(validate_cooldown(0).is_err());
        assert!(validate_cooldown(-5).is_err());
    }

    #[test]
    fn threshold_must_be_finite() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
    }

    #[test]
    fn module_settings_bounds() {
        assert!(validate_module_settings(Some(60), Some(7), Some(0.0)).is_ok());
        assert!(validate_module_settings(None, None, None).is_ok());
        assert!(validate_module_settings(Some(0), None, None).is_err());
        assert!(validate_module_settings(None, Some(0), None).is_err());
        assert!(validate_module_settings(None, None, Some(-1.0)).is_err());
    }
}
