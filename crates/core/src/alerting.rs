//! Alert rule evaluation (conditions, severity, cooldown).
//!
//! Pure logic. The alert pass in `healthmesh-monitor` fetches the latest
//! metric value for each rule, calls [`decide`], and only then attempts the
//! atomic trigger claim in the database. The claim shares its cutoff with
//! [`cooldown_cutoff`] so the in-memory check and the conditional update
//! agree on what "cooldown elapsed" means.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Absolute tolerance for the `equals` condition.
pub const EQUALS_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Comparison applied as `value <op> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equals,
}

impl Condition {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::GreaterThan => "greater_than",
            Condition::GreaterThanOrEqual => "greater_than_or_equal",
            Condition::LessThan => "less_than",
            Condition::LessThanOrEqual => "less_than_or_equal",
            Condition::Equals => "equals",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Condition::GreaterThan => ">",
            Condition::GreaterThanOrEqual => ">=",
            Condition::LessThan => "<",
            Condition::LessThanOrEqual => "<=",
            Condition::Equals => "=",
        }
    }

    /// Whether `value` satisfies the condition against `threshold`.
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Condition::GreaterThan => value > threshold,
            Condition::GreaterThanOrEqual => value >= threshold,
            Condition::LessThan => value < threshold,
            Condition::LessThanOrEqual => value <= threshold,
            Condition::Equals => (value - threshold).abs() <= EQUALS_TOLERANCE,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = CoreError;

    /// Accepts both the storage names and the operator symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greater_than" | ">" => Ok(Condition::GreaterThan),
            "greater_than_or_equal" | ">=" => Ok(Condition::GreaterThanOrEqual),
            "less_than" | "<" => Ok(Condition::LessThan),
            "less_than_or_equal" | "<=" => Ok(Condition::LessThanOrEqual),
            "equals" | "=" | "==" => Ok(Condition::Equals),
            other => Err(CoreError::Validation(format!(
                "Unknown condition: '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity attached to an alert rule and copied onto each fired alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown severity: '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Cooldown and decision
// ---------------------------------------------------------------------------

/// Latest `last_triggered_at` that still allows a new fire at `now`.
pub fn cooldown_cutoff(now: Timestamp, cooldown_minutes: i32) -> Timestamp {
    now - Duration::minutes(i64::from(cooldown_minutes))
}

/// Whether at least `cooldown_minutes` have passed since `last_triggered_at`.
///
/// A rule that has never fired is always outside its cooldown.
pub fn cooldown_elapsed(
    last_triggered_at: Option<Timestamp>,
    now: Timestamp,
    cooldown_minutes: i32,
) -> bool {
    match last_triggered_at {
        None => true,
        Some(last) => last <= cooldown_cutoff(now, cooldown_minutes),
    }
}

/// The trigger-relevant part of an alert rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleState {
    pub condition: Condition,
    pub threshold: f64,
    pub cooldown_minutes: i32,
    pub last_triggered_at: Option<Timestamp>,
}

/// Outcome of evaluating one rule against one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDecision {
    /// The condition does not hold.
    NotMet,
    /// The condition holds but the rule is still cooling down.
    Suppressed,
    /// The condition holds and the rule may fire.
    Fire,
}

/// Decide whether `rule` fires for `value` at `now`.
pub fn decide(rule: &RuleState, value: f64, now: Timestamp) -> RuleDecision {
    if !rule.condition.holds(value, rule.threshold) {
        return RuleDecision::NotMet;
    }
    if cooldown_elapsed(rule.last_triggered_at, now, rule.cooldown_minutes) {
        RuleDecision::Fire
    } else {
        RuleDecision::Suppressed
    }
}

/// Human-readable message stored on the alert history entry.
pub fn alert_message(
    rule_name: &str,
    module: &str,
    metric_name: &str,
    value: f64,
    condition: Condition,
    threshold: f64,
) -> String {
    format!(
        "{rule_name}: {module}.{metric_name} is {value} ({} {threshold})",
        condition.symbol()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usage_rule(last_triggered_at: Option<Timestamp>) -> RuleState {
        RuleState {
            condition: Condition::GreaterThan,
            threshold: 90.0,
            cooldown_minutes: 60,
            last_triggered_at,
        }
    }

    #[test]
    fn cooldown_active_suppresses_alert() {
        let now = Utc::now();
        let rule = usage_rule(Some(now - Duration::minutes(10)));
        assert_eq!(decide(&rule, 95.0, now), RuleDecision::Suppressed);
    }

    #[test]
    fn cooldown_elapsed_fires_alert() {
        let now = Utc::now();
        let rule = usage_rule(Some(now - Duration::minutes(70)));
        assert_eq!(decide(&rule, 95.0, now), RuleDecision::Fire);
    }

    #[test]
    fn never_triggered_rule_fires() {
        assert_eq!(decide(&usage_rule(None), 95.0, Utc::now()), RuleDecision::Fire);
    }

    #[test]
    fn condition_not_met_regardless_of_cooldown() {
        let now = Utc::now();
        assert_eq!(decide(&usage_rule(None), 80.0, now), RuleDecision::NotMet);
        let cooling = usage_rule(Some(now - Duration::minutes(1)));
        assert_eq!(decide(&cooling, 80.0, now), RuleDecision::NotMet);
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(cooldown_elapsed(Some(now - Duration::minutes(60)), now, 60));
        assert!(!cooldown_elapsed(
            Some(now - Duration::minutes(60) + Duration::seconds(1)),
            now,
            60
        ));
    }

    #[test]
    fn comparisons_are_plain_float_comparisons() {
        assert!(Condition::GreaterThan.holds(90.1, 90.0));
        assert!(!Condition::GreaterThan.holds(90.0, 90.0));
        assert!(Condition::GreaterThanOrEqual.holds(90.0, 90.0));
        assert!(Condition::LessThan.holds(89.9, 90.0));
        assert!(!Condition::LessThan.holds(90.0, 90.0));
        assert!(Condition::LessThanOrEqual.holds(90.0, 90.0));
    }

    #[test]
    fn equals_uses_absolute_tolerance() {
        assert!(Condition::Equals.holds(0.1 + 0.2, 0.3));
        assert!(!Condition::Equals.holds(0.3001, 0.3));
    }

    #[test]
    fn parses_names_and_symbols() {
        assert_eq!(">".parse::<Condition>().unwrap(), Condition::GreaterThan);
        assert_eq!(
            "less_than_or_equal".parse::<Condition>().unwrap(),
            Condition::LessThanOrEqual
        );
        assert_eq!("=".parse::<Condition>().unwrap(), Condition::Equals);
        assert!("!=".parse::<Condition>().is_err());
    }

    #[test]
    fn severity_round_trips() {
        for sev in [Severity::Info, Severity::Warning, Severity::Critical] {
            assert_eq!(sev.as_str().parse::<Severity>().unwrap(), sev);
        }
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn message_names_rule_metric_and_threshold() {
        let msg = alert_message(
            "DB nearly full",
            "database",
            "usage_percent",
            95.0,
            Condition::GreaterThan,
            90.0,
        );
        assert_eq!(msg, "DB nearly full: database.usage_percent is 95 (> 90)");
    }
}
