//! One alert evaluation pass.
//!
//! For each active rule: read the latest value of its metric, evaluate the
//! condition and cooldown, and if it should fire, claim the trigger with a
//! conditional update that commits together with the history row. Only the
//! claim winner records history and dispatches.

use serde::Serialize;

use healthmesh_core::alerting::{alert_message, decide, RuleDecision, Severity};
use healthmesh_core::types::{DbId, Timestamp};
use healthmesh_db::models::alert_history::CreateAlertHistory;
use healthmesh_db::models::alert_rule::AlertRule;
use healthmesh_db::repositories::{AlertRuleRepo, MetricRecordRepo, PlatformAdminRepo};
use healthmesh_db::DbPool;
use healthmesh_events::{AlertNotice, ChannelResult, NotificationDispatcher, Recipients};

use crate::MonitorError;

/// A rule that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleError {
    pub rule_id: DbId,
    pub rule_name: String,
    pub error: String,
}

/// An alert fired in this pass and how each channel fared.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiredAlert {
    pub alert_id: DbId,
    pub rule_id: DbId,
    pub message: String,
    pub channels: Vec<ChannelResult>,
}

/// Outcome of one alert pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPassReport {
    pub rules_evaluated: usize,
    pub alerts_fired: usize,
    pub alerts_suppressed: usize,
    pub errors: Vec<RuleError>,
    pub fired: Vec<FiredAlert>,
}

enum RuleOutcome {
    NotMet,
    Suppressed,
    Fired(FiredAlert),
}

/// Evaluate every active rule as of `now`.
///
/// A rule that errors is reported and the pass continues with the next one.
pub async fn process_alerts(
    pool: &DbPool,
    dispatcher: &NotificationDispatcher,
    now: Timestamp,
) -> Result<AlertPassReport, MonitorError> {
    let rules = AlertRuleRepo::list_active(pool).await?;
    let mut report = AlertPassReport {
        rules_evaluated: rules.len(),
        ..AlertPassReport::default()
    };
    let mut recipients: Option<Recipients> = None;

    for rule in &rules {
        match evaluate_rule(pool, dispatcher, rule, now, &mut recipients).await {
            Ok(RuleOutcome::NotMet) => {}
            Ok(RuleOutcome::Suppressed) => {
                tracing::debug!(rule_id = rule.id, "Alert suppressed by cooldown");
                report.alerts_suppressed += 1;
            }
            Ok(RuleOutcome::Fired(fired)) => {
                report.alerts_fired += 1;
                report.fired.push(fired);
            }
            Err(error) => {
                tracing::warn!(rule_id = rule.id, error = %error, "Alert rule evaluation failed");
                report.errors.push(RuleError {
                    rule_id: rule.id,
                    rule_name: rule.name.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        rules_evaluated = report.rules_evaluated,
        alerts_fired = report.alerts_fired,
        alerts_suppressed = report.alerts_suppressed,
        errors = report.errors.len(),
        "Alert pass complete"
    );
    Ok(report)
}

async fn evaluate_rule(
    pool: &DbPool,
    dispatcher: &NotificationDispatcher,
    rule: &AlertRule,
    now: Timestamp,
    recipients: &mut Option<Recipients>,
) -> Result<RuleOutcome, String> {
    let state = rule.state().map_err(|e| e.to_string())?;
    let severity = rule
        .severity
        .parse::<Severity>()
        .map_err(|e| e.to_string())?;

    let latest = MetricRecordRepo::latest(pool, &rule.module, &rule.metric_name)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No metric data for {}.{}", rule.module, rule.metric_name))?;

    match decide(&state, latest.value, now) {
        RuleDecision::NotMet => return Ok(RuleOutcome::NotMet),
        RuleDecision::Suppressed => return Ok(RuleOutcome::Suppressed),
        RuleDecision::Fire => {}
    }

    // Another evaluator may have fired this rule since it was read. The
    // claim and the history row commit together.
    let claim = AlertRuleRepo::claim_and_record(pool, rule.id, now, |claimed| {
        CreateAlertHistory {
            rule_id: claimed.id,
            module: claimed.module.clone(),
            metric_name: claimed.metric_name.clone(),
            metric_value: latest.value,
            threshold: claimed.threshold,
            message: alert_message(
                &claimed.name,
                &claimed.module,
                &claimed.metric_name,
                latest.value,
                state.condition,
                claimed.threshold,
            ),
            severity: severity.as_str().to_string(),
            triggered_at: now,
        }
    })
    .await
    .map_err(|e| e.to_string())?;
    let Some((claimed, entry)) = claim else {
        return Ok(RuleOutcome::Suppressed);
    };
    let message = entry.message.clone();

    tracing::info!(
        rule_id = claimed.id,
        alert_id = entry.id,
        module = %claimed.module,
        metric = %claimed.metric_name,
        value = latest.value,
        severity = %severity,
        "Alert fired"
    );

    let notice = AlertNotice {
        alert_id: entry.id,
        rule_id: claimed.id,
        rule_name: claimed.name.clone(),
        module: claimed.module.clone(),
        metric_name: claimed.metric_name.clone(),
        value: latest.value,
        condition: state.condition,
        threshold: claimed.threshold,
        severity,
        message: message.clone(),
        triggered_at: now,
    };
    // The alert is already recorded; a recipient lookup failure is reported
    // per channel like any other delivery failure.
    let channels = match recipients_for_pass(pool, recipients).await {
        Ok(recipients) => {
            dispatcher
                .dispatch(&claimed.notification_channels, &notice, recipients)
                .await
        }
        Err(e) => {
            tracing::warn!(alert_id = entry.id, error = %e, "Failed to load alert recipients");
            claimed
                .notification_channels
                .iter()
                .map(|channel| {
                    ChannelResult::failed(channel, format!("Failed to load recipients: {e}"))
                })
                .collect()
        }
    };

    Ok(RuleOutcome::Fired(FiredAlert {
        alert_id: entry.id,
        rule_id: claimed.id,
        message,
        channels,
    }))
}

/// Recipients are loaded on the first fire of a pass and reused after that.
async fn recipients_for_pass<'a>(
    pool: &DbPool,
    cache: &'a mut Option<Recipients>,
) -> Result<&'a Recipients, sqlx::Error> {
    if cache.is_none() {
        *cache = Some(load_recipients(pool).await?);
    }
    Ok(cache.get_or_insert_with(Recipients::default))
}

/// Active platform admins receive every alert.
async fn load_recipients(pool: &DbPool) -> Result<Recipients, sqlx::Error> {
    let admins = PlatformAdminRepo::list_active(pool).await?;
    Ok(Recipients {
        user_ids: admins.iter().map(|a| a.user_id).collect(),
        emails: admins.into_iter().map(|a| a.email).collect(),
    })
}
