//! Multi-channel alert notification fan-out.
//!
//! [`NotificationDispatcher::dispatch`] runs every requested channel
//! concurrently and always returns one [`ChannelResult`] per requested
//! channel, in request order. Channel failures are captured in the result
//! and never propagate to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;

use healthmesh_core::alerting::{Condition, Severity};
use healthmesh_core::channels::{CHANNEL_EMAIL, CHANNEL_IN_APP};
use healthmesh_core::types::{DbId, Timestamp};
use healthmesh_db::models::notification::{CreateNotification, CATEGORY_SYSTEM_ALERT};
use healthmesh_db::repositories::NotificationRepo;
use healthmesh_db::DbPool;

use crate::delivery::templates::EmailTemplate;
use crate::service::EmailService;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fired alert, as every channel sees it.
#[derive(Debug, Clone)]
pub struct AlertNotice {
    pub alert_id: DbId,
    pub rule_id: DbId,
    pub rule_name: String,
    pub module: String,
    pub metric_name: String,
    pub value: f64,
    pub condition: Condition,
    pub threshold: f64,
    pub severity: Severity,
    pub message: String,
    pub triggered_at: Timestamp,
}

impl AlertNotice {
    pub fn title(&self) -> String {
        format!("[{}] {}", self.severity.as_str().to_uppercase(), self.rule_name)
    }

    /// Data object for [`EmailTemplate::AlertTriggered`].
    pub fn template_data(&self) -> serde_json::Value {
        json!({
            "rule_name": self.rule_name,
            "module": self.module,
            "metric_name": self.metric_name,
            "value": self.value,
            "condition": self.condition.symbol(),
            "threshold": self.threshold,
            "severity": self.severity.as_str(),
            "message": self.message,
            "triggered_at": self.triggered_at.to_rfc3339(),
        })
    }
}

/// Who receives an alert.
#[derive(Debug, Clone, Default)]
pub struct Recipients {
    /// In-app notification inboxes.
    pub user_ids: Vec<DbId>,
    pub emails: Vec<String>,
}

/// Outcome of one channel for one alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelResult {
    pub channel: String,
    pub success: bool,
    pub detail: String,
}

impl ChannelResult {
    pub fn failed(channel: &str, detail: impl Into<String>) -> Self {
        Self {
            channel: channel.to_string(),
            success: false,
            detail: detail.into(),
        }
    }
}

/// Error type for a single channel delivery.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email delivery failed: {0}")]
    Email(String),

    #[error("No recipients for channel {0}")]
    NoRecipients(&'static str),

    #[error("Unknown notification channel: {0}")]
    UnknownChannel(String),
}

/// A delivery channel for fired alerts.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// The name used in `alert_rules.notification_channels`.
    fn name(&self) -> &'static str;

    /// Deliver `notice`, returning a short human-readable detail on success.
    async fn deliver(
        &self,
        notice: &AlertNotice,
        recipients: &Recipients,
    ) -> Result<String, DispatchError>;
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Writes one `system_alert` notification per recipient user.
pub struct InAppChannel {
    pool: DbPool,
}

impl InAppChannel {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationChannel for InAppChannel {
    fn name(&self) -> &'static str {
        CHANNEL_IN_APP
    }

    async fn deliver(
        &self,
        notice: &AlertNotice,
        recipients: &Recipients,
    ) -> Result<String, DispatchError> {
        if recipients.user_ids.is_empty() {
            return Err(DispatchError::NoRecipients(CHANNEL_IN_APP));
        }
        let input = CreateNotification {
            title: notice.title(),
            message: notice.message.clone(),
            category: CATEGORY_SYSTEM_ALERT.to_string(),
            module: Some(notice.module.clone()),
            rule_id: Some(notice.rule_id),
        };
        let created =
            NotificationRepo::create_for_users(&self.pool, &recipients.user_ids, &input).await?;
        Ok(format!("created {created} notifications"))
    }
}

/// Sends the `alert_triggered` template to every recipient address.
pub struct EmailChannel {
    service: EmailService,
}

impl EmailChannel {
    pub fn new(service: EmailService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        CHANNEL_EMAIL
    }

    async fn deliver(
        &self,
        notice: &AlertNotice,
        recipients: &Recipients,
    ) -> Result<String, DispatchError> {
        if recipients.emails.is_empty() {
            return Err(DispatchError::NoRecipients(CHANNEL_EMAIL));
        }
        let result = self
            .service
            .send(
                EmailTemplate::AlertTriggered,
                &notice.template_data(),
                &recipients.emails,
            )
            .await;
        if !result.success {
            return Err(DispatchError::Email(
                result.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(match result.message_id {
            Some(id) => format!(
                "sent to {} recipients via {} ({id})",
                recipients.emails.len(),
                result.provider
            ),
            None => format!(
                "sent to {} recipients via {}",
                recipients.emails.len(),
                result.provider
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes fired alerts to their channels.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    channels: HashMap<&'static str, Arc<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production channel set: in-app and email.
    pub fn standard(pool: DbPool, email: EmailService) -> Self {
        Self::new()
            .with_channel(Arc::new(InAppChannel::new(pool)))
            .with_channel(Arc::new(EmailChannel::new(email)))
    }

    /// Register a channel under its own name, replacing any previous one.
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.insert(channel.name(), channel);
        self
    }

    /// Deliver `notice` to every channel in `channels` concurrently.
    pub async fn dispatch(
        &self,
        channels: &[String],
        notice: &AlertNotice,
        recipients: &Recipients,
    ) -> Vec<ChannelResult> {
        let deliveries = channels.iter().map(|name| async move {
            let outcome = match self.channels.get(name.as_str()) {
                Some(channel) => channel.deliver(notice, recipients).await,
                None => Err(DispatchError::UnknownChannel(name.clone())),
            };
            match outcome {
                Ok(detail) => {
                    tracing::info!(
                        channel = %name,
                        rule_id = notice.rule_id,
                        alert_id = notice.alert_id,
                        "Alert notification delivered"
                    );
                    ChannelResult {
                        channel: name.clone(),
                        success: true,
                        detail,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        channel = %name,
                        rule_id = notice.rule_id,
                        alert_id = notice.alert_id,
                        error = %e,
                        "Alert notification failed"
                    );
                    ChannelResult::failed(name, e.to_string())
                }
            }
        });

        join_all(deliveries).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// A channel that succeeds or fails on demand and counts calls.
    struct FakeChannel {
        name: &'static str,
        fail: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeChannel {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl NotificationChannel for FakeChannel {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn deliver(
            &self,
            _notice: &AlertNotice,
            _recipients: &Recipients,
        ) -> Result<String, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(DispatchError::Email("smtp down".into()))
            } else {
                Ok("ok".into())
            }
        }
    }

    fn notice() -> AlertNotice {
        AlertNotice {
            alert_id: 1,
            rule_id: 10,
            rule_name: "DB nearly full".into(),
            module: "database".into(),
            metric_name: "usage_percent".into(),
            value: 95.0,
            condition: Condition::GreaterThan,
            threshold: 90.0,
            severity: Severity::Critical,
            message: "DB nearly full: database.usage_percent is 95 (> 90)".into(),
            triggered_at: Utc::now(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn one_failing_channel_does_not_block_others() {
        let in_app = FakeChannel::new(CHANNEL_IN_APP, false);
        let email = FakeChannel::new(CHANNEL_EMAIL, true);
        let dispatcher = NotificationDispatcher::new()
            .with_channel(in_app.clone())
            .with_channel(email.clone());

        let results = dispatcher
            .dispatch(&names(&["in_app", "email"]), &notice(), &Recipients::default())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].channel, "in_app");
        assert!(results[0].success);
        assert_eq!(results[1].channel, "email");
        assert!(!results[1].success);
        assert!(results[1].detail.contains("smtp down"));
        assert_eq!(in_app.calls.load(Ordering::SeqCst), 1);
        assert_eq!(email.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_channel_yields_failed_result() {
        let dispatcher = NotificationDispatcher::new().with_channel(FakeChannel::new(CHANNEL_IN_APP, false));
        let results = dispatcher
            .dispatch(&names(&["sms", "in_app"]), &notice(), &Recipients::default())
            .await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].detail.contains("sms"));
        assert!(results[1].success);
    }

    #[tokio::test(start_paused = true)]
    async fn channels_run_concurrently() {
        let slow = |name| {
            Arc::new(FakeChannel {
                name,
                fail: false,
                delay: Duration::from_secs(5),
                calls: AtomicUsize::new(0),
            })
        };
        let dispatcher = NotificationDispatcher::new()
            .with_channel(slow(CHANNEL_IN_APP))
            .with_channel(slow(CHANNEL_EMAIL));

        let started = tokio::time::Instant::now();
        let results = dispatcher
            .dispatch(&names(&["in_app", "email"]), &notice(), &Recipients::default())
            .await;

        assert!(results.iter().all(|r| r.success));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn empty_channel_list_dispatches_nothing() {
        let dispatcher = NotificationDispatcher::new();
        assert!(dispatcher.dispatch(&[], &notice(), &Recipients::default()).await.is_empty());
    }

    #[test]
    fn title_and_template_data() {
        let n = notice();
        assert_eq!(n.title(), "[CRITICAL] DB nearly full");
        let data = n.template_data();
        assert_eq!(data["condition"], ">");
        assert!(EmailTemplate::AlertTriggered.render(&data).is_ok());
    }
}
