//! Template-based email sending through the configured provider.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::delivery::email::{EmailError, EmailMessage};
use crate::delivery::registry::ProviderRegistry;
use crate::delivery::templates::EmailTemplate;

/// Outcome of one [`EmailService::send`] call. Failures are reported here,
/// never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailSendResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
    pub provider: String,
}

impl EmailSendResult {
    fn failed(provider: &str, error: &EmailError) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.to_string()),
            provider: provider.to_string(),
        }
    }
}

/// Renders templates and hands them to the provider selected by configuration.
#[derive(Clone)]
pub struct EmailService {
    registry: Arc<ProviderRegistry>,
}

impl EmailService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Render `template` with `data` and send it to every recipient.
    pub async fn send(
        &self,
        template: EmailTemplate,
        data: &Value,
        recipients: &[String],
    ) -> EmailSendResult {
        let provider_name = self.registry.config().provider.as_str();

        match self.try_send(template, data, recipients).await {
            Ok(message_id) => {
                tracing::info!(
                    template = template.name(),
                    provider = provider_name,
                    recipients = recipients.len(),
                    "Email sent"
                );
                EmailSendResult {
                    success: true,
                    message_id,
                    error: None,
                    provider: provider_name.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    template = template.name(),
                    provider = provider_name,
                    error = %e,
                    "Email send failed"
                );
                EmailSendResult::failed(provider_name, &e)
            }
        }
    }

    async fn try_send(
        &self,
        template: EmailTemplate,
        data: &Value,
        recipients: &[String],
    ) -> Result<Option<String>, EmailError> {
        if recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }
        let rendered = template.render(data)?;
        let provider = self.registry.default_provider().await?;
        let config = self.registry.config();

        let message = EmailMessage {
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            to: recipients.to_vec(),
            subject: rendered.subject,
            text_body: rendered.text_body,
            html_body: rendered.html_body,
        };
        provider.send(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::email::{EmailConfig, EmailProvider, ProviderKind};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Records every message; fails when `fail` is set.
    #[derive(Default)]
    struct RecordingProvider {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl EmailProvider for RecordingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Console
        }

        async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
            if self.fail {
                return Err(EmailError::HttpStatus {
                    provider: ProviderKind::Console,
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            self.sent.lock().await.push(message.clone());
            Ok(Some("msg-1".into()))
        }
    }

    fn service(provider: Arc<RecordingProvider>) -> EmailService {
        let registry = ProviderRegistry::new(EmailConfig::default())
            .unwrap()
            .with_provider(provider);
        EmailService::new(Arc::new(registry))
    }

    fn data() -> Value {
        json!({
            "rule_name": "Queue backing up",
            "module": "email",
            "metric_name": "queue_size",
            "value": 600,
            "condition": ">",
            "threshold": 500,
            "severity": "warning",
            "message": "Queue backing up: email.queue_size is 600 (> 500)",
            "triggered_at": "2026-03-01T12:00:00Z",
        })
    }

    #[tokio::test]
    async fn sends_rendered_template_to_all_recipients() {
        let provider = Arc::new(RecordingProvider::default());
        let svc = service(Arc::clone(&provider));
        let recipients = vec!["a@example.com".to_string(), "b@example.com".to_string()];

        let result = svc.send(EmailTemplate::AlertTriggered, &data(), &recipients).await;

        assert!(result.success);
        assert_eq!(result.message_id.as_deref(), Some("msg-1"));
        assert_eq!(result.provider, "console");
        let sent = provider.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, recipients);
        assert_eq!(sent[0].subject, "[WARNING] Queue backing up");
    }

    #[tokio::test]
    async fn provider_failure_is_reported_not_raised() {
        let provider = Arc::new(RecordingProvider {
            fail: true,
            ..Default::default()
        });
        let result = service(provider)
            .send(EmailTemplate::AlertTriggered, &data(), &["a@example.com".into()])
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn no_recipients_fails() {
        let provider = Arc::new(RecordingProvider::default());
        let result = service(Arc::clone(&provider))
            .send(EmailTemplate::AlertTriggered, &data(), &[])
            .await;
        assert!(!result.success);
        assert!(provider.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn template_errors_are_reported() {
        let provider = Arc::new(RecordingProvider::default());
        let result = service(provider)
            .send(EmailTemplate::AlertTriggered, &json!({}), &["a@example.com".into()])
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("alert_triggered"));
    }
}
