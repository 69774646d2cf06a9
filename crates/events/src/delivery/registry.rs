//! Per-kind cache of email provider instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use super::email::{EmailConfig, EmailError, EmailProvider, ProviderKind};
use super::providers::{ConsoleProvider, MailerSendProvider, SendGridProvider, SesProvider};

/// HTTP request timeout for a single provider API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds providers from one [`EmailConfig`] and keeps one instance per kind.
///
/// Constructed once at start-up and shared through `Arc`.
pub struct ProviderRegistry {
    config: EmailConfig,
    client: reqwest::Client,
    providers: RwLock<HashMap<ProviderKind, Arc<dyn EmailProvider>>>,
}

impl ProviderRegistry {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            config,
            client,
            providers: RwLock::new(HashMap::new()),
        })
    }

    /// Register a ready-made provider under its own kind, replacing any
    /// cached instance.
    pub fn with_provider(mut self, provider: Arc<dyn EmailProvider>) -> Self {
        self.providers.get_mut().insert(provider.kind(), provider);
        self
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// The provider selected by configuration.
    pub async fn default_provider(&self) -> Result<Arc<dyn EmailProvider>, EmailError> {
        self.get(self.config.provider).await
    }

    /// The cached provider for `kind`, building it on first use.
    pub async fn get(&self, kind: ProviderKind) -> Result<Arc<dyn EmailProvider>, EmailError> {
        if let Some(provider) = self.providers.read().await.get(&kind) {
            return Ok(Arc::clone(provider));
        }

        let mut providers = self.providers.write().await;
        // Another task may have built it while we waited for the write lock.
        if let Some(provider) = providers.get(&kind) {
            return Ok(Arc::clone(provider));
        }
        let provider = self.build(kind)?;
        tracing::debug!(provider = %kind, "Email provider initialised");
        providers.insert(kind, Arc::clone(&provider));
        Ok(provider)
    }

    fn build(&self, kind: ProviderKind) -> Result<Arc<dyn EmailProvider>, EmailError> {
        let missing = |reason: &str| EmailError::NotConfigured {
            provider: kind,
            reason: reason.to_string(),
        };

        Ok(match kind {
            ProviderKind::Console => Arc::new(ConsoleProvider),
            ProviderKind::SendGrid => {
                let key = self
                    .config
                    .sendgrid_api_key
                    .clone()
                    .ok_or_else(|| missing("SENDGRID_API_KEY is not set"))?;
                Arc::new(SendGridProvider::new(self.client.clone(), key))
            }
            ProviderKind::MailerSend => {
                let key = self
                    .config
                    .mailersend_api_key
                    .clone()
                    .ok_or_else(|| missing("MAILERSEND_API_KEY is not set"))?;
                Arc::new(MailerSendProvider::new(self.client.clone(), key))
            }
            ProviderKind::Ses => {
                let host = self
                    .config
                    .ses_smtp_host
                    .clone()
                    .ok_or_else(|| missing("SES_SMTP_HOST is not set"))?;
                let username = self
                    .config
                    .ses_smtp_username
                    .clone()
                    .ok_or_else(|| missing("SES_SMTP_USERNAME is not set"))?;
                let password = self
                    .config
                    .ses_smtp_password
                    .clone()
                    .ok_or_else(|| missing("SES_SMTP_PASSWORD is not set"))?;
                Arc::new(SesProvider::new(
                    host,
                    self.config.ses_smtp_port,
                    username,
                    password,
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn caches_one_instance_per_kind() {
        let registry = ProviderRegistry::new(EmailConfig::default()).unwrap();
        let first = registry.default_provider().await.unwrap();
        let second = registry.get(ProviderKind::Console).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.kind(), ProviderKind::Console);
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let registry = ProviderRegistry::new(EmailConfig::default()).unwrap();
        assert_matches!(
            registry.get(ProviderKind::SendGrid).await.err(),
            Some(EmailError::NotConfigured { provider: ProviderKind::SendGrid, .. })
        );
        assert_matches!(
            registry.get(ProviderKind::Ses).await.err(),
            Some(EmailError::NotConfigured { provider: ProviderKind::Ses, .. })
        );
    }

    #[tokio::test]
    async fn builds_configured_http_provider() {
        let config = EmailConfig {
            provider: ProviderKind::MailerSend,
            mailersend_api_key: Some("mlsn.key".into()),
            ..EmailConfig::default()
        };
        let registry = ProviderRegistry::new(config).unwrap();
        let provider = registry.default_provider().await.unwrap();
        assert_eq!(provider.kind(), ProviderKind::MailerSend);
    }

    #[tokio::test]
    async fn registered_provider_takes_precedence() {
        let console: Arc<dyn EmailProvider> = Arc::new(ConsoleProvider);
        let registry = ProviderRegistry::new(EmailConfig::default())
            .unwrap()
            .with_provider(Arc::clone(&console));
        let resolved = registry.default_provider().await.unwrap();
        assert!(Arc::ptr_eq(&console, &resolved));
    }
}
