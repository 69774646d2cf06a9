//! Email provider seam and configuration.
//!
//! Every backend implements [`EmailProvider`]. Which one is used is chosen
//! by `EMAIL_PROVIDER` (see [`EmailConfig::from_env`]); the
//! [`ProviderRegistry`](super::registry::ProviderRegistry) builds and caches
//! the instances.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The provider's HTTP API could not be reached.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider's HTTP API rejected the message.
    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    /// The selected provider is missing required settings.
    #[error("{provider} is not configured: {reason}")]
    NotConfigured {
        provider: ProviderKind,
        reason: String,
    },

    /// A template could not be rendered from the supplied data.
    #[error("Template error: {0}")]
    Template(String),

    #[error("No recipients")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// The supported email backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Logs messages instead of sending them.
    Console,
    SendGrid,
    MailerSend,
    /// Amazon SES through its SMTP interface.
    Ses,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Console => "console",
            ProviderKind::SendGrid => "sendgrid",
            ProviderKind::MailerSend => "mailersend",
            ProviderKind::Ses => "ses",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(ProviderKind::Console),
            "sendgrid" => Ok(ProviderKind::SendGrid),
            "mailersend" => Ok(ProviderKind::MailerSend),
            "ses" => Ok(ProviderKind::Ses),
            other => Err(format!("Unknown email provider: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port for SES (STARTTLS).
const DEFAULT_SES_SMTP_PORT: u16 = 587;

/// Default sender address when `EMAIL_FROM_ADDRESS` is not set.
const DEFAULT_FROM_ADDRESS: &str = "alerts@healthmesh.local";

/// Default sender display name when `EMAIL_FROM_NAME` is not set.
const DEFAULT_FROM_NAME: &str = "Healthmesh Alerts";

/// Configuration for every email provider.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// The provider used by [`EmailService`](crate::EmailService).
    pub provider: ProviderKind,
    pub from_address: String,
    pub from_name: String,
    pub sendgrid_api_key: Option<String>,
    pub mailersend_api_key: Option<String>,
    pub ses_smtp_host: Option<String>,
    pub ses_smtp_port: u16,
    pub ses_smtp_username: Option<String>,
    pub ses_smtp_password: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Console,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            sendgrid_api_key: None,
            mailersend_api_key: None,
            ses_smtp_host: None,
            ses_smtp_port: DEFAULT_SES_SMTP_PORT,
            ses_smtp_username: None,
            ses_smtp_password: None,
        }
    }
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// An unknown `EMAIL_PROVIDER` falls back to `console` with a warning.
    ///
    /// | Variable             | Required      | Default                    |
    /// |----------------------|---------------|----------------------------|
    /// | `EMAIL_PROVIDER`     | no            | `console`                  |
    /// | `EMAIL_FROM_ADDRESS` | no            | `alerts@healthmesh.local`  |
    /// | `EMAIL_FROM_NAME`    | no            | `Healthmesh Alerts`        |
    /// | `SENDGRID_API_KEY`   | for sendgrid  | -                          |
    /// | `MAILERSEND_API_KEY` | for mailersend| -                          |
    /// | `SES_SMTP_HOST`      | for ses       | -                          |
    /// | `SES_SMTP_PORT`      | no            | `587`                      |
    /// | `SES_SMTP_USERNAME`  | for ses       | -                          |
    /// | `SES_SMTP_PASSWORD`  | for ses       | -                          |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match non_empty("EMAIL_PROVIDER") {
            None => ProviderKind::Console,
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Falling back to console email provider");
                ProviderKind::Console
            }),
        };

        Self {
            provider,
            from_address: non_empty("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            from_name: non_empty("EMAIL_FROM_NAME")
                .unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            sendgrid_api_key: non_empty("SENDGRID_API_KEY"),
            mailersend_api_key: non_empty("MAILERSEND_API_KEY"),
            ses_smtp_host: non_empty("SES_SMTP_HOST"),
            ses_smtp_port: non_empty("SES_SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SES_SMTP_PORT),
            ses_smtp_username: non_empty("SES_SMTP_USERNAME"),
            ses_smtp_password: non_empty("SES_SMTP_PASSWORD"),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider seam
// ---------------------------------------------------------------------------

/// A fully rendered message addressed to one or more recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from_address: String,
    pub from_name: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// An email backend.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Send `message`, returning the provider's message id when it reports one.
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
