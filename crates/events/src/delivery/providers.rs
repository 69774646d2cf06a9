//! Concrete email backends.

use async_trait::async_trait;
use serde_json::json;

use super::email::{EmailError, EmailMessage, EmailProvider, ProviderKind};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const MAILERSEND_SEND_URL: &str = "https://api.mailersend.com/v1/email";

/// Header both HTTP providers use to report the accepted message id.
const MESSAGE_ID_HEADER: &str = "x-message-id";

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Logs each message instead of sending it. The default for development.
#[derive(Debug, Default)]
pub struct ConsoleProvider;

#[async_trait]
impl EmailProvider for ConsoleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Console
    }

    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            body = %message.text_body,
            "Console email provider: message not sent"
        );
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// HTTP providers
// ---------------------------------------------------------------------------

/// SendGrid v3 mail send API.
pub struct SendGridProvider {
    client: reqwest::Client,
    api_key: String,
}

impl SendGridProvider {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn payload(message: &EmailMessage) -> serde_json::Value {
        let to: Vec<_> = message.to.iter().map(|email| json!({ "email": email })).collect();
        json!({
            "personalizations": [{ "to": to }],
            "from": { "email": message.from_address, "name": message.from_name },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.text_body },
                { "type": "text/html", "value": message.html_body },
            ],
        })
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SendGrid
    }

    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        post_json(
            &self.client,
            ProviderKind::SendGrid,
            SENDGRID_SEND_URL,
            &self.api_key,
            &Self::payload(message),
        )
        .await
    }
}

/// MailerSend v1 email API.
pub struct MailerSendProvider {
    client: reqwest::Client,
    api_key: String,
}

impl MailerSendProvider {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn payload(message: &EmailMessage) -> serde_json::Value {
        let to: Vec<_> = message.to.iter().map(|email| json!({ "email": email })).collect();
        json!({
            "from": { "email": message.from_address, "name": message.from_name },
            "to": to,
            "subject": message.subject,
            "text": message.text_body,
            "html": message.html_body,
        })
    }
}

#[async_trait]
impl EmailProvider for MailerSendProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::MailerSend
    }

    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        post_json(
            &self.client,
            ProviderKind::MailerSend,
            MAILERSEND_SEND_URL,
            &self.api_key,
            &Self::payload(message),
        )
        .await
    }
}

/// POST a bearer-authenticated JSON payload and map the response.
async fn post_json(
    client: &reqwest::Client,
    provider: ProviderKind,
    url: &str,
    api_key: &str,
    payload: &serde_json::Value,
) -> Result<Option<String>, EmailError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EmailError::HttpStatus {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    Ok(response
        .headers()
        .get(MESSAGE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string))
}

// ---------------------------------------------------------------------------
// SES (SMTP)
// ---------------------------------------------------------------------------

/// Amazon SES through its SMTP endpoint.
pub struct SesProvider {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SesProvider {
    pub fn new(host: String, port: u16, username: String, password: String) -> Self {
        Self {
            host,
            port,
            username,
            password,
        }
    }

    fn build_message(message: &EmailMessage) -> Result<lettre::Message, EmailError> {
        use lettre::message::{Mailbox, MultiPart};

        let from = Mailbox::new(
            Some(message.from_name.clone()),
            message.from_address.parse()?,
        );
        let mut builder = lettre::Message::builder()
            .from(from)
            .subject(message.subject.clone());
        for recipient in &message.to {
            builder = builder.to(Mailbox::new(None, recipient.parse()?));
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailProvider for SesProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ses
    }

    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        use lettre::{
            transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
            Tokio1Executor,
        };

        let email = Self::build_message(message)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .build();
        mailer.send(email).await?;

        tracing::info!(to = ?message.to, host = %self.host, "Email sent via SES SMTP");
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
