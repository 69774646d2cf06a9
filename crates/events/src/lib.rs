//! Healthmesh notification infrastructure.
//!
//! - [`delivery`]: email providers (console, SendGrid, MailerSend, SES), the
//!   cached [`ProviderRegistry`] and the template contract.
//! - [`EmailService`]: renders a template and sends it through the
//!   configured provider.
//! - [`NotificationDispatcher`]: fans an alert out to its channels
//!   concurrently and collects one [`ChannelResult`] per channel.

pub mod delivery;
pub mod dispatcher;
pub mod service;

pub use delivery::email::{EmailConfig, EmailError, EmailMessage, EmailProvider, ProviderKind};
pub use delivery::registry::ProviderRegistry;
pub use delivery::templates::{EmailTemplate, RenderedEmail};
pub use dispatcher::{
    AlertNotice, ChannelResult, DispatchError, EmailChannel, InAppChannel, NotificationChannel,
    NotificationDispatcher, Recipients,
};
pub use service::{EmailSendResult, EmailService};
