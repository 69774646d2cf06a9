//! Well-known notification channel names.
//!
//! These are the values accepted in `alert_rules.notification_channels`.

/// In-app notification inbox.
pub const CHANNEL_IN_APP: &str = "in_app";

/// Email via the configured provider.
pub const CHANNEL_EMAIL: &str = "email";

/// Every channel an alert rule may reference.
pub const KNOWN_CHANNELS: [&str; 2] = [CHANNEL_IN_APP, CHANNEL_EMAIL];

/// Whether `channel` is one of [`KNOWN_CHANNELS`].
pub fn is_known_channel(channel: &str) -> bool {
    KNOWN_CHANNELS.contains(&channel)
}
