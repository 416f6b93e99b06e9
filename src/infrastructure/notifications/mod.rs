pub mod discord;
pub mod email;
pub mod slack;
pub mod telegram;
pub mod terminal;

pub use discord::DiscordNotifier;
pub use email::EmailNotifier;
pub use slack::SlackNotifier;
pub use telegram::TelegramNotifier;
pub use terminal::TerminalNotifier;

use tracing::warn;

use crate::application::config::NotificationConfig;
use crate::domain::ports::notifier::Notifier;

/// Builds the channel set from configuration. A channel whose client fails
/// to initialize is skipped with a warning rather than aborting startup;
/// with nothing configured the terminal channel is always present.
#[must_use]
pub fn build_channels(config: &NotificationConfig) -> Vec<Box<dyn Notifier>> {
    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

    if config.terminal {
        channels.push(Box::new(TerminalNotifier::new()));
    }

    if let Some(telegram) = &config.telegram {
        match TelegramNotifier::new(telegram.bot_token.clone(), telegram.chat_id.clone()) {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => warn!("skipping telegram channel: {e}"),
        }
    }

    if let Some(slack) = &config.slack {
        match SlackNotifier::new(slack.webhook_url.clone()) {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => warn!("skipping slack channel: {e}"),
        }
    }

    if let Some(discord) = &config.discord {
        match DiscordNotifier::new(discord.webhook_url.clone()) {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => warn!("skipping discord channel: {e}"),
        }
    }

    if let Some(email) = &config.email {
        match EmailNotifier::new(email) {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => warn!("skipping email channel: {e}"),
        }
    }

    if channels.is_empty() {
        channels.push(Box::new(TerminalNotifier::new()));
    }

    channels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::{NotificationConfig, TelegramConfig, WebhookConfig};

    #[test]
    fn default_config_yields_terminal_only() {
        let channels = build_channels(&NotificationConfig::default());
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name(), "terminal");
    }

    #[test]
    fn configured_channels_are_all_built() {
        let config = NotificationConfig {
            terminal: true,
            telegram: Some(TelegramConfig {
                bot_token: "123:abc".into(),
                chat_id: "42".into(),
            }),
            slack: Some(WebhookConfig {
                webhook_url: "https://hooks.slack.com/services/T/B/X".into(),
            }),
            discord: Some(WebhookConfig {
                webhook_url: "https://discord.com/api/webhooks/1/x".into(),
            }),
            email: None,
        };
        let names: Vec<_> = build_channels(&config).iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["terminal", "telegram", "slack", "discord"]);
    }

    #[test]
    fn disabling_terminal_still_leaves_a_channel() {
        let config = NotificationConfig {
            terminal: false,
            ..NotificationConfig::default()
        };
        let channels = build_channels(&config);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name(), "terminal");
    }
}
