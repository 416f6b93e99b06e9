use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::entities::AlertProposal;
use crate::domain::ports::notifier::{NotificationError, Notifier};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers alerts through the Telegram Bot API (`sendMessage`).
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("http client init: {e}"))
            })?;
        Ok(Self {
            client,
            bot_token,
            chat_id,
        })
    }

    fn format_message(alert: &AlertProposal) -> String {
        format!(
            "{} *{}*\n\n{}",
            alert.severity.emoji(),
            alert.title,
            alert.body
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": Self::format_message(alert),
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("telegram: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "telegram HTTP {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AlertProposal;

    #[test]
    fn message_carries_severity_badge_and_title() {
        let alert = AlertProposal::failure(
            "health:endpoint:https://example.com/health",
            "Endpoint down",
            "3 consecutive failed probes".into(),
        );
        let msg = TelegramNotifier::format_message(&alert);
        assert!(msg.contains("*Endpoint down*"));
        assert!(msg.contains("3 consecutive failed probes"));
        assert!(msg.starts_with('\u{1f6a8}'));
    }
}
