use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::entities::AlertProposal;
use crate::domain::ports::notifier::{NotificationError, Notifier};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// Discord caps message content at 2000 characters.
const MAX_CONTENT_LEN: usize = 2000;

/// Posts alerts to a Discord webhook.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized.
    pub fn new(webhook_url: String) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("http client init: {e}"))
            })?;
        Ok(Self {
            client,
            webhook_url,
        })
    }

    fn format_content(alert: &AlertProposal) -> String {
        let mut content = format!(
            "{} **{}**\n{}",
            alert.severity.emoji(),
            alert.title,
            alert.body
        );
        if content.len() > MAX_CONTENT_LEN {
            let mut cut = MAX_CONTENT_LEN;
            while !content.is_char_boundary(cut) {
                cut -= 1;
            }
            content.truncate(cut);
        }
        content
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        let payload = json!({ "content": Self::format_content(alert) });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("discord: {e}")))?;

        // Discord webhooks answer 204 No Content on success.
        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "discord HTTP {}",
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
    fn long_body_is_truncated_to_discord_limit() {
        let alert = AlertProposal::notice("k", "title", "x".repeat(3000));
        let content = DiscordNotifier::format_content(&alert);
        assert!(content.len() <= MAX_CONTENT_LEN);
    }
}
