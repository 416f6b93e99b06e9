use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::entities::AlertProposal;
use crate::domain::ports::notifier::{NotificationError, Notifier};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts alerts to a Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
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
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        let payload = json!({
            "text": format!(
                "{} *{}*\n{}",
                alert.severity.emoji(),
                alert.title,
                alert.body
            ),
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("slack: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "slack HTTP {}",
                response.status()
            )))
        }
    }
}
