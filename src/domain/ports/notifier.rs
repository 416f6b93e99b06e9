use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::AlertProposal;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Per-channel delivery outcome, reported back to the caller for every
/// configured channel regardless of siblings' failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelResult {
    pub channel: &'static str,
    pub success: bool,
    pub detail: String,
}

/// One notification transport (Telegram, Slack, Discord, email, terminal).
/// A channel with missing credentials is skipped at config-load time; every
/// constructed notifier is ready to send.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable channel name used in results and logs.
    fn name(&self) -> &'static str;

    /// Deliver the alert on this channel.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if delivery fails; the error never
    /// affects sibling channels.
    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_error_display() {
        let err = NotificationError::SendFailed("smtp timeout".to_string());
        assert_eq!(err.to_string(), "failed to send notification: smtp timeout");

        let err = NotificationError::ChannelUnavailable("telegram".to_string());
        assert_eq!(err.to_string(), "notification channel unavailable: telegram");
    }
}
