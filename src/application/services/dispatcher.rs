use chrono::{DateTime, Utc};

use crate::domain::entities::{AlertKind, AlertProposal, ControlState};
use crate::domain::ports::notifier::{ChannelResult, Notifier};

/// Fans alerts out to the configured channels with dedup.
///
/// Dedup happens before any transport call: a suppressed alert touches no
/// channel at all. Channels are attempted independently; one failure never
/// blocks the others, and every per-channel outcome is reported back.
///
/// The dispatcher is the only writer of `last_alert_at` and
/// `last_recovered_at` on `ControlState`.
pub struct AlertDispatcher {
    channels: Vec<Box<dyn Notifier>>,
    dedup_window_seconds: u32,
}

impl AlertDispatcher {
    #[must_use]
    pub fn new(channels: Vec<Box<dyn Notifier>>, dedup_window_seconds: u32) -> Self {
        Self {
            channels,
            dedup_window_seconds,
        }
    }

    /// Dispatch a policy-proposed alert, honoring dedup rules.
    ///
    /// Failure and notice alerts are suppressed inside the dedup window.
    /// A recovered notification only goes out if the episode actually
    /// alerted (`last_alert_at` set); sending it closes the episode so the
    /// next one can alert again.
    ///
    /// An empty result means the alert was suppressed without any
    /// transport call.
    pub async fn maybe_alert(
        &self,
        state: &mut ControlState,
        alert: &AlertProposal,
        now: DateTime<Utc>,
    ) -> Vec<ChannelResult> {
        match alert.kind {
            AlertKind::Failure | AlertKind::Notice => {
                if state.within_dedup_window(now, self.dedup_window_seconds) {
                    tracing::debug!("alert '{}' suppressed by dedup window", alert.dedup_key);
                    return Vec::new();
                }
                let results = self.fan_out(alert).await;
                // Only a delivered alert arms the dedup window; if every
                // channel failed the next cycle retries.
                if results.iter().any(|r| r.success) {
                    state.last_alert_at = Some(now);
                }
                results
            }
            AlertKind::Recovered => {
                if state.last_alert_at.is_none() {
                    tracing::debug!(
                        "recovered notification for '{}' suppressed: episode never alerted",
                        alert.dedup_key
                    );
                    return Vec::new();
                }
                let results = self.fan_out(alert).await;
                if results.iter().any(|r| r.success) {
                    state.last_recovered_at = Some(now);
                    state.last_alert_at = None;
                }
                results
            }
        }
    }

    /// Send without dedup, used for action confirmations and the standalone
    /// `notify` command.
    pub async fn announce(&self, alert: &AlertProposal) -> Vec<ChannelResult> {
        self.fan_out(alert).await
    }

    async fn fan_out(&self, alert: &AlertProposal) -> Vec<ChannelResult> {
        let mut results = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let result = match channel.send(alert).await {
                Ok(()) => ChannelResult {
                    channel: channel.name(),
                    success: true,
                    detail: "sent".to_string(),
                },
                Err(e) => {
                    tracing::warn!("channel {} failed: {e}", channel.name());
                    ChannelResult {
                        channel: channel.name(),
                        success: false,
                        detail: e.to_string(),
                    }
                }
            };
            results.push(result);
        }
        results
    }
}
