use anyhow::bail;
use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::AlertDispatcher;
use crate::domain::entities::AlertProposal;
use crate::infrastructure::notifications::build_channels;

/// Sends an ad-hoc message through the configured channels, reporting the
/// per-channel outcome. Dedup does not apply to manual messages.
///
/// # Errors
///
/// Returns an error if a requested channel is not configured.
pub async fn run_notify(
    config: &AppConfig,
    message: &str,
    channel: Option<&str>,
    title: Option<&str>,
) -> anyhow::Result<i32> {
    let mut channels = build_channels(&config.notifications);
    if let Some(wanted) = channel {
        channels.retain(|c| c.name() == wanted);
        if channels.is_empty() {
            bail!("channel `{wanted}` is not configured");
        }
    }

    let dispatcher = AlertDispatcher::new(channels, config.alerts.dedup_window_seconds);
    let alert = AlertProposal::notice(
        "manual",
        title.unwrap_or("vigia"),
        message.to_string(),
    );
    let results = dispatcher.announce(&alert).await;

    let mut any_ok = false;
    for result in &results {
        if result.success {
            any_ok = true;
            println!("  {} {}", "sent".green(), result.channel);
        } else {
            println!("  {} {} ({})", "failed".red().bold(), result.channel, result.detail);
        }
    }
    Ok(i32::from(!any_ok))
}
