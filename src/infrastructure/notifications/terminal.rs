use std::borrow::Cow;

use async_trait::async_trait;
use colored::Colorize;

use crate::domain::entities::AlertProposal;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::severity::Severity;

const SEPARATOR_WIDTH: usize = 70;

/// Prints alerts to stdout. Always succeeds, which makes it the default
/// channel when nothing else is configured.
#[derive(Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);

        println!("\n{}", separator.dimmed());
        println!("{} {}", severity_badge(alert.severity), sanitize(&alert.title).bold());
        println!("{}", separator.dimmed());
        if !alert.body.is_empty() {
            println!("{}", sanitize(&alert.body));
        }
        println!("{}\n", separator.dimmed());
        Ok(())
    }
}

/// Strip ANSI escape sequences and C0/C1 control characters, preserving
/// printable content, newlines, and tabs.
fn sanitize(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
    {
        Cow::Owned(
            s.chars()
                .filter(|&c| !matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[must_use]
fn severity_badge(severity: Severity) -> String {
    match severity {
        Severity::Critical => format!(" {} {} ", severity.emoji(), severity)
            .on_red()
            .white()
            .bold()
            .to_string(),
        Severity::Warning => format!(" {} {} ", severity.emoji(), severity)
            .on_yellow()
            .black()
            .bold()
            .to_string(),
        Severity::Info => format!(" {} {} ", severity.emoji(), severity)
            .on_blue()
            .white()
            .to_string(),
    }
}
