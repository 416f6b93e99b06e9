use std::fmt;

use serde::{Deserialize, Serialize};

/// Urgency of an alert, used for channel formatting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Info => "\u{2705}",     // ✅
            Self::Warning => "\u{26a0}",  // ⚠
            Self::Critical => "\u{1f6a8}", // 🚨
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_urgency() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn display_is_uppercase() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }
}
