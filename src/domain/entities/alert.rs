use crate::domain::value_objects::severity::Severity;

/// What kind of notification the policy proposed. Dedup rules differ:
/// failure and notice alerts are suppressed inside the dedup window,
/// a recovered notification fires at most once per failure episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Failure,
    Recovered,
    Notice,
}

/// An alert proposed by the policy for one target. The dispatcher decides
/// whether it actually goes out (dedup) and to which channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertProposal {
    pub kind: AlertKind,
    pub severity: Severity,
    pub dedup_key: String,
    pub title: String,
    pub body: String,
}

impl AlertProposal {
    #[must_use]
    pub fn failure(dedup_key: &str, title: &str, body: String) -> Self {
        Self {
            kind: AlertKind::Failure,
            severity: Severity::Critical,
            dedup_key: dedup_key.to_string(),
            title: title.to_string(),
            body,
        }
    }

    #[must_use]
    pub fn recovered(dedup_key: &str, title: &str, body: String) -> Self {
        Self {
            kind: AlertKind::Recovered,
            severity: Severity::Info,
            dedup_key: dedup_key.to_string(),
            title: title.to_string(),
            body,
        }
    }

    #[must_use]
    pub fn notice(dedup_key: &str, title: &str, body: String) -> Self {
        Self {
            kind: AlertKind::Notice,
            severity: Severity::Warning,
            dedup_key: dedup_key.to_string(),
            title: title.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_severity() {
        let alert = AlertProposal::failure("endpoint:x", "Endpoint down", "3 failed checks".into());
        assert_eq!(alert.kind, AlertKind::Failure);
        assert_eq!(alert.severity, Severity::Critical);

        let alert = AlertProposal::recovered("endpoint:x", "Recovered", String::new());
        assert_eq!(alert.kind, AlertKind::Recovered);
        assert_eq!(alert.severity, Severity::Info);

        let alert = AlertProposal::notice("cert:x", "Expiring soon", String::new());
        assert_eq!(alert.kind, AlertKind::Notice);
        assert_eq!(alert.severity, Severity::Warning);
    }
}
