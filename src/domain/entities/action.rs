use std::fmt;

use chrono::{DateTime, Utc};

use super::control_state::ControlState;

/// A corrective action proposed by the policy for one target.
///
/// Scaling carries an absolute unit count, not a delta, so re-applying the
/// same decision after a crash or effector timeout is naturally idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoOp,
    ScaleTo(u32),
    Ban { ip: String, duration_seconds: u32 },
    Unban { ip: String },
    Renew { domain: String },
}

impl Action {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::NoOp
    }

    /// Record a successfully applied action in the target's state.
    ///
    /// This is the single place `last_action_at` and ban bookkeeping are
    /// written. Callers must only invoke it after the effector reported
    /// success; a failed apply leaves the state untouched so the next cycle
    /// reproduces the same decision.
    pub fn commit(&self, state: &mut ControlState, now: DateTime<Utc>) {
        match self {
            Self::NoOp => {}
            Self::ScaleTo(units) => {
                state.current_units = *units;
                state.last_action_at = Some(now);
            }
            Self::Ban { .. } => {
                state.banned_at = Some(now);
                state.last_action_at = Some(now);
            }
            Self::Unban { .. } => {
                state.banned_at = None;
                state.last_action_at = Some(now);
            }
            Self::Renew { .. } => {
                state.last_action_at = Some(now);
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "no-op"),
            Self::ScaleTo(units) => write!(f, "scale to {units} unit(s)"),
            Self::Ban {
                ip,
                duration_seconds,
            } => write!(f, "ban {ip} for {duration_seconds}s"),
            Self::Unban { ip } => write!(f, "unban {ip}"),
            Self::Renew { domain } => write!(f, "renew certificate for {domain}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default()
    }

    #[test]
    fn noop_commit_leaves_state_untouched() {
        let mut state = ControlState::with_units(2);
        Action::NoOp.commit(&mut state, now());
        assert_eq!(state, ControlState::with_units(2));
    }

    #[test]
    fn scale_commit_sets_units_and_clock() {
        let mut state = ControlState::with_units(1);
        Action::ScaleTo(3).commit(&mut state, now());
        assert_eq!(state.current_units, 3);
        assert_eq!(state.last_action_at, Some(now()));
    }

    #[test]
    fn ban_and_unban_commit_toggle_banned_at() {
        let mut state = ControlState::default();
        Action::Ban {
            ip: "203.0.113.7".into(),
            duration_seconds: 86_400,
        }
        .commit(&mut state, now());
        assert_eq!(state.banned_at, Some(now()));

        Action::Unban {
            ip: "203.0.113.7".into(),
        }
        .commit(&mut state, now());
        assert!(state.banned_at.is_none());
        assert_eq!(state.last_action_at, Some(now()));
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Action::ScaleTo(2).to_string(), "scale to 2 unit(s)");
        assert_eq!(
            Action::Renew {
                domain: "example.org".into()
            }
            .to_string(),
            "renew certificate for example.org"
        );
    }
}
