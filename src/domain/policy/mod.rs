pub mod ban;
pub mod certificate;
pub mod health;
pub mod scaling;

use chrono::{DateTime, Utc};

use crate::domain::entities::{Action, AlertProposal, ControlState, Signal, Target, TargetKind};
use crate::domain::value_objects::PolicyConfig;

/// Outcome of evaluating one target: a proposed action, the updated state
/// (streaks and bookkeeping the policy owns), and at most one alert.
///
/// The policy never writes `last_action_at`, `last_alert_at` or
/// `last_recovered_at`; those belong to the executor commit step and the
/// dispatcher respectively.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub state: ControlState,
    pub alert: Option<AlertProposal>,
}

impl Decision {
    fn noop(state: ControlState) -> Self {
        Self {
            action: Action::NoOp,
            state,
            alert: None,
        }
    }
}

/// Pure decision function: `(state, signal, config) → Decision`. No I/O,
/// no hidden clock; `now` is passed in so cycles are reproducible in tests.
///
/// One rule family is active per target kind; they never compete for the
/// same action slot.
#[must_use]
pub fn decide(
    target: &Target,
    state: &ControlState,
    signal: &Signal,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> Decision {
    let mut state = state.clone();
    state.last_seen = Some(now);

    match &target.kind {
        TargetKind::Service { .. } => scaling::decide(state, signal, config, now),
        TargetKind::Endpoint { .. } => health::decide(&target.id, state, signal, config),
        TargetKind::IpSource { ip, .. } => ban::decide(ip, &target.id, state, signal, config),
        TargetKind::Certificate { domain } => {
            certificate::decide(domain, &target.id, state, signal, config, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MetricKind, SignalStatus};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap_or_default()
    }

    #[test]
    fn decide_always_updates_last_seen() {
        let target = Target::service("app");
        let signal = Signal::new(
            &target.id,
            MetricKind::Utilization,
            50.0,
            SignalStatus::Ok,
            at(0),
        );
        let decision = decide(
            &target,
            &ControlState::with_units(1),
            &signal,
            &PolicyConfig::default(),
            at(0),
        );
        assert_eq!(decision.state.last_seen, Some(at(0)));
    }

    #[test]
    fn families_do_not_cross_over() {
        // A Down endpoint must never produce a scaling action.
        let target = Target::endpoint("http://localhost:3000/health");
        let signal = Signal::new(&target.id, MetricKind::Health, 0.0, SignalStatus::Down, at(0));
        let decision = decide(
            &target,
            &ControlState::default(),
            &signal,
            &PolicyConfig::default(),
            at(0),
        );
        assert_eq!(decision.action, Action::NoOp);
        assert_eq!(decision.state.consecutive_failures, 1);
    }
}
