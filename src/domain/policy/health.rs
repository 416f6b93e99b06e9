use super::Decision;
use crate::domain::entities::{Action, AlertProposal, ControlState, Signal};
use crate::domain::value_objects::PolicyConfig;

/// Failure-streak alerting.
///
/// The streak grows on any non-OK observation and resets on the first OK.
/// An alert is proposed from the moment the streak reaches the threshold;
/// the dispatcher's dedup window keeps it from re-firing every cycle. Going
/// back to OK after an alerted episode proposes exactly one "recovered"
/// notification.
pub(super) fn decide(
    target_id: &str,
    mut state: ControlState,
    signal: &Signal,
    config: &PolicyConfig,
) -> Decision {
    if signal.status.is_ok() {
        let streak = state.consecutive_failures;
        state.consecutive_failures = 0;

        // Recovered fires only if the episode actually alerted; the
        // dispatcher checks `last_alert_at` and clears it on send.
        let alert = if streak >= config.failure_alert_threshold {
            Some(AlertProposal::recovered(
                target_id,
                "Target recovered",
                format!("{target_id} is healthy again after {streak} failed check(s)"),
            ))
        } else {
            None
        };
        return Decision {
            action: Action::NoOp,
            state,
            alert,
        };
    }

    state.consecutive_failures = state.consecutive_failures.saturating_add(1);

    let alert = if state.consecutive_failures >= config.failure_alert_threshold {
        Some(AlertProposal::failure(
            target_id,
            "Health check failing",
            format!(
                "{target_id} is {:?} ({} consecutive failed check(s))",
                signal.status, state.consecutive_failures
            ),
        ))
    } else {
        None
    };

    Decision {
        action: Action::NoOp,
        state,
        alert,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{AlertKind, MetricKind, SignalStatus};
    use chrono::{TimeZone, Utc};

    fn signal(status: SignalStatus) -> Signal {
        let now = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp");
        Signal::new("endpoint:x", MetricKind::Health, 0.0, status, now)
    }

    fn config() -> PolicyConfig {
        PolicyConfig::default() // failure_alert_threshold 3
    }

    #[test]
    fn streak_grows_on_any_non_ok_status() {
        for status in [SignalStatus::Down, SignalStatus::Degraded, SignalStatus::Unknown] {
            let decision = decide("endpoint:x", ControlState::default(), &signal(status), &config());
            assert_eq!(decision.state.consecutive_failures, 1, "{status:?}");
        }
    }

    #[test]
    fn no_alert_below_threshold() {
        let state = ControlState {
            consecutive_failures: 1,
            ..ControlState::default()
        };
        let decision = decide("endpoint:x", state, &signal(SignalStatus::Down), &config());
        assert_eq!(decision.state.consecutive_failures, 2);
        assert!(decision.alert.is_none());
    }

    #[test]
    fn alert_proposed_at_threshold() {
        let state = ControlState {
            consecutive_failures: 2,
            ..ControlState::default()
        };
        let decision = decide("endpoint:x", state, &signal(SignalStatus::Down), &config());
        assert_eq!(decision.state.consecutive_failures, 3);
        let alert = decision.alert.expect("alert at threshold");
        assert_eq!(alert.kind, AlertKind::Failure);
        assert_eq!(alert.dedup_key, "endpoint:x");
    }

    #[test]
    fn alert_still_proposed_past_threshold() {
        // Dedup is the dispatcher's job, not the policy's.
        let state = ControlState {
            consecutive_failures: 7,
            ..ControlState::default()
        };
        let decision = decide("endpoint:x", state, &signal(SignalStatus::Down), &config());
        assert!(decision.alert.is_some());
    }

    #[test]
    fn ok_resets_streak_without_recovery_below_threshold() {
        let state = ControlState {
            consecutive_failures: 2,
            ..ControlState::default()
        };
        let decision = decide("endpoint:x", state, &signal(SignalStatus::Ok), &config());
        assert_eq!(decision.state.consecutive_failures, 0);
        assert!(decision.alert.is_none());
    }

    #[test]
    fn ok_after_alerted_episode_proposes_recovered() {
        let state = ControlState {
            consecutive_failures: 4,
            ..ControlState::default()
        };
        let decision = decide("endpoint:x", state, &signal(SignalStatus::Ok), &config());
        assert_eq!(decision.state.consecutive_failures, 0);
        let alert = decision.alert.expect("recovered notification");
        assert_eq!(alert.kind, AlertKind::Recovered);
    }

    #[test]
    fn health_family_never_proposes_actions() {
        let decision = decide(
            "endpoint:x",
            ControlState::default(),
            &signal(SignalStatus::Down),
            &config(),
        );
        assert_eq!(decision.action, Action::NoOp);
    }
}
