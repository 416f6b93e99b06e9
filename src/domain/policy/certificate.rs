use chrono::{DateTime, Utc};

use super::Decision;
use crate::domain::entities::{Action, AlertProposal, ControlState, Signal, SignalStatus};
use crate::domain::value_objects::PolicyConfig;

/// Certificate expiry handling.
///
/// Signal value is days until expiry. Inside `renew_within_days` a renewal
/// is proposed (cooldown-gated like scaling, so a stuck certbot is not
/// hammered every cycle); inside `notify_within_days` a warning goes out.
/// A missing or unreadable certificate is reported but never renewed
/// blindly.
pub(super) fn decide(
    domain: &str,
    target_id: &str,
    state: ControlState,
    signal: &Signal,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> Decision {
    if signal.status == SignalStatus::Unknown {
        return Decision::noop(state);
    }
    if signal.status == SignalStatus::Down {
        // Missing certificate: renewal cannot fix what certbot never issued.
        return Decision {
            action: Action::NoOp,
            state,
            alert: Some(AlertProposal::failure(
                target_id,
                "Certificate missing",
                format!("no readable certificate found for {domain}"),
            )),
        };
    }

    #[allow(clippy::cast_possible_truncation)]
    let days_left = signal.value.floor() as i64;

    if days_left < 0 {
        let action = if state.cooldown_elapsed(now, config.cooldown_seconds) {
            Action::Renew {
                domain: domain.to_string(),
            }
        } else {
            Action::NoOp
        };
        return Decision {
            action,
            state,
            alert: Some(AlertProposal::failure(
                target_id,
                "Certificate expired",
                format!("certificate for {domain} has expired; renewing"),
            )),
        };
    }

    if days_left <= config.renew_within_days {
        let action = if state.cooldown_elapsed(now, config.cooldown_seconds) {
            Action::Renew {
                domain: domain.to_string(),
            }
        } else {
            Action::NoOp
        };
        return Decision {
            action,
            state,
            alert: None,
        };
    }

    if days_left <= config.notify_within_days {
        return Decision {
            action: Action::NoOp,
            state,
            alert: Some(AlertProposal::notice(
                target_id,
                "Certificate expiring soon",
                format!("certificate for {domain} expires in {days_left} day(s)"),
            )),
        };
    }

    Decision::noop(state)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{AlertKind, MetricKind};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().expect("valid timestamp")
    }

    fn days_left(days: f64, status: SignalStatus) -> Signal {
        Signal::new("cert:example.org", MetricKind::CertDaysLeft, days, status, at(0))
    }

    fn config() -> PolicyConfig {
        PolicyConfig::default() // renew_within 7, notify_within 14
    }

    fn run(signal: &Signal, state: ControlState) -> Decision {
        decide("example.org", "cert:example.org", state, signal, &config(), at(0))
    }

    #[test]
    fn healthy_certificate_is_noop() {
        let decision = run(&days_left(60.0, SignalStatus::Ok), ControlState::default());
        assert_eq!(decision.action, Action::NoOp);
        assert!(decision.alert.is_none());
    }

    #[test]
    fn expiring_soon_warns_without_renewing() {
        let decision = run(&days_left(10.0, SignalStatus::Degraded), ControlState::default());
        assert_eq!(decision.action, Action::NoOp);
        let alert = decision.alert.expect("notice");
        assert_eq!(alert.kind, AlertKind::Notice);
    }

    #[test]
    fn inside_renew_window_proposes_renewal() {
        let decision = run(&days_left(7.0, SignalStatus::Degraded), ControlState::default());
        assert_eq!(
            decision.action,
            Action::Renew {
                domain: "example.org".into()
            }
        );
    }

    #[test]
    fn expired_certificate_renews_and_alerts() {
        let decision = run(&days_left(-1.0, SignalStatus::Degraded), ControlState::default());
        assert_eq!(
            decision.action,
            Action::Renew {
                domain: "example.org".into()
            }
        );
        let alert = decision.alert.expect("failure alert");
        assert_eq!(alert.kind, AlertKind::Failure);
    }

    #[test]
    fn renewal_honors_cooldown() {
        let state = ControlState {
            last_action_at: Some(at(0)),
            ..ControlState::default()
        };
        let decision = run(&days_left(3.0, SignalStatus::Degraded), state);
        assert_eq!(decision.action, Action::NoOp);
    }

    #[test]
    fn missing_certificate_alerts_but_never_renews() {
        let decision = run(&days_left(0.0, SignalStatus::Down), ControlState::default());
        assert_eq!(decision.action, Action::NoOp);
        let alert = decision.alert.expect("failure alert");
        assert_eq!(alert.kind, AlertKind::Failure);
    }
}
