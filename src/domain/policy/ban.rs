use chrono::{DateTime, Duration, Utc};

use super::Decision;
use crate::domain::entities::{Action, AlertProposal, ControlState, Signal, StateMap};
use crate::domain::value_objects::PolicyConfig;

/// Ban escalation.
///
/// An IP reaching `max_attempts` failed logins is banned once; re-detecting
/// a still-failing, already-banned source is a no-op, not a repeated ban.
/// `banned_at` is only written by the executor commit step, so a failed
/// firewall call leaves the IP unbanned and the next cycle retries.
pub(super) fn decide(
    ip: &str,
    target_id: &str,
    state: ControlState,
    signal: &Signal,
    config: &PolicyConfig,
) -> Decision {
    if state.banned_at.is_some() {
        // Expiry is the sweep's job.
        return Decision::noop(state);
    }

    #[allow(clippy::cast_precision_loss)]
    if signal.value < config.max_attempts as f64 {
        return Decision::noop(state);
    }

    let attempts = signal.value;
    Decision {
        action: Action::Ban {
            ip: ip.to_string(),
            duration_seconds: config.ban_duration_seconds,
        },
        state,
        alert: Some(AlertProposal::failure(
            target_id,
            "Brute force attack detected",
            format!("{ip} reached {attempts:.0} failed login attempt(s); banning"),
        )),
    }
}

/// Periodic sweep producing an `Unban` for every ban older than the
/// configured duration. Run at the start of each cycle.
#[must_use]
pub fn sweep_expired(
    states: &StateMap,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> Vec<(String, Action)> {
    let duration = Duration::seconds(i64::from(config.ban_duration_seconds));
    states
        .iter()
        .filter_map(|(id, state)| {
            let banned_at = state.banned_at?;
            let ip = id.strip_prefix("ip:")?;
            (now - banned_at > duration).then(|| {
                (
                    id.clone(),
                    Action::Unban {
                        ip: ip.to_string(),
                    },
                )
            })
        })
        .collect()
}
