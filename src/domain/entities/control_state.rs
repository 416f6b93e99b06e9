use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted per-target control state, keyed by target id.
///
/// Created lazily on first observation of a target. Every field defaults on
/// load so documents written by older versions stay readable. Timestamps are
/// ISO-8601 in JSON (chrono serde).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Current unit count for scaling targets.
    #[serde(default)]
    pub current_units: u32,
    /// Consecutive non-OK observations; reset on the first OK.
    #[serde(default)]
    pub consecutive_failures: u32,
    /// When the last successful action on this target completed.
    /// Written only by the executor commit step, never on failure,
    /// so the cooldown clock never starts for an action that did not land.
    #[serde(default)]
    pub last_action_at: Option<DateTime<Utc>>,
    /// When the last failure alert for this target was sent.
    #[serde(default)]
    pub last_alert_at: Option<DateTime<Utc>>,
    /// When the last "recovered" notification was sent.
    #[serde(default)]
    pub last_recovered_at: Option<DateTime<Utc>>,
    /// When this IP was banned, if it currently is.
    #[serde(default)]
    pub banned_at: Option<DateTime<Utc>>,
    /// Last time any cycle observed this target; drives eviction.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

/// The full persisted map.
pub type StateMap = BTreeMap<String, ControlState>;

impl ControlState {
    /// Initial state for a scaling target, starting at the configured floor.
    #[must_use]
    pub fn with_units(units: u32) -> Self {
        Self {
            current_units: units,
            ..Self::default()
        }
    }

    /// True if the cooldown window has elapsed since the last successful
    /// action. A target that never acted is always allowed to act.
    #[must_use]
    pub fn cooldown_elapsed(&self, now: DateTime<Utc>, cooldown_seconds: u32) -> bool {
        self.last_action_at.map_or(true, |t| {
            now - t >= Duration::seconds(i64::from(cooldown_seconds))
        })
    }

    /// True if a failure alert within the dedup window suppresses re-alerting.
    #[must_use]
    pub fn within_dedup_window(&self, now: DateTime<Utc>, window_seconds: u32) -> bool {
        self.last_alert_at
            .is_some_and(|t| now - t < Duration::seconds(i64::from(window_seconds)))
    }

    /// True if this entry has not been observed for longer than the
    /// retention period and should be evicted on save. An entry with an
    /// active ban is never stale: evicting it would lose the unban.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, retention_days: u32) -> bool {
        self.banned_at.is_none()
            && self
                .last_seen
                .is_some_and(|t| now - t > Duration::days(i64::from(retention_days)))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn cooldown_allows_first_action() {
        let state = ControlState::default();
        assert!(state.cooldown_elapsed(at(0), 300));
    }

    #[test]
    fn cooldown_blocks_within_window() {
        let state = ControlState {
            last_action_at: Some(at(0)),
            ..ControlState::default()
        };
        assert!(!state.cooldown_elapsed(at(299), 300));
        assert!(state.cooldown_elapsed(at(300), 300));
    }

    #[test]
    fn dedup_window_suppresses_until_elapsed() {
        let state = ControlState {
            last_alert_at: Some(at(0)),
            ..ControlState::default()
        };
        assert!(state.within_dedup_window(at(3599), 3600));
        assert!(!state.within_dedup_window(at(3600), 3600));
    }

    #[test]
    fn never_seen_entry_is_not_stale() {
        let state = ControlState::default();
        assert!(!state.is_stale(at(0), 30));
    }

    #[test]
    fn stale_after_retention_days() {
        let state = ControlState {
            last_seen: Some(at(0)),
            ..ControlState::default()
        };
        assert!(!state.is_stale(at(29 * 86_400), 30));
        assert!(state.is_stale(at(31 * 86_400), 30));
    }

    #[test]
    fn actively_banned_entry_is_never_stale() {
        let state = ControlState {
            last_seen: Some(at(0)),
            banned_at: Some(at(0)),
            ..ControlState::default()
        };
        assert!(!state.is_stale(at(100 * 86_400), 30));
    }

    #[test]
    fn missing_json_keys_are_defaulted() {
        let state: ControlState = serde_json::from_str("{\"current_units\": 2}").expect("parse");
        assert_eq!(state.current_units, 2);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_action_at.is_none());
        assert!(state.banned_at.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let state = ControlState {
            current_units: 3,
            consecutive_failures: 1,
            last_action_at: Some(at(10)),
            last_alert_at: None,
            last_recovered_at: None,
            banned_at: Some(at(20)),
            last_seen: Some(at(30)),
        };
        let json = serde_json::to_string(&state).expect("serialize");
        let back: ControlState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(state, back);
    }
}
