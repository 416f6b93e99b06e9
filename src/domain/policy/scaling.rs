use chrono::{DateTime, Utc};

use super::Decision;
use crate::domain::entities::{Action, ControlState, Signal, SignalStatus};
use crate::domain::value_objects::PolicyConfig;

/// Hysteresis scaling with cooldown.
///
/// Grows by one unit above `scale_up_threshold`, shrinks by one unit below
/// `scale_down_threshold`, holds inside the band. The mandatory gap between
/// the two thresholds is what prevents single-step flapping around one
/// boundary value. Both directions honor the cooldown since the last
/// *successful* action.
pub(super) fn decide(
    mut state: ControlState,
    signal: &Signal,
    config: &PolicyConfig,
    now: DateTime<Utc>,
) -> Decision {
    // Lazily created entries carry no unit count yet; start at the floor.
    // `validate` guarantees 1 <= min_units <= max_units, so the clamp can
    // never disagree with the `wants_down` bound below.
    if state.current_units == 0 {
        state.current_units = config.min_units;
    }
    state.current_units = state.current_units.clamp(config.min_units, config.max_units);

    if signal.status == SignalStatus::Unknown {
        return Decision::noop(state);
    }

    let units = state.current_units;
    let wants_up = signal.value > f64::from(config.scale_up_threshold) && units < config.max_units;
    let wants_down =
        signal.value < f64::from(config.scale_down_threshold) && units > config.min_units;

    if !(wants_up || wants_down) {
        return Decision::noop(state);
    }
    if !state.cooldown_elapsed(now, config.cooldown_seconds) {
        return Decision::noop(state);
    }

    let action = if wants_up {
        Action::ScaleTo(units + 1)
    } else {
        Action::ScaleTo(units - 1)
    };

    Decision {
        action,
        state,
        alert: None,
    }
}
