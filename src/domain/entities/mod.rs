pub mod action;
pub mod alert;
pub mod control_state;
pub mod signal;
pub mod target;

pub use action::Action;
pub use alert::{AlertKind, AlertProposal};
pub use control_state::{ControlState, StateMap};
pub use signal::{MetricKind, Signal, SignalStatus};
pub use target::{Target, TargetKind};
