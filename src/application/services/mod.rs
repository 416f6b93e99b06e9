pub mod cycle;
pub mod dispatcher;

pub use cycle::{
    CycleReport, CycleService, ForceScaleOutcome, OutcomeStatus, ScaleDirection, TargetOutcome,
};
pub use dispatcher::AlertDispatcher;
