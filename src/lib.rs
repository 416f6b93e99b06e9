//! vigia — control-loop runner for small server fleets.
//!
//! One invocation runs one decision cycle: observe each configured target,
//! evaluate it against a pure policy (hysteresis, cooldown, failure streaks),
//! apply the resulting action through an idempotent effector, and fan alerts
//! out to the configured notification channels. Small JSON state persisted
//! between invocations makes an external scheduler (cron) the retry loop.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
