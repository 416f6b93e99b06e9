use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health classification of an observation. `Down` is a property of the
/// monitored target, never a local error; local collection faults surface
/// as `SourceError` and skip the target for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Ok,
    Degraded,
    Down,
    Unknown,
}

impl SignalStatus {
    /// Anything that is not an explicit `Ok` counts toward the failure streak.
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// What `value` measures for a given target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Resource utilization percent (max of CPU and memory).
    Utilization,
    /// Endpoint liveness; value is response latency in milliseconds.
    Health,
    /// Count of failed authentication attempts attributed to an IP.
    FailedLogins,
    /// Days until a certificate expires (negative once expired).
    CertDaysLeft,
}

/// One fresh observation of a target. Produced each cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub target_id: String,
    pub metric_kind: MetricKind,
    pub value: f64,
    pub status: SignalStatus,
    pub observed_at: DateTime<Utc>,
}

impl Signal {
    #[must_use]
    pub fn new(
        target_id: &str,
        metric_kind: MetricKind,
        value: f64,
        status: SignalStatus,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target_id: target_id.to_string(),
            metric_kind,
            value,
            status,
            observed_at,
        }
    }
}
