use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A config combination rejected before any cycle runs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PolicyConfigError {
    #[error("scale_down_threshold ({down}) must be strictly below scale_up_threshold ({up})")]
    ThresholdsNotOrdered { down: u32, up: u32 },
    #[error("min_units ({min}) must not exceed max_units ({max})")]
    UnitsNotOrdered { min: u32, max: u32 },
    #[error("max_units must be at least 1")]
    ZeroMaxUnits,
    #[error("min_units must be at least 1")]
    ZeroMinUnits,
    #[error("{field} must be non-zero")]
    ZeroWindow { field: &'static str },
}

/// All thresholds, cooldowns and windows the policy reads. Built once at
/// startup from the TOML config, validated, then threaded immutably through
/// every component; never re-read mid-cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Utilization percent above which a scaling target grows.
    pub scale_up_threshold: u32,
    /// Utilization percent below which a scaling target shrinks. The gap to
    /// `scale_up_threshold` is the hysteresis band that prevents flapping.
    pub scale_down_threshold: u32,
    pub min_units: u32,
    pub max_units: u32,
    /// Minimum seconds between two successful actions on one target.
    pub cooldown_seconds: u32,
    /// Consecutive non-OK observations before the first failure alert.
    pub failure_alert_threshold: u32,
    /// Seconds during which a repeated alert with the same key is suppressed.
    pub dedup_window_seconds: u32,
    /// Failed login attempts before an IP is banned.
    pub max_attempts: u32,
    pub ban_duration_seconds: u32,
    /// Renew a certificate once it has at most this many days left.
    pub renew_within_days: i64,
    /// Warn about a certificate once it has at most this many days left.
    pub notify_within_days: i64,
    /// Evict state entries unseen for this many days.
    pub retention_days: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            scale_up_threshold: 80,
            scale_down_threshold: 30,
            min_units: 1,
            max_units: 5,
            cooldown_seconds: 300,
            failure_alert_threshold: 3,
            dedup_window_seconds: 3600,
            max_attempts: 5,
            ban_duration_seconds: 86_400,
            renew_within_days: 7,
            notify_within_days: 14,
            retention_days: 30,
        }
    }
}

impl PolicyConfig {
    /// Reject invalid combinations before the first cycle.
    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        if self.scale_down_threshold >= self.scale_up_threshold {
            return Err(PolicyConfigError::ThresholdsNotOrdered {
                down: self.scale_down_threshold,
                up: self.scale_up_threshold,
            });
        }
        if self.max_units == 0 {
            return Err(PolicyConfigError::ZeroMaxUnits);
        }
        // The scaling policy never decides below one running unit, so a zero
        // floor would leave it re-issuing the same scale-down every cooldown
        // with no resting state.
        if self.min_units == 0 {
            return Err(PolicyConfigError::ZeroMinUnits);
        }
        if self.min_units > self.max_units {
            return Err(PolicyConfigError::UnitsNotOrdered {
                min: self.min_units,
                max: self.max_units,
            });
        }
        if self.dedup_window_seconds == 0 {
            return Err(PolicyConfigError::ZeroWindow {
                field: "dedup_window_seconds",
            });
        }
        if self.failure_alert_threshold == 0 {
            return Err(PolicyConfigError::ZeroWindow {
                field: "failure_alert_threshold",
            });
        }
        if self.max_attempts == 0 {
            return Err(PolicyConfigError::ZeroWindow {
                field: "max_attempts",
            });
        }
        Ok(())
    }
}
