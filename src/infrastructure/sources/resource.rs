use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sysinfo::System;

use crate::domain::entities::{MetricKind, Signal, SignalStatus, Target};
use crate::domain::ports::source::{SignalSource, SourceError};

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// Samples host CPU and memory via `sysinfo` and reports the demand signal
/// for scaling decisions: the worse of the two utilizations, as the
/// original autoscaler scaled on either resource running hot.
///
/// Uses `Mutex<System>` for interior mutability since the trait takes
/// `&self` but `sysinfo::System` refreshes through `&mut self`.
pub struct ResourceSource {
    sys: Mutex<System>,
}

impl ResourceSource {
    #[must_use]
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Mutex::new(sys),
        }
    }
}

impl Default for ResourceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalSource for ResourceSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        // Two CPU refreshes are needed for a meaningful usage delta.
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        let mut sys = self
            .sys
            .lock()
            .map_err(|e| SourceError::Unavailable(format!("system lock poisoned: {e}")))?;
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu = f64::from(sys.global_cpu_info().cpu_usage());
        let memory = safe_percent(sys.used_memory(), sys.total_memory());
        drop(sys);

        Ok(Signal::new(
            &target.id,
            MetricKind::Utilization,
            cpu.max(memory),
            SignalStatus::Ok,
            Utc::now(),
        ))
    }
}
