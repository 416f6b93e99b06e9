use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{MetricKind, Signal, SignalStatus, Target, TargetKind};
use crate::domain::ports::source::{SignalSource, SourceError};

/// Probes an HTTP endpoint for liveness.
///
/// Unreachability and server errors are properties of the monitored target
/// (`Down`), never local faults: a connect failure or a 5xx both come back
/// as signals. The value is the response latency in milliseconds.
pub struct HttpHealthSource {
    client: reqwest::Client,
}

impl HttpHealthSource {
    /// Creates a probe with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the HTTP client cannot be
    /// initialized (e.g. TLS backend failure).
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SignalSource for HttpHealthSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        let TargetKind::Endpoint { ref url } = target.kind else {
            return Err(SourceError::UnsupportedTarget(target.id.clone()));
        };

        let start = Instant::now();
        let status = match self.client.get(url).send().await {
            Ok(response) if response.status().is_server_error() => SignalStatus::Down,
            Ok(response) if response.status().is_client_error() => SignalStatus::Degraded,
            Ok(_) => SignalStatus::Ok,
            Err(e) => {
                tracing::debug!("{url} unreachable: {e}");
                SignalStatus::Down
            }
        };
        #[allow(clippy::cast_precision_loss)]
        let latency_ms = start.elapsed().as_millis() as f64;

        Ok(Signal::new(
            &target.id,
            MetricKind::Health,
            latency_ms,
            status,
            Utc::now(),
        ))
    }
}
