use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{Signal, Target};

/// A local fault while collecting a signal. An unreachable or erroring
/// *remote* target is not an error; it comes back as a `Signal` with
/// `status = Down`. A `SourceError` skips the target for this cycle and
/// leaves its state untouched.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("signal source unavailable: {0}")]
    Unavailable(String),
    #[error("no source registered for target {0}")]
    UnsupportedTarget(String),
}

#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Produce a fresh observation for the target.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` only for local collection faults; expected
    /// unavailability of the monitored system is a `Down` signal.
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError>;
}

/// Discovers targets that are not statically configured, e.g. IPs seen
/// failing authentication in the auth log. A discovery fault skips the
/// whole domain for this cycle, exactly like a per-target `SourceError`.
#[async_trait]
pub trait TargetDiscovery: Send + Sync {
    /// Name used in cycle reports when discovery is skipped.
    fn name(&self) -> &'static str;

    async fn discover(&self) -> Result<Vec<Target>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError::PermissionDenied("/var/log/auth.log".to_string());
        assert_eq!(err.to_string(), "permission denied: /var/log/auth.log");

        let err = SourceError::UnsupportedTarget("service:app".to_string());
        assert_eq!(err.to_string(), "no source registered for target service:app");
    }
}
