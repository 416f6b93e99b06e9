use async_trait::async_trait;
use thiserror::Error;

/// An effector call that did not take effect. The caller must not advance
/// the cooldown clock; the next scheduled invocation is the retry.
#[derive(Error, Debug)]
pub enum EffectorError {
    #[error("effector command failed: {0}")]
    CommandFailed(String),
    #[error("effector timed out after {0}s")]
    Timeout(u64),
    #[error("effector not available: {0}")]
    Unavailable(String),
}

/// External systems that perform corrective actions. Every operation is
/// required to be idempotent: reconciling to a unit count already reached,
/// banning an already-banned IP, or unbanning an unknown one all succeed
/// as no-ops.
#[async_trait]
pub trait Effector: Send + Sync {
    /// Drive the service to an absolute unit count.
    async fn reconcile(&self, service: &str, target_units: u32) -> Result<(), EffectorError>;

    /// Block an IP at the firewall for the given duration.
    async fn ban(&self, ip: &str, duration_seconds: u32) -> Result<(), EffectorError>;

    /// Lift a ban.
    async fn unban(&self, ip: &str) -> Result<(), EffectorError>;

    /// Renew a certificate.
    async fn renew(&self, domain: &str) -> Result<(), EffectorError>;
}
