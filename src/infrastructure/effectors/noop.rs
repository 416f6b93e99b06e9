use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::effector::{Effector, EffectorError};

/// Effector that records what it would have done without touching the host.
///
/// Backs `run --dry-run`, where decisions are computed and reported but no
/// container, firewall, or certificate command runs.
#[derive(Default)]
pub struct NoopEffector;

impl NoopEffector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Effector for NoopEffector {
    async fn reconcile(&self, service: &str, target_units: u32) -> Result<(), EffectorError> {
        info!(service, target_units, "dry-run: would scale service");
        Ok(())
    }

    async fn ban(&self, ip: &str, duration_seconds: u32) -> Result<(), EffectorError> {
        info!(ip, duration_seconds, "dry-run: would ban address");
        Ok(())
    }

    async fn unban(&self, ip: &str) -> Result<(), EffectorError> {
        info!(ip, "dry-run: would lift ban");
        Ok(())
    }

    async fn renew(&self, domain: &str) -> Result<(), EffectorError> {
        info!(domain, "dry-run: would renew certificate");
        Ok(())
    }
}
