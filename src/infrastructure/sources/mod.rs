pub mod auth_log;
pub mod cert_expiry;
pub mod http_health;
pub mod resource;

pub use auth_log::AuthLogSource;
pub use cert_expiry::CertificateSource;
pub use http_health::HttpHealthSource;
pub use resource::ResourceSource;

use async_trait::async_trait;

use crate::domain::entities::{Signal, Target, TargetKind};
use crate::domain::ports::source::{SignalSource, SourceError};

/// Routes each target to the source for its kind.
pub struct CompositeSource {
    resource: ResourceSource,
    health: HttpHealthSource,
    auth_log: AuthLogSource,
    certificate: CertificateSource,
}

impl CompositeSource {
    #[must_use]
    pub fn new(
        resource: ResourceSource,
        health: HttpHealthSource,
        auth_log: AuthLogSource,
        certificate: CertificateSource,
    ) -> Self {
        Self {
            resource,
            health,
            auth_log,
            certificate,
        }
    }

    /// The auth-log source doubles as target discovery; expose it so the
    /// cycle can register it without a second parse of the log.
    #[must_use]
    pub fn auth_log(&self) -> &AuthLogSource {
        &self.auth_log
    }
}

#[async_trait]
impl SignalSource for CompositeSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        match &target.kind {
            TargetKind::Service { .. } => self.resource.observe(target).await,
            TargetKind::Endpoint { .. } => self.health.observe(target).await,
            TargetKind::IpSource { .. } => self.auth_log.observe(target).await,
            TargetKind::Certificate { .. } => self.certificate.observe(target).await,
        }
    }
}
