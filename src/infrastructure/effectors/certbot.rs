use std::time::Duration;

use super::{check_status, run_command};
use crate::domain::ports::effector::EffectorError;

const RENEW_TIMEOUT: Duration = Duration::from_secs(300);

/// Renews a certificate through `certbot renew --cert-name`.
///
/// Certbot exits zero when the certificate is not yet due, so a repeated
/// renewal is harmless.
pub struct CertbotEffector;

impl CertbotEffector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub async fn renew(&self, domain: &str) -> Result<(), EffectorError> {
        let output = run_command(
            "certbot",
            &["renew", "--cert-name", domain, "--non-interactive"],
            RENEW_TIMEOUT,
        )
        .await?;
        check_status("certbot", &output)
    }
}

impl Default for CertbotEffector {
    fn default() -> Self {
        Self::new()
    }
}
