pub mod certbot;
pub mod compose;
pub mod iptables;
pub mod noop;

pub use noop::NoopEffector;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::effector::{Effector, EffectorError};

/// Runs an external command with a bounded timeout, mapping every failure
/// mode onto the effector error taxonomy. A timeout kills the child.
async fn run_command(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<std::process::Output, EffectorError> {
    let command = tokio::process::Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output();
    match tokio::time::timeout(timeout, command).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(EffectorError::Unavailable(format!("{program}: {e}"))),
        Err(_) => Err(EffectorError::Timeout(timeout.as_secs())),
    }
}

fn check_status(program: &str, output: &std::process::Output) -> Result<(), EffectorError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(EffectorError::CommandFailed(format!(
            "{program} exited {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// Production effector delegating each action family to its tool.
pub struct SystemEffector {
    compose: compose::ComposeEffector,
    firewall: iptables::IptablesEffector,
    certbot: certbot::CertbotEffector,
}

impl SystemEffector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            compose: compose::ComposeEffector::new(),
            firewall: iptables::IptablesEffector::new(),
            certbot: certbot::CertbotEffector::new(),
        }
    }
}

impl Default for SystemEffector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Effector for SystemEffector {
    async fn reconcile(&self, service: &str, target_units: u32) -> Result<(), EffectorError> {
        self.compose.reconcile(service, target_units).await
    }

    async fn ban(&self, ip: &str, _duration_seconds: u32) -> Result<(), EffectorError> {
        // The rule itself has no expiry; the sweep lifts it once the
        // recorded ban duration has elapsed.
        self.firewall.ban(ip).await
    }

    async fn unban(&self, ip: &str) -> Result<(), EffectorError> {
        self.firewall.unban(ip).await
    }

    async fn renew(&self, domain: &str) -> Result<(), EffectorError> {
        self.certbot.renew(domain).await
    }
}
