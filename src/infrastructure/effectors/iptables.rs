use std::time::Duration;

use tracing::debug;

use super::{check_status, run_command};
use crate::domain::ports::effector::EffectorError;

const RULE_TIMEOUT: Duration = Duration::from_secs(10);

/// Inserts and removes `DROP` rules on the `INPUT` chain.
///
/// Every mutation is preceded by an `iptables -C` probe so repeating an
/// operation never stacks duplicate rules or fails on a rule that is
/// already gone.
pub struct IptablesEffector;

impl IptablesEffector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub async fn ban(&self, ip: &str) -> Result<(), EffectorError> {
        if self.rule_exists(ip).await? {
            debug!(ip, "drop rule already present, skipping insert");
            return Ok(());
        }
        let output = run_command(
            "iptables",
            &["-A", "INPUT", "-s", ip, "-j", "DROP"],
            RULE_TIMEOUT,
        )
        .await?;
        check_status("iptables", &output)
    }

    pub async fn unban(&self, ip: &str) -> Result<(), EffectorError> {
        if !self.rule_exists(ip).await? {
            debug!(ip, "drop rule already absent, nothing to remove");
            return Ok(());
        }
        let output = run_command(
            "iptables",
            &["-D", "INPUT", "-s", ip, "-j", "DROP"],
            RULE_TIMEOUT,
        )
        .await?;
        check_status("iptables", &output)
    }

    async fn rule_exists(&self, ip: &str) -> Result<bool, EffectorError> {
        let output = run_command(
            "iptables",
            &["-C", "INPUT", "-s", ip, "-j", "DROP"],
            RULE_TIMEOUT,
        )
        .await?;
        Ok(output.status.success())
    }
}

impl Default for IptablesEffector {
    fn default() -> Self {
        Self::new()
    }
}
