use std::time::Duration;

use super::{check_status, run_command};
use crate::domain::ports::effector::EffectorError;

const SCALE_TIMEOUT: Duration = Duration::from_secs(60);

/// Scales a compose service with `docker compose up -d --scale`.
///
/// The call carries the absolute replica count, so asking for a count the
/// service already runs at is a successful no-op on the compose side.
pub struct ComposeEffector;

impl ComposeEffector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub async fn reconcile(&self, service: &str, target_units: u32) -> Result<(), EffectorError> {
        let scale_arg = format!("{service}={target_units}");
        let output = run_command(
            "docker",
            &["compose", "up", "-d", "--scale", &scale_arg, "--no-recreate"],
            SCALE_TIMEOUT,
        )
        .await?;
        check_status("docker compose", &output)
    }
}

impl Default for ComposeEffector {
    fn default() -> Self {
        Self::new()
    }
}
