use anyhow::bail;
use chrono::Utc;
use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::{CycleService, ScaleDirection};
use crate::presentation::cli::app::Direction;

use super::Wiring;

/// Scales the configured service by one unit in the given direction.
///
/// # Errors
///
/// Returns an error if no service is configured or the scale command
/// itself fails.
pub async fn run_scale(
    config: &AppConfig,
    direction: Direction,
    force: bool,
) -> anyhow::Result<i32> {
    let Some(service_name) = config.scaling.service.as_deref() else {
        bail!("no service configured for scaling (set scaling.service in the config)");
    };

    let wiring = Wiring::build(config, false)?;
    let service = CycleService::new(
        &wiring.source,
        &[],
        wiring.effector.as_ref(),
        &wiring.store,
        &wiring.dispatcher,
        &wiring.policy,
    );

    let direction = match direction {
        Direction::Up => ScaleDirection::Up,
        Direction::Down => ScaleDirection::Down,
    };
    let outcome = service
        .force_scale(service_name, direction, force, Utc::now())
        .await?;

    if outcome.applied {
        println!(
            "{} {} scaled {} \u{2192} {} unit(s)",
            "ok:".green().bold(),
            service_name.bold(),
            outcome.from_units,
            outcome.to_units
        );
        Ok(0)
    } else {
        let reason = outcome.reason.unwrap_or_else(|| "not applied".to_string());
        println!("{} {reason}", "skipped:".yellow().bold());
        Ok(1)
    }
}
