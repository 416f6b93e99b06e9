use chrono::Utc;
use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::{CycleService, OutcomeStatus};
use crate::domain::ports::source::TargetDiscovery;

use super::Wiring;

/// Runs one decision cycle and prints a per-target summary.
///
/// # Errors
///
/// Returns an error only on wiring failures; per-target problems are
/// reflected in the exit code, not as errors.
pub async fn run_cycle(config: &AppConfig, dry_run: bool) -> anyhow::Result<i32> {
    let wiring = Wiring::build(config, dry_run)?;

    let discovery: Vec<&dyn TargetDiscovery> = if config.bans.enabled {
        vec![wiring.source.auth_log()]
    } else {
        Vec::new()
    };
    let service = CycleService::new(
        &wiring.source,
        &discovery,
        wiring.effector.as_ref(),
        &wiring.store,
        &wiring.dispatcher,
        &wiring.policy,
    );

    let targets = config.targets();
    let report = service.run_once(&targets, Utc::now()).await;

    if dry_run {
        println!("{}", "dry run: no actions were executed".yellow());
    }
    for outcome in &report.outcomes {
        let badge = match outcome.status {
            OutcomeStatus::Healthy => "ok".green(),
            OutcomeStatus::Actioned => "actioned".cyan(),
            OutcomeStatus::Unhealthy => "unhealthy".red(),
            OutcomeStatus::Skipped => "skipped".yellow(),
            OutcomeStatus::Failed => "failed".red().bold(),
        };
        println!("  {:<10} {} ({})", badge, outcome.target_id.bold(), outcome.detail);
    }
    println!(
        "\n{} target(s): {} ok, {} actioned, {} unhealthy, {} skipped, {} failed",
        report.outcomes.len(),
        report.count(OutcomeStatus::Healthy),
        report.count(OutcomeStatus::Actioned),
        report.count(OutcomeStatus::Unhealthy),
        report.count(OutcomeStatus::Skipped),
        report.count(OutcomeStatus::Failed),
    );
    if let Some(ref e) = report.save_error {
        eprintln!("{} {e}", "state not persisted:".red().bold());
    }

    Ok(report.exit_code())
}
