use chrono::Utc;
use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::{CycleService, OutcomeStatus};

use super::Wiring;

/// Lifts expired bans without running a full cycle.
///
/// # Errors
///
/// Returns an error on wiring failures or if the swept state cannot be
/// persisted.
pub async fn run_sweep(config: &AppConfig) -> anyhow::Result<i32> {
    let wiring = Wiring::build(config, false)?;
    let service = CycleService::new(
        &wiring.source,
        &[],
        wiring.effector.as_ref(),
        &wiring.store,
        &wiring.dispatcher,
        &wiring.policy,
    );

    let report = service.sweep(Utc::now()).await?;

    let lifted = report.count(OutcomeStatus::Actioned);
    let failed = report.count(OutcomeStatus::Failed);
    if lifted == 0 && failed == 0 {
        println!("no expired bans");
    } else {
        println!("{} ban(s) lifted", lifted.to_string().green().bold());
        if failed > 0 {
            println!("{} unban(s) failed", failed.to_string().red().bold());
        }
    }
    Ok(report.exit_code())
}
