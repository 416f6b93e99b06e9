use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::json;

use crate::application::config::AppConfig;
use crate::domain::entities::{Signal, Target};
use crate::domain::ports::source::SignalSource;
use crate::domain::ports::store::StateStore;
use crate::infrastructure::persistence::FileStateStore;
use crate::infrastructure::sources::ResourceSource;

/// Prints the persisted state of every tracked target plus a live resource
/// reading. Always exits 0; health problems are `run`'s business.
///
/// # Errors
///
/// Returns an error if the state path cannot be resolved or JSON
/// serialization fails.
pub async fn run_status(config: &AppConfig, json: bool) -> anyhow::Result<i32> {
    let store = FileStateStore::new(config.state_path()?, config.state.retention_days);
    let states = store.load();
    let live = live_signal(config).await;

    if json {
        let doc = json!({
            "targets": states,
            "live": live,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(0);
    }

    println!("{}", "vigia — Tracked Targets".bold().cyan());
    println!("{}", "\u{2500}".repeat(60).dimmed());

    if let Some(ref signal) = live {
        println!(
            "live utilization: {} ({})",
            format!("{:.1}%", signal.value).bold(),
            signal.target_id
        );
    }

    if states.is_empty() {
        println!("no tracked targets yet; run `vigia run` first");
        return Ok(0);
    }

    for (target_id, state) in &states {
        println!("\n{}", target_id.bold());
        if target_id.starts_with("service:") {
            println!("  units:          {}", state.current_units);
        }
        println!("  failures:       {}", state.consecutive_failures);
        println!("  last action:    {}", fmt_time(state.last_action_at));
        println!("  last alert:     {}", fmt_time(state.last_alert_at));
        println!("  last recovered: {}", fmt_time(state.last_recovered_at));
        if let Some(banned_at) = state.banned_at {
            println!("  banned at:      {}", fmt_time(Some(banned_at)).red());
        }
        println!("  last seen:      {}", fmt_time(state.last_seen));
    }
    Ok(0)
}

async fn live_signal(config: &AppConfig) -> Option<Signal> {
    let service = config.scaling.service.as_deref()?;
    let source = ResourceSource::new();
    source.observe(&Target::service(service)).await.ok()
}

fn fmt_time(t: Option<DateTime<Utc>>) -> String {
    t.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
