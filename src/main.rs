use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigia::application::config::AppConfig;
use vigia::presentation::cli::app::{Cli, Commands};
use vigia::presentation::cli::commands::notify::run_notify;
use vigia::presentation::cli::commands::run::run_cycle;
use vigia::presentation::cli::commands::scale::run_scale;
use vigia::presentation::cli::commands::status::run_status;
use vigia::presentation::cli::commands::sweep::run_sweep;

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = match cli.config {
        Some(ref path) => AppConfig::load_or_create(path)?,
        None => AppConfig::load()?,
    };
    config.policy().validate()?;

    let exit_code = match cli.command {
        None | Some(Commands::Run { dry_run: false }) => run_cycle(&config, false).await?,
        Some(Commands::Run { dry_run: true }) => run_cycle(&config, true).await?,
        Some(Commands::Status { json }) => run_status(&config, json).await?,
        Some(Commands::Scale { direction, force }) => run_scale(&config, direction, force).await?,
        Some(Commands::Sweep) => run_sweep(&config).await?,
        Some(Commands::Notify {
            message,
            channel,
            title,
        }) => run_notify(&config, &message, channel.as_deref(), title.as_deref()).await?,
    };

    std::process::exit(exit_code);
}
