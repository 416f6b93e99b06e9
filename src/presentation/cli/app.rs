use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vigia — control loop for small server fleets
///
/// Samples resource, endpoint, auth-log, and certificate signals, applies
/// hysteresis and cooldown rules, and executes the corrective actions.
#[derive(Parser, Debug)]
#[command(name = "vigia")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one decision cycle over all configured targets
    #[command(alias = "r")]
    Run {
        /// Compute and report decisions without executing actions
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the persisted state of every tracked target
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scale the configured service up or down by one unit
    #[command(alias = "sc")]
    Scale {
        /// Scaling direction
        #[arg(value_enum)]
        direction: Direction,

        /// Bypass the cooldown window
        #[arg(short, long)]
        force: bool,
    },

    /// Lift expired bans without running a full cycle
    #[command(alias = "sw")]
    Sweep,

    /// Send a message through the configured notification channels
    #[command(alias = "n")]
    Notify {
        /// Message body
        #[arg(short, long)]
        message: String,

        /// Restrict delivery to one channel (telegram, slack, discord, email, terminal)
        #[arg(short = 'c', long)]
        channel: Option<String>,

        /// Message title
        #[arg(short, long)]
        title: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_invocation_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["vigia"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_run_with_dry_run() {
        let cli =
            Cli::try_parse_from(["vigia", "run", "--dry-run"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Some(Commands::Run { dry_run: true })));
    }

    #[test]
    fn parse_status_with_json() {
        let cli =
            Cli::try_parse_from(["vigia", "status", "--json"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Some(Commands::Status { json: true })));
    }

    #[test]
    fn parse_scale_up_with_force() {
        let cli = Cli::try_parse_from(["vigia", "scale", "up", "--force"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Some(Commands::Scale {
                direction: Direction::Up,
                force: true
            })
        ));
    }

    #[test]
    fn parse_scale_rejects_unknown_direction() {
        assert!(Cli::try_parse_from(["vigia", "scale", "sideways"]).is_err());
    }

    #[test]
    fn parse_notify_with_channel() {
        let cli = Cli::try_parse_from(["vigia", "notify", "-m", "deploy done", "-c", "slack"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Some(Commands::Notify {
            message,
            channel,
            title,
        }) = cli.command
        else {
            panic!("expected notify command");
        };
        assert_eq!(message, "deploy done");
        assert_eq!(channel.as_deref(), Some("slack"));
        assert!(title.is_none());
    }

    #[test]
    fn parse_aliases() {
        assert!(matches!(
            Cli::try_parse_from(["vigia", "r"]).unwrap().command,
            Some(Commands::Run { .. })
        ));
        assert!(matches!(
            Cli::try_parse_from(["vigia", "sw"]).unwrap().command,
            Some(Commands::Sweep)
        ));
    }

    #[test]
    fn global_config_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["vigia", "status", "--config", "/tmp/vigia.toml"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/vigia.toml")));
    }
}
