//! GymXP Control - command-line front end for the gym XP tracker
//!
//! Every subcommand is one user action; state is saved after each change.

mod commands;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gymxp_common::GymXpConfig;

// Version is embedded at build time
const VERSION: &str = env!("GYMXP_VERSION");

#[derive(Parser)]
#[command(name = "gymxpctl")]
#[command(about = "Gym XP tracker - turn training volume into levels", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (default: <config dir>/gymxp/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Row kind addressed by `toggle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleTarget {
    Item,
    Extra,
    Leg,
}

/// Row kind addressed by `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RowKind {
    Item,
    Extra,
}

#[derive(Subcommand)]
enum Commands {
    /// Show total XP, level, and today's breakdown
    Status,

    /// Show committed sessions, most recent first
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Mark a row done / not done
    Toggle {
        target: ToggleTarget,
        /// Row index (not used for `leg`)
        index: Option<usize>,
    },

    /// Set weight, reps or sets of a base or extra row
    Set {
        kind: RowKind,
        index: usize,
        /// weight | reps | sets
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Set weight, reps or sets of the leg extension bonus
    SetLeg {
        /// weight | reps | sets
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Rename an extra exercise
    RenameExtra { index: usize, name: String },

    /// Add an extra exercise (20kg x 10 x 2 by default)
    AddExtra {
        #[arg(long)]
        name: Option<String>,
    },

    /// Set today's run distance in meters (1 m = 1 XP)
    Run {
        #[arg(allow_hyphen_values = true)]
        meters: String,
    },

    /// Add today's XP to the total and start a new session
    Commit,

    /// Discard today's input
    ResetToday,

    /// Erase total XP, history and today's input
    HardReset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Overwrite the total XP (carry over progress from elsewhere)
    SetTotal {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Write a JSON backup
    Export {
        /// Output file (default: ./xp-backup-<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Restore from a JSON backup
    Import { path: PathBuf },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GymXpConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging.level, cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let ctx = commands::Context::new(config, data_dir);

    match cli.command {
        Commands::Status => commands::status(&ctx),
        Commands::History { limit } => commands::history(&ctx, limit),
        Commands::Toggle { target, index } => commands::toggle(&ctx, target, index),
        Commands::Set {
            kind,
            index,
            field,
            value,
        } => commands::set(&ctx, kind, index, &field, &value),
        Commands::SetLeg { field, value } => commands::set_leg(&ctx, &field, &value),
        Commands::RenameExtra { index, name } => commands::rename_extra(&ctx, index, &name),
        Commands::AddExtra { name } => commands::add_extra(&ctx, name.as_deref()),
        Commands::Run { meters } => commands::run(&ctx, &meters),
        Commands::Commit => commands::commit(&ctx),
        Commands::ResetToday => commands::reset_today(&ctx),
        Commands::HardReset { yes } => commands::hard_reset(&ctx, yes),
        Commands::SetTotal { value } => commands::set_total(&ctx, &value),
        Commands::Export { out } => commands::export(&ctx, out),
        Commands::Import { path } => commands::import(&ctx, &path),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&ctx),
            ConfigAction::Path => commands::config_path(cli.config.as_deref()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_values_parse() {
        let cli = Cli::try_parse_from(["gymxpctl", "set", "item", "0", "weight", "-5"]).unwrap();
        match cli.command {
            Commands::Set { value, .. } => assert_eq!(value, "-5"),
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_toggle_leg_without_index() {
        let cli = Cli::try_parse_from(["gymxpctl", "toggle", "leg"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Toggle {
                target: ToggleTarget::Leg,
                index: None
            }
        ));
    }
}
