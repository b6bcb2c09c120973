//! Command-line interface definitions.
//!
//! Defines the `surebet` command tree with `clap` and dispatches parsed
//! commands to their handlers.

pub mod admin;
pub mod allocate;
pub mod check;
pub mod ledger;
pub mod output;
pub mod quota;
pub mod run;
pub mod scan;
mod view;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::app::Config;
use crate::domain::Sport;
use crate::error::Result;

/// Cross-bookmaker sports arbitrage scanner
#[derive(Parser, Debug)]
#[command(name = "surebet")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan on a schedule until interrupted
    Run(RunArgs),

    /// Run one scan cycle now
    Scan(ScanArgs),

    /// List active opportunities, best yield first
    Active(ActiveArgs),

    /// Show expired and past opportunities by month
    History(HistoryArgs),

    /// Show ledger totals and sync age
    Status,

    /// Split a stake across the legs of an active opportunity
    Allocate(AllocateArgs),

    /// Show the remaining odds API quota
    Quota,

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Maintain the ledger and settings
    #[command(subcommand)]
    Admin(AdminCommand),
}

/// Subcommands for `surebet check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file
    Config,
}

/// Subcommands for `surebet admin`.
#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Delete one active opportunity
    Remove {
        /// Opportunity id
        id: String,
    },
    /// Write the active set as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the active set from an exported JSON file
    Import {
        /// JSON file produced by `admin export`
        file: PathBuf,
    },
    /// Delete the active set, the history and the last sync time
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the stored settings
    Settings(SettingsArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only scan these sports (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub sport: Vec<Sport>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Only scan these sports (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub sport: Vec<Sport>,
}

/// Arguments for the `active` subcommand.
#[derive(Parser, Debug)]
pub struct ActiveArgs {
    /// Only show one sport
    #[arg(long)]
    pub sport: Option<Sport>,

    /// Show fractional instead of decimal odds
    #[arg(long)]
    pub fractional: bool,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Only show one month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,

    /// Show fractional instead of decimal odds
    #[arg(long)]
    pub fractional: bool,
}

/// Arguments for the `allocate` subcommand.
#[derive(Parser, Debug)]
pub struct AllocateArgs {
    /// Opportunity id
    pub id: String,

    /// Total amount to stake
    #[arg(long)]
    pub stake: Decimal,

    /// Keep fractional stakes instead of rounding to whole units
    #[arg(long)]
    pub exact: bool,
}

/// Arguments for `admin settings`. No flags prints the current settings.
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    /// Switch scanning on or off
    #[arg(long)]
    pub active: Option<bool>,

    /// Exchange commission in percent
    #[arg(long)]
    pub commission: Option<Decimal>,

    /// Profit percentage above which an opportunity is hot
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// Bookmaker keys treated as exchanges (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exchanges: Option<Vec<String>>,
}

impl SettingsArgs {
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
            && self.commission.is_none()
            && self.threshold.is_none()
            && self.exchanges.is_none()
    }
}

/// Dispatch a parsed command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match &cli.command {
        Commands::Check(CheckCommand::Config) => return check::execute_config(&cli.config),
        Commands::Run(args) => return run::execute(&cli.config, args).await,
        _ => {}
    }

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Scan(args) => scan::execute(&config, &args).await,
        Commands::Active(args) => ledger::active(&config, &args),
        Commands::History(args) => ledger::history(&config, &args),
        Commands::Status => ledger::status(&config),
        Commands::Allocate(args) => allocate::execute(&config, &args),
        Commands::Quota => quota::execute(&config).await,
        Commands::Admin(command) => admin::execute(&config, command).await,
        Commands::Check(_) | Commands::Run(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sport_lists() {
        let cli = Cli::parse_from(["surebet", "scan", "--sport", "football,horse-racing"]);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.sport, vec![Sport::Football, Sport::HorseRacing]);
    }

    #[test]
    fn parses_allocate_with_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "surebet", "allocate", "evt-1", "--stake", "100", "--exact", "--json", "-c", "x.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        let Commands::Allocate(args) = cli.command else {
            panic!("expected allocate");
        };
        assert_eq!(args.id, "evt-1");
        assert_eq!(args.stake, dec!(100));
        assert!(args.exact);
    }

    #[test]
    fn unknown_sport_is_rejected() {
        assert!(Cli::try_parse_from(["surebet", "active", "--sport", "curling"]).is_err());
    }

    #[test]
    fn settings_args_without_flags_are_empty() {
        let cli = Cli::parse_from(["surebet", "admin", "settings"]);
        let Commands::Admin(AdminCommand::Settings(args)) = cli.command else {
            panic!("expected admin settings");
        };
        assert!(args.is_empty());

        let cli = Cli::parse_from(["surebet", "admin", "settings", "--exchanges", "smarkets,betdaq"]);
        let Commands::Admin(AdminCommand::Settings(args)) = cli.command else {
            panic!("expected admin settings");
        };
        assert_eq!(
            args.exchanges,
            Some(vec!["smarkets".to_string(), "betdaq".to_string()])
        );
    }
}
