//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for qase-migrate using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Qase Migrate - copy test run results between Qase projects
#[derive(Parser, Debug)]
#[command(name = "qase-migrate")]
#[command(version, about, long_about = None)]
#[command(author = "Qase Migrate Contributors")]
pub struct Cli {
    /// Path to configuration file (default: qase-migrate.toml, if present)
    #[arg(short, long, env = "QASE_MIGRATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// KEY=VALUE file consulted for settings missing from the environment
    #[arg(short, long, default_value = "fallback.txt", env = "QASE_FALLBACK_FILE")]
    pub fallback: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy results from the source run to the target run
    Migrate(commands::migrate::MigrateArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_migrate() {
        let cli = Cli::parse_from(["qase-migrate", "migrate"]);
        assert_eq!(cli.fallback, PathBuf::from("fallback.txt"));
        assert!(matches!(cli.command, Commands::Migrate(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["qase-migrate", "--config", "custom.toml", "migrate"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_cli_parse_migrate_dry_run() {
        let cli = Cli::parse_from(["qase-migrate", "migrate", "--dry-run"]);
        match cli.command {
            Commands::Migrate(args) => assert!(args.dry_run),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["qase-migrate", "--log-level", "debug", "migrate"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["qase-migrate", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["qase-migrate", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
