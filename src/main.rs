// Qase Migrate - Test Run Result Migration for Qase
// Copyright (c) 2025 Qase Migrate Contributors
// Licensed under the MIT License

use clap::Parser;
use qase_migrate::cli::{Cli, Commands};
use qase_migrate::config::{load_unvalidated, LoggingConfig};
use qase_migrate::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the configuration when it loads; load
    // errors are reported again by the command itself
    let (config_level, logging_config) = match load_unvalidated(cli.config.as_deref(), Some(cli.fallback.as_path())) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Qase Migrate - Test Run Result Migration"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Migrate(args) => args.execute(cli.config.as_deref(), &cli.fallback).await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref(), &cli.fallback).await,
        Commands::Init(args) => args.execute().await,
    }
}
