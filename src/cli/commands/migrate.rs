//! Migrate command implementation
//!
//! Runs the full migration: resolve cases, transform results, persist the
//! mapping and submit to the target run.

use crate::config::load_config;
use crate::core::migrate::{MigrationCoordinator, MigrationSummary};
use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Resolve, transform and write the mapping, but submit nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: Option<&Path>, fallback_path: &Path) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let mut config = match load_config(config_path, Some(fallback_path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        let dry_run = config.application.dry_run;

        let coordinator = match MigrationCoordinator::new(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create migration coordinator");
                eprintln!("Failed to initialize migration: {e}");
                return Ok(if e.is_configuration() { 2 } else { 5 });
            }
        };

        if dry_run {
            println!("🔍 DRY RUN MODE - No results will be submitted");
            println!();
        }

        if !self.yes && !dry_run && io::stdin().is_terminal() {
            let plan = coordinator.plan();
            println!("Migration Plan:");
            println!("  Source: project {} run {}", plan.source_project, plan.source_run);
            println!("  Target: project {} run {}", plan.target_project, plan.target_run);
            println!("  Correlation field: {}", plan.custom_field);
            println!("  Mapping file: {}", plan.mapping_path.display());
            println!();
            print!("Proceed with migration? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Migration cancelled.");
                return Ok(0);
            }
        }

        println!("🚀 Starting migration...");
        println!();

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Migration failed");
                eprintln!("Migration failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &MigrationSummary) {
    println!("📊 Migration Summary:");
    println!("  Source Cases: {}", summary.source_cases);
    println!("  Target Cases: {}", summary.target_cases);
    println!("  Mapped Cases: {}", summary.mapped_cases);
    println!("  Results Fetched: {}", summary.results_fetched);
    println!("  Results Without Target Case: {}", summary.results_dropped);
    println!("  Records Prepared: {}", summary.records_prepared);
    println!(
        "  Batches Sent: {}/{}",
        summary.batches_sent, summary.batch_count
    );
    println!("  Records Sent: {}", summary.records_sent);
    match summary.mapping_rows {
        Some(rows) => println!("  Mapping: {} rows in {}", rows, summary.mapping_path.display()),
        None => println!("  Mapping: not saved"),
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.ambiguous_values > 0 {
        println!(
            "⚠️  {} source case id(s) were claimed by more than one target case; the last one was used",
            summary.ambiguous_values
        );
    }

    for error in &summary.persistence_errors {
        println!("⚠️  Failed to save mapping: {error}");
    }

    if let Some(failure) = &summary.submission_failure {
        println!("❌ {}", failure.message);
        println!(
            "   Batches before {} were accepted and remain in the target run.",
            failure.batch_index
        );
    } else if summary.dry_run {
        println!("✅ Dry run completed, nothing was submitted");
    } else {
        println!("✅ Migration completed successfully!");
    }
}

fn exit_code(summary: &MigrationSummary) -> i32 {
    if summary.is_successful() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::core::migrate::SubmissionFailure;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_migrate_flags_parse() {
        let cli = Cli::parse_from(["qase-migrate", "migrate"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(!args.yes);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["qase-migrate", "migrate", "--yes", "--dry-run"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.yes);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_exit_code_follows_submission() {
        let mut summary = MigrationSummary::new(PathBuf::from("mapping.csv"), false);
        assert_eq!(exit_code(&summary), 0);

        summary.submission_failure = Some(SubmissionFailure {
            batch_index: 1,
            batch_count: 3,
            records_sent: 200,
            message: "rejected".to_string(),
        });
        assert_eq!(exit_code(&summary), 1);
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_config_error() {
        let args = MigrateArgs {
            yes: true,
            dry_run: false,
        };
        let code = args
            .execute(Some(Path::new("does-not-exist.toml")), Path::new("no-fallback.txt"))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
