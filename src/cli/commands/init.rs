//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "qase-migrate.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing qase-migrate configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your projects, runs and field id", self.output);
                println!("  2. Export QASE_API_TOKEN, or put it in fallback.txt");
                println!("  3. Validate configuration: qase-migrate validate-config");
                println!("  4. Preview: qase-migrate migrate --dry-run");
                println!("  5. Run: qase-migrate migrate");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# qase-migrate configuration
#
# Every value below can also come from the environment or from the
# fallback file (KEY=VALUE lines): QASE_API_TOKEN, QASE_SOURCE_PROJECT,
# QASE_TARGET_PROJECT, QASE_CF_ID, QASE_SOURCE_RUN, QASE_TARGET_RUN,
# QASE_BASE_URL, QASE_MAPPING_PATH, QASE_LOG_LEVEL, QASE_DRY_RUN.
# The environment wins over the fallback file, and both win over this file.

[application]
log_level = "info"
dry_run = false

[qase]
base_url = "https://api.qase.io/v1"
# The token is read from QASE_API_TOKEN or the fallback file. To keep it
# here instead, uncomment the line below; a ${VAR} placeholder must then be
# set in the environment.
# api_token = "${QASE_API_TOKEN}"
timeout_seconds = 30
tls_verify = true

[migration]
# Project and run the results are read from
source_project = "LEGACY"
source_run_id = 1

# Project and run the results are written to
target_project = "CORE"
target_run_id = 1

# Target-project custom field holding the source case id
custom_field_id = 1

# Listing page size (max 100) and bulk batch size (max 200)
page_size = 100
batch_size = 200

# Correspondence table, overwritten on every run
mapping_path = "mapping.csv"

# Optional audit table with case titles
# pairs_path = "pairs.csv"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
