//! Configuration management.
//!
//! # Overview
//!
//! Configuration is assembled from three layers:
//! - an optional TOML file (`qase-migrate.toml` by default) with `${VAR_NAME}`
//!   substitution
//! - a KEY=VALUE fallback file (`fallback.txt` by default)
//! - `QASE_*` environment variables, which win over the fallback file
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`QaseConfig`] - API base URL, token, timeout, TLS
//! - [`MigrationConfig`] - Projects, runs, correlation field, batching, output paths
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [qase]
//! api_token = "${QASE_API_TOKEN}"
//!
//! [migration]
//! source_project = "LEGACY"
//! target_project = "CORE"
//! custom_field_id = 7
//! source_run_id = 120
//! target_run_id = 48
//! mapping_path = "mapping.csv"
//! ```
//!
//! # Environment Variables
//!
//! `QASE_API_TOKEN`, `QASE_SOURCE_PROJECT`, `QASE_TARGET_PROJECT`, `QASE_CF_ID`,
//! `QASE_SOURCE_RUN` and `QASE_TARGET_RUN` may replace the file entirely;
//! the same keys are read from the fallback file when unset.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_unvalidated, DEFAULT_CONFIG_PATH, DEFAULT_FALLBACK_PATH};
pub use schema::{ApplicationConfig, LoggingConfig, MigrateConfig, MigrationConfig, QaseConfig};
pub use secret::{secret_string, SecretString, SecretValue};

/// Serializes unit tests that read or write process environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
