//! Configuration schema types
//!
//! Every section is optional in the TOML file; required values may instead
//! come from the environment or the fallback file, and are checked by
//! [`MigrateConfig::validate`].

use crate::config::SecretString;
use crate::core::fetch::PAGE_SIZE;
use crate::core::submit::MAX_BATCH_SIZE;
use crate::domain::ProjectCode;
use serde::{Deserialize, Serialize};

/// Default Qase API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.qase.io/v1";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Qase API connection
    #[serde(default)]
    pub qase: QaseConfig,

    /// What to migrate and where
    #[serde(default)]
    pub migration: MigrationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MigrateConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first missing or invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.qase.validate()?;
        self.migration.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Resolve and transform, but do not submit anything
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Qase API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaseConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token sent in the `Token` header
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable this against a local test double.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl QaseConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("qase.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("qase.base_url must start with http:// or https://".to_string());
        }

        match &self.api_token {
            Some(token) if !token.expose_secret().is_blank() => {}
            _ => {
                return Err(
                    "qase.api_token is required (set QASE_API_TOKEN or add it to the fallback file)"
                        .to_string(),
                )
            }
        }

        if self.timeout_seconds == 0 {
            return Err("qase.timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for QaseConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Migration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Project holding the source run and the original cases
    #[serde(default)]
    pub source_project: Option<String>,

    /// Project receiving the results
    #[serde(default)]
    pub target_project: Option<String>,

    /// Target-project custom field that stores the source case id
    #[serde(default)]
    pub custom_field_id: Option<u64>,

    /// Run to read results from
    #[serde(default)]
    pub source_run_id: Option<u64>,

    /// Run to write results to
    #[serde(default)]
    pub target_run_id: Option<u64>,

    /// Listing page size
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Records per bulk request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Where the correspondence table is written
    #[serde(default = "default_mapping_path")]
    pub mapping_path: String,

    /// Optional audit export of matched case titles
    #[serde(default)]
    pub pairs_path: Option<String>,
}

impl MigrationConfig {
    fn validate(&self) -> Result<(), String> {
        let source = required(&self.source_project, "migration.source_project", "QASE_SOURCE_PROJECT")?;
        ProjectCode::new(source.as_str()).map_err(|e| format!("migration.source_project: {e}"))?;

        let target = required(&self.target_project, "migration.target_project", "QASE_TARGET_PROJECT")?;
        ProjectCode::new(target.as_str()).map_err(|e| format!("migration.target_project: {e}"))?;

        required(&self.custom_field_id, "migration.custom_field_id", "QASE_CF_ID")?;
        required(&self.source_run_id, "migration.source_run_id", "QASE_SOURCE_RUN")?;
        required(&self.target_run_id, "migration.target_run_id", "QASE_TARGET_RUN")?;

        if self.page_size == 0 || self.page_size > PAGE_SIZE {
            return Err(format!(
                "migration.page_size must be between 1 and {PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "migration.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            ));
        }

        if self.mapping_path.trim().is_empty() {
            return Err("migration.mapping_path cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_project: None,
            target_project: None,
            custom_field_id: None,
            source_run_id: None,
            target_run_id: None,
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            mapping_path: default_mapping_path(),
            pairs_path: None,
        }
    }
}

fn required<'a, T>(value: &'a Option<T>, name: &str, env_key: &str) -> Result<&'a T, String> {
    value
        .as_ref()
        .ok_or_else(|| format!("{name} is required (set {env_key} or add it to the fallback file)"))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_mapping_path() -> String {
    "mapping.csv".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn complete_config() -> MigrateConfig {
        let mut config = MigrateConfig::default();
        config.qase.api_token = Some(secret_string("token".to_string()));
        config.migration.source_project = Some("SRC".to_string());
        config.migration.target_project = Some("TGT".to_string());
        config.migration.custom_field_id = Some(7);
        config.migration.source_run_id = Some(1);
        config.migration.target_run_id = Some(2);
        config
    }

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert_eq!(config.qase.base_url, "https://api.qase.io/v1");
        assert_eq!(config.migration.page_size, 100);
        assert_eq!(config.migration.batch_size, 200);
        assert_eq!(config.migration.mapping_path, "mapping.csv");
        assert!(!config.application.dry_run);
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let mut config = complete_config();
        config.qase.api_token = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("QASE_API_TOKEN"));

        config.qase.api_token = Some(secret_string(" ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_each_required_migration_value() {
        let cases: [(fn(&mut MigrationConfig), &str); 5] = [
            (|m| m.source_project = None, "QASE_SOURCE_PROJECT"),
            (|m| m.target_project = None, "QASE_TARGET_PROJECT"),
            (|m| m.custom_field_id = None, "QASE_CF_ID"),
            (|m| m.source_run_id = None, "QASE_SOURCE_RUN"),
            (|m| m.target_run_id = None, "QASE_TARGET_RUN"),
        ];

        for (clear, key) in cases {
            let mut config = complete_config();
            clear(&mut config.migration);
            let err = config.validate().unwrap_err();
            assert!(err.contains(key), "expected {key} in '{err}'");
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut config = complete_config();
        config.migration.batch_size = 201;
        assert!(config.validate().is_err());
        config.migration.batch_size = 0;
        assert!(config.validate().is_err());
        config.migration.batch_size = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_project_code() {
        let mut config = complete_config();
        config.migration.target_project = Some("TG/T".to_string());
        assert!(config.validate().unwrap_err().contains("target_project"));
    }

    #[test]
    fn test_invalid_base_url_and_level() {
        let mut config = complete_config();
        config.qase.base_url = "api.qase.io".to_string();
        assert!(config.validate().is_err());

        let mut config = complete_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
