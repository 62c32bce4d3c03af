//! Configuration loader
//!
//! Layers, lowest precedence first:
//! 1. the optional TOML file, with `${VAR}` substitution
//! 2. the KEY=VALUE fallback file
//! 3. `QASE_*` environment variables
//!
//! A key found in the environment always wins over the same key in the
//! fallback file.

use super::schema::MigrateConfig;
use super::secret::secret_string;
use crate::domain::errors::MigrateError;
use crate::domain::result::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Config file used when none is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "qase-migrate.toml";

/// Fallback file used when none is given explicitly
pub const DEFAULT_FALLBACK_PATH: &str = "fallback.txt";

pub const ENV_API_TOKEN: &str = "QASE_API_TOKEN";
pub const ENV_SOURCE_PROJECT: &str = "QASE_SOURCE_PROJECT";
pub const ENV_TARGET_PROJECT: &str = "QASE_TARGET_PROJECT";
pub const ENV_CUSTOM_FIELD_ID: &str = "QASE_CF_ID";
pub const ENV_SOURCE_RUN: &str = "QASE_SOURCE_RUN";
pub const ENV_TARGET_RUN: &str = "QASE_TARGET_RUN";
pub const ENV_BASE_URL: &str = "QASE_BASE_URL";
pub const ENV_MAPPING_PATH: &str = "QASE_MAPPING_PATH";
pub const ENV_LOG_LEVEL: &str = "QASE_LOG_LEVEL";
pub const ENV_DRY_RUN: &str = "QASE_DRY_RUN";

/// Loads and validates the configuration
///
/// # Arguments
///
/// * `config_path` - TOML file; must exist when given. When `None`,
///   [`DEFAULT_CONFIG_PATH`] is read if present.
/// * `fallback_path` - KEY=VALUE file consulted for keys missing from the
///   environment; silently skipped when absent.
///
/// # Errors
///
/// Returns a configuration error if a file cannot be read or parsed, a
/// `${VAR}` placeholder is unset, a numeric override does not parse, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use qase_migrate::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(None, Some(Path::new("fallback.txt")))
///     .expect("Failed to load config");
/// ```
pub fn load_config(config_path: Option<&Path>, fallback_path: Option<&Path>) -> Result<MigrateConfig> {
    let config = load_unvalidated(config_path, fallback_path)?;

    config.validate().map_err(|e| {
        MigrateError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads all layers without validating the result
///
/// Used where a partial configuration is still useful, such as picking up
/// logging settings before the command reports what is missing.
///
/// # Errors
///
/// Same as [`load_config`], minus validation failures.
pub fn load_unvalidated(
    config_path: Option<&Path>,
    fallback_path: Option<&Path>,
) -> Result<MigrateConfig> {
    let mut config = load_base_config(config_path)?;

    let fallbacks = match fallback_path {
        Some(path) => load_fallbacks(path)?,
        None => HashMap::new(),
    };

    apply_overrides(&mut config, &Variables::new(fallbacks))?;
    Ok(config)
}

/// Parses TOML configuration text after `${VAR}` substitution
pub fn parse_config_str(contents: &str) -> Result<MigrateConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| MigrateError::Configuration(format!("Failed to parse TOML: {e}")))
}

fn load_base_config(config_path: Option<&Path>) -> Result<MigrateConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(MigrateError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            path
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if !default_path.exists() {
                tracing::debug!(
                    path = DEFAULT_CONFIG_PATH,
                    "No configuration file, using environment and fallback values"
                );
                return Ok(MigrateConfig::default());
            }
            default_path
        }
    };

    let contents = fs::read_to_string(path).map_err(|e| {
        MigrateError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration file");
    parse_config_str(&contents)
}

/// Reads the KEY=VALUE fallback file
///
/// Blank lines and `#` comments are ignored; keys and values are trimmed
/// and otherwise kept as written, with no quoting or `$` expansion. Lines
/// without `=` are skipped. A missing file yields an empty map.
///
/// # Errors
///
/// Returns a configuration error if the file exists but cannot be read.
pub fn load_fallbacks(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Fallback file not found, skipping");
        return Ok(HashMap::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MigrateError::Configuration(format!(
            "Failed to read fallback file {}: {}",
            path.display(),
            e
        ))
    })?;

    let fallbacks = parse_fallbacks(&contents);

    tracing::debug!(
        path = %path.display(),
        keys = fallbacks.len(),
        "Loaded fallback values"
    );

    Ok(fallbacks)
}

fn parse_fallbacks(contents: &str) -> HashMap<String, String> {
    let mut fallbacks = HashMap::new();

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                fallbacks.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => tracing::debug!(line = number + 1, "Skipping fallback line without '='"),
        }
    }

    fallbacks
}

/// Environment lookup with fallback-file values behind it
pub struct Variables {
    fallbacks: HashMap<String, String>,
}

impl Variables {
    /// Wrap fallback values
    pub fn new(fallbacks: HashMap<String, String>) -> Self {
        Self { fallbacks }
    }

    /// The environment value if the variable is set, else the fallback value
    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.fallbacks.get(key).cloned())
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MigrateError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MigrateError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `QASE_*` overrides from the environment or fallback file
fn apply_overrides(config: &mut MigrateConfig, vars: &Variables) -> Result<()> {
    if let Some(val) = vars.get(ENV_API_TOKEN) {
        config.qase.api_token = Some(secret_string(val));
    }
    if let Some(val) = vars.get(ENV_BASE_URL) {
        config.qase.base_url = val.trim_end_matches('/').to_string();
    }

    if let Some(val) = vars.get(ENV_SOURCE_PROJECT) {
        config.migration.source_project = Some(val);
    }
    if let Some(val) = vars.get(ENV_TARGET_PROJECT) {
        config.migration.target_project = Some(val);
    }
    if let Some(val) = vars.get(ENV_CUSTOM_FIELD_ID) {
        config.migration.custom_field_id = Some(parse_number(ENV_CUSTOM_FIELD_ID, &val)?);
    }
    if let Some(val) = vars.get(ENV_SOURCE_RUN) {
        config.migration.source_run_id = Some(parse_number(ENV_SOURCE_RUN, &val)?);
    }
    if let Some(val) = vars.get(ENV_TARGET_RUN) {
        config.migration.target_run_id = Some(parse_number(ENV_TARGET_RUN, &val)?);
    }
    if let Some(val) = vars.get(ENV_MAPPING_PATH) {
        config.migration.mapping_path = val;
    }

    if let Some(val) = vars.get(ENV_LOG_LEVEL) {
        config.application.log_level = val;
    }
    if let Some(val) = vars.get(ENV_DRY_RUN) {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|e| {
        MigrateError::Configuration(format!("Error parsing {key}: '{value}' is not a valid id ({e})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("QM_TEST_VAR", "test_value");
        let input = "api_token = \"${QM_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_token = \"test_value\"\n");
        std::env::remove_var("QM_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("QM_MISSING_VAR");
        let input = "api_token = \"${QM_MISSING_VAR}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# token = \"${QM_NEVER_SET}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let result = load_config(Some(Path::new("nonexistent.toml")), None);
        assert!(matches!(result, Err(MigrateError::Configuration(_))));
    }

    #[test]
    fn test_load_fallbacks_parses_pairs() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# credentials").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "QASE_SOURCE_PROJECT=SRC").unwrap();
        writeln!(file, "QASE_CF_ID=7").unwrap();
        file.flush().unwrap();

        let fallbacks = load_fallbacks(file.path()).unwrap();
        assert_eq!(fallbacks.get("QASE_SOURCE_PROJECT").map(String::as_str), Some("SRC"));
        assert_eq!(fallbacks.get("QASE_CF_ID").map(String::as_str), Some("7"));
        assert_eq!(fallbacks.len(), 2);
    }

    #[test]
    fn test_fallback_values_kept_verbatim() {
        let fallbacks = parse_fallbacks(
            "QASE_API_TOKEN=ab$cd\n  QASE_CF_ID = 7  \nQASE_SOURCE_PROJECT=\"SRC\"\nnot a pair\nQASE_BASE_URL=http://h/v1?a=b\n",
        );
        assert_eq!(fallbacks.get("QASE_API_TOKEN").map(String::as_str), Some("ab$cd"));
        assert_eq!(fallbacks.get("QASE_CF_ID").map(String::as_str), Some("7"));
        assert_eq!(
            fallbacks.get("QASE_SOURCE_PROJECT").map(String::as_str),
            Some("\"SRC\"")
        );
        assert_eq!(
            fallbacks.get("QASE_BASE_URL").map(String::as_str),
            Some("http://h/v1?a=b")
        );
        assert_eq!(fallbacks.len(), 4);
    }

    #[test]
    fn test_load_fallbacks_reads_dollar_sign_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "QASE_API_TOKEN=ab$cd").unwrap();
        writeln!(file, "QASE_CF_ID = 7").unwrap();
        file.flush().unwrap();

        let fallbacks = load_fallbacks(file.path()).unwrap();
        assert_eq!(fallbacks.get("QASE_API_TOKEN").map(String::as_str), Some("ab$cd"));
        assert_eq!(fallbacks.get("QASE_CF_ID").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_load_fallbacks_missing_file() {
        let fallbacks = load_fallbacks(Path::new("definitely-not-here.txt")).unwrap();
        assert!(fallbacks.is_empty());
    }

    #[test]
    fn test_environment_beats_fallback() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("QM_PRECEDENCE_KEY", "from-env");

        let mut fallbacks = HashMap::new();
        fallbacks.insert("QM_PRECEDENCE_KEY".to_string(), "from-file".to_string());
        fallbacks.insert("QM_ONLY_IN_FILE".to_string(), "file".to_string());
        let vars = Variables::new(fallbacks);

        assert_eq!(vars.get("QM_PRECEDENCE_KEY").as_deref(), Some("from-env"));
        assert_eq!(vars.get("QM_ONLY_IN_FILE").as_deref(), Some("file"));
        assert_eq!(vars.get("QM_NOWHERE"), None);

        std::env::remove_var("QM_PRECEDENCE_KEY");
    }

    #[test]
    fn test_parse_number_error_names_key() {
        let err = parse_number(ENV_CUSTOM_FIELD_ID, "seven").unwrap_err();
        assert!(err.to_string().contains("QASE_CF_ID"));
        assert_eq!(parse_number(ENV_SOURCE_RUN, " 12 ").unwrap(), 12);
    }

    #[test]
    fn test_parse_config_str_sections() {
        let config = parse_config_str(
            r#"
[qase]
base_url = "http://localhost:9999/v1"
api_token = "abc"

[migration]
source_project = "SRC"
target_project = "TGT"
custom_field_id = 7
source_run_id = 1
target_run_id = 2
batch_size = 50
"#,
        )
        .unwrap();

        assert_eq!(config.qase.base_url, "http://localhost:9999/v1");
        assert_eq!(config.migration.batch_size, 50);
        assert_eq!(config.migration.page_size, 100);
        assert!(config.validate().is_ok());
    }
}
