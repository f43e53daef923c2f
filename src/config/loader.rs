//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{SentinelConfig, StorageBackend};
use crate::domain::errors::SentinelError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SentinelConfig
/// 4. Applies environment variable overrides (SENTINEL_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use sentinel::config::loader::load_config;
///
/// let config = load_config("sentinel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SentinelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SentinelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SentinelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SentinelConfig = toml::from_str(&contents)
        .map_err(|e| SentinelError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SentinelError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
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
        return Err(SentinelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the SENTINEL_* prefix
///
/// Environment variables follow the pattern: SENTINEL_<SECTION>_<KEY>
/// For example: SENTINEL_STORAGE_SNAPSHOT_PATH, SENTINEL_SWEEP_ENABLED
fn apply_env_overrides(config: &mut SentinelConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("SENTINEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("SENTINEL_STORAGE_BACKEND") {
        match val.to_lowercase().as_str() {
            "memory" => config.storage.backend = StorageBackend::Memory,
            "snapshot" => config.storage.backend = StorageBackend::Snapshot,
            other => {
                tracing::warn!(backend = other, "Ignoring unknown SENTINEL_STORAGE_BACKEND");
            }
        }
    }
    if let Ok(val) = std::env::var("SENTINEL_STORAGE_SNAPSHOT_PATH") {
        config.storage.snapshot_path = val;
    }
    if let Ok(val) = std::env::var("SENTINEL_STORAGE_VERIFY_CHECKSUM") {
        config.storage.verify_checksum = val.parse().unwrap_or(true);
    }

    // Retry overrides
    if let Ok(val) = std::env::var("SENTINEL_RETRY_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.retry.max_retries = retries;
        }
    }
    if let Ok(val) = std::env::var("SENTINEL_RETRY_INITIAL_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.initial_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("SENTINEL_RETRY_MAX_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.max_delay_ms = delay;
        }
    }

    // Sweep overrides
    if let Ok(val) = std::env::var("SENTINEL_SWEEP_ENABLED") {
        config.sweep.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SENTINEL_SWEEP_INTERVAL_SECONDS") {
        if let Ok(interval) = val.parse() {
            config.sweep.interval_seconds = interval;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SENTINEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SENTINEL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SENTINEL_TEST_VAR", "test_value");
        let input = "snapshot_path = \"${SENTINEL_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "snapshot_path = \"test_value\"\n");
        std::env::remove_var("SENTINEL_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SENTINEL_MISSING_VAR");
        let input = "snapshot_path = \"${SENTINEL_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("SENTINEL_COMMENTED_VAR");
        let input = "# snapshot_path = \"${SENTINEL_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[storage]
backend = "memory"

[retry]
max_retries = 5

[sweep]
enabled = true
interval_seconds = 60
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.retry.max_retries, 5);
        assert!(config.sweep.enabled);
        assert_eq!(config.sweep.interval_seconds, 60);
    }

    #[test]
    fn test_load_config_invalid_values_rejected() {
        let toml_content = r#"
[application]
log_level = "shout"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
