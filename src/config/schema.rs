//! Configuration schema types
//!
//! This module defines the configuration structure mapped from the TOML
//! file.

use serde::{Deserialize, Serialize};

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process memory store (volatile)
    Memory,
    /// JSON snapshot file store (durable)
    Snapshot,
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retry/backoff policy for counter-delta application
    #[serde(default)]
    pub retry: RetryConfig,

    /// Periodic reconciliation sweep
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SentinelConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.retry.validate()?;
        self.sweep.validate()?;
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
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend (memory or snapshot)
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Snapshot file path (snapshot backend only)
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Verify the SHA-256 sidecar when loading a snapshot
    #[serde(default = "default_true")]
    pub verify_checksum: bool,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backend == StorageBackend::Snapshot && self.snapshot_path.trim().is_empty() {
            return Err("storage.snapshot_path must be set for the snapshot backend".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            snapshot_path: default_snapshot_path(),
            verify_checksum: true,
        }
    }
}

/// Retry configuration for counter-delta application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err("retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("retry.max_delay_ms must be >= retry.initial_delay_ms".to_string());
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Periodic reconciliation sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Enable the background sweep
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between sweep runs
    #[serde(default = "default_sweep_interval")]
    pub interval_seconds: u64,
}

impl SweepConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.interval_seconds == 0 {
            return Err("sweep.interval_seconds must be > 0 when the sweep is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_sweep_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when file logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> StorageBackend {
    StorageBackend::Snapshot
}

fn default_snapshot_path() -> String {
    "sentinel-data.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
