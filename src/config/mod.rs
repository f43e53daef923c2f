//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `SENTINEL_*` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentinel::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sentinel.toml")?;
//!
//! println!("Backend: {:?}", config.storage.backend);
//! println!("Sweep enabled: {}", config.sweep.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! backend = "snapshot"
//! snapshot_path = "data/sentinel.json"
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 100
//!
//! [sweep]
//! enabled = true
//! interval_seconds = 300
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, LoggingConfig, RetryConfig, SentinelConfig, StorageBackend,
    StorageConfig, SweepConfig,
};
