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
    #[arg(short, long, default_value = "sentinel.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Sentinel configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: sentinel validate-config");
                println!("  3. Check counter health: sentinel status");
                println!("  4. Correct drift: sentinel reconcile --all");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the starter configuration
    fn generate_config() -> String {
        r#"# Sentinel Configuration File
# Community health surveillance core

[application]
log_level = "info"

# Runtime environment: development | staging | production
environment = "development"

[storage]
# Storage backend: snapshot (durable JSON file) | memory (volatile)
backend = "snapshot"
snapshot_path = "sentinel-data.json"
# Verify the SHA-256 sidecar when loading the snapshot
verify_checksum = true

[retry]
# Bounded retries for counter-delta writes before the delta is abandoned
# and journaled for reconciliation
max_retries = 3
initial_delay_ms = 100
max_delay_ms = 5000
backoff_multiplier = 2.0

[sweep]
# Periodic background reconciliation of all community counters
enabled = false
interval_seconds = 300

[logging]
# Optional JSON file logging with rotation (console is always on)
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}
