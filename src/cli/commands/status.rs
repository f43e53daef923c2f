//! Status command implementation
//!
//! Audits every community counter against the authoritative recomputation
//! and prints the verification report. Read-only: mismatches are corrected
//! with `sentinel reconcile`.

use crate::config::load_config;
use crate::core::verification::Verifier;
use crate::stores::create_stores;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show mismatched communities
    #[arg(long)]
    pub mismatched_only: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking counter status");

        println!("📊 Counter Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2); // Configuration error exit code
            }
        };

        let (patients, communities) = match create_stores(&config).await {
            Ok(stores) => stores,
            Err(e) => {
                println!("❌ Failed to open stores");
                println!("   Error: {}", e);
                return Ok(4); // Store error exit code
            }
        };

        let verifier = Verifier::new(patients, communities);
        let report = match verifier.verify_counters().await {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Verification scan failed");
                println!("   Error: {}", e);
                return Ok(5); // Fatal error exit code
            }
        };

        report.log_summary();

        if report.checked == 0 {
            println!("No communities found.");
            return Ok(0);
        }

        if self.mismatched_only {
            if report.is_clean() {
                println!("✅ All {} counter(s) match", report.checked);
            } else {
                for m in &report.mismatches {
                    println!(
                        "❌ {} ({}): stored {} != recomputed {} (drift {})",
                        m.name,
                        m.community_id,
                        m.stored,
                        m.recomputed,
                        m.drift()
                    );
                }
            }
        } else {
            println!("{}", report.format_summary());
        }

        if !report.is_clean() {
            println!();
            println!("Run 'sentinel reconcile --all' to correct drifted counters.");
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs {
            mismatched_only: false,
        };
        assert!(!args.mismatched_only);
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = StatusArgs {
            mismatched_only: false,
        };
        assert_eq!(args.execute("does-not-exist.toml").await.unwrap(), 2);
    }
}
