//! Reconcile command implementation
//!
//! The out-of-band correction entry point: recomputes community counters
//! from patient records and overwrites any that drifted. Can target one
//! community, all of them, or run as a long-lived periodic sweep.

use crate::config::load_config;
use crate::core::reconcile::{ReconciliationEngine, ReconciliationSweep, RetryPolicy};
use crate::domain::ids::CommunityId;
use crate::domain::SentinelError;
use crate::stores::create_stores;
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the reconcile command
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Reconcile a single community by id
    #[arg(long, conflicts_with = "all")]
    pub community: Option<String>,

    /// Reconcile every community
    #[arg(long)]
    pub all: bool,

    /// Run as a periodic sweep (interval from the [sweep] config section)
    /// until interrupted
    #[arg(long, conflicts_with = "community")]
    pub sweep: bool,
}

impl ReconcileArgs {
    /// Execute the reconcile command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting reconcile command");

        if self.community.is_none() && !self.all && !self.sweep {
            eprintln!("Nothing to do: pass --community <id>, --all, or --sweep");
            return Ok(2);
        }

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let (patients, communities) = match create_stores(&config).await {
            Ok(stores) => stores,
            Err(e) => {
                eprintln!("Failed to open stores: {e}");
                return Ok(4); // Store error exit code
            }
        };

        let engine = Arc::new(ReconciliationEngine::new(
            patients,
            communities,
            RetryPolicy::from_config(&config.retry),
        ));

        if self.sweep {
            println!(
                "🔁 Reconciliation sweep running every {}s (Ctrl+C to stop)",
                config.sweep.interval_seconds
            );
            ReconciliationSweep::from_config(engine, &config.sweep)
                .run(shutdown_signal)
                .await;
            return Ok(0);
        }

        let outcomes = if let Some(ref raw_id) = self.community {
            let community_id = match CommunityId::from_str(raw_id) {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("Invalid community id: {e}");
                    return Ok(2);
                }
            };
            match engine
                .reconcile_with_shutdown(&community_id, Some(&shutdown_signal))
                .await
            {
                Ok(outcome) => vec![outcome],
                Err(SentinelError::ReferenceNotFound { .. }) => {
                    eprintln!("Community not found: {raw_id}");
                    return Ok(2);
                }
                Err(e) => {
                    eprintln!("Reconcile failed: {e}");
                    return Ok(5); // Fatal error exit code
                }
            }
        } else {
            match engine.reconcile_all(Some(&shutdown_signal)).await {
                Ok(outcomes) => outcomes,
                Err(SentinelError::Cancelled(_)) => {
                    println!("Reconcile interrupted; no partial corrections were written");
                    return Ok(0);
                }
                Err(e) => {
                    eprintln!("Reconcile failed: {e}");
                    return Ok(5);
                }
            }
        };

        let corrected = outcomes.iter().filter(|o| o.corrected).count();
        println!(
            "Reconciled {} community(ies), corrected {}",
            outcomes.len(),
            corrected
        );
        for outcome in outcomes.iter().filter(|o| o.corrected) {
            println!(
                "  {}: {} -> {} (drift {})",
                outcome.community_id,
                outcome.previous,
                outcome.recomputed,
                outcome.drift()
            );
        }

        Ok(0)
    }
}
