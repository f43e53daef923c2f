//! Periodic reconciliation sweep
//!
//! Optional background task that runs a full reconciliation pass on a fixed
//! interval, so drift from abandoned deltas (or crashes between the patient
//! write and the counter write) is corrected without manual intervention.
//! Disabled by default; enabled via the `[sweep]` config section.

use crate::config::SweepConfig;
use crate::core::reconcile::engine::ReconciliationEngine;
use crate::domain::SentinelError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Periodic sweep over all communities
pub struct ReconciliationSweep {
    engine: Arc<ReconciliationEngine>,
    interval: Duration,
}

impl ReconciliationSweep {
    /// Create a sweep from the configuration section
    pub fn from_config(engine: Arc<ReconciliationEngine>, config: &SweepConfig) -> Self {
        Self {
            engine,
            interval: Duration::from_secs(config.interval_seconds),
        }
    }

    /// Create a sweep with an explicit interval
    pub fn new(engine: Arc<ReconciliationEngine>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Run until the shutdown signal fires
    ///
    /// The first pass runs after one full interval, not immediately; a
    /// process that starts and stops quickly should not pay for a scan.
    /// A pass in flight when the signal fires is cancelled mid-scan with
    /// no partial writes.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // interval fires immediately on the first tick
        ticker.tick().await;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Reconciliation sweep started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.engine.reconcile_all(Some(&shutdown)).await {
                        Ok(outcomes) => {
                            let corrected = outcomes.iter().filter(|o| o.corrected).count();
                            if corrected > 0 {
                                tracing::warn!(
                                    corrected = corrected,
                                    "Sweep corrected drifted counters"
                                );
                            }
                        }
                        Err(SentinelError::Cancelled(_)) => {
                            tracing::info!("Sweep pass cancelled by shutdown");
                            break;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Sweep pass failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Reconciliation sweep stopped");
    }

    /// Spawn the sweep as a background task
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reconcile::retry::RetryPolicy;
    use crate::domain::ids::CommunityId;
    use crate::domain::{Community, NewPatient, TestEntry};
    use crate::stores::memory::{MemoryCommunityStore, MemoryPatientStore};
    use crate::stores::traits::CommunityStore;
    use crate::stores::traits::PatientStore;

    #[tokio::test]
    async fn test_sweep_corrects_drift_then_stops() {
        let patients = Arc::new(MemoryPatientStore::new());
        let communities = Arc::new(MemoryCommunityStore::new());
        let id = CommunityId::new("ikorodu").unwrap();
        communities
            .insert_community(Community::new(id.clone(), "Ikorodu", "Lagos"))
            .await
            .unwrap();
        patients
            .insert_patient(
                NewPatient::new("A", "B", id.clone())
                    .with_entries(vec![TestEntry::new("malaria-rdt", None); 3])
                    .into_patient("Lagos"),
            )
            .await
            .unwrap();
        communities.set_counter(&id, 40).await.unwrap();

        let engine = Arc::new(ReconciliationEngine::new(
            patients,
            communities.clone(),
            RetryPolicy::default(),
        ));

        let (tx, rx) = watch::channel(false);
        let handle =
            ReconciliationSweep::new(engine, Duration::from_millis(20)).spawn(rx);

        // Give the sweep time for at least one pass
        tokio::time::sleep(Duration::from_millis(120)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let c = communities.get_community(&id).await.unwrap().unwrap();
        assert_eq!(c.total_tests_conducted, 3);
    }

    #[tokio::test]
    async fn test_sweep_stops_promptly_without_a_pass() {
        let patients = Arc::new(MemoryPatientStore::new());
        let communities = Arc::new(MemoryCommunityStore::new());
        let engine = Arc::new(ReconciliationEngine::new(
            patients,
            communities,
            RetryPolicy::default(),
        ));

        let (tx, rx) = watch::channel(false);
        let handle = ReconciliationSweep::new(engine, Duration::from_secs(3600)).spawn(rx);

        tx.send(true).unwrap();
        // The sweep must exit long before its hour-long interval elapses
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep did not stop on shutdown")
            .unwrap();
    }
}
