//! Counter reconciliation engine
//!
//! Applies signed deltas to a community's `total_tests_conducted` whenever a
//! patient's test-entry count changes, and owns the authoritative
//! correction path (`reconcile`) that recomputes the counter from patient
//! records.
//!
//! The patient write and the counter write are not atomic with respect to
//! each other. A delta that cannot be applied after bounded retries is
//! abandoned and journaled, never propagated to the caller: the
//! patient-facing effect already happened, and the counter is derived data
//! that the next reconciliation pass repairs.

use crate::core::reconcile::journal::DriftJournal;
use crate::core::reconcile::retry::RetryPolicy;
use crate::domain::ids::{CommunityId, PatientId};
use crate::domain::{Patient, Result, SentinelError};
use crate::stores::traits::{CommunityStore, PatientStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of a best-effort delta application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// The delta was applied; holds the counter value afterwards
    Applied(i64),
    /// The delta was zero, nothing to do
    Noop,
    /// Retries were exhausted; the delta is journaled for reconciliation
    Abandoned,
}

/// Result of reconciling one community
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The reconciled community
    pub community_id: CommunityId,
    /// Counter value found in the store before correction
    pub previous: i64,
    /// Recomputed sum of patient test counts at scan time
    pub recomputed: i64,
    /// Whether the stored counter was overwritten
    pub corrected: bool,
    /// How many patient records were scanned
    pub patients_scanned: usize,
}

impl ReconcileOutcome {
    /// Signed drift the scan found (stored minus true sum)
    pub fn drift(&self) -> i64 {
        self.previous - self.recomputed
    }
}

/// Counter reconciliation engine
///
/// Composes the two store traits; carries no cross-request state beyond the
/// drift journal, so one engine is shared by all request handlers.
pub struct ReconciliationEngine {
    patients: Arc<dyn PatientStore>,
    communities: Arc<dyn CommunityStore>,
    journal: Arc<DriftJournal>,
    retry: RetryPolicy,
}

impl ReconciliationEngine {
    /// Create a new engine over the given stores
    pub fn new(
        patients: Arc<dyn PatientStore>,
        communities: Arc<dyn CommunityStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            patients,
            communities,
            journal: Arc::new(DriftJournal::new()),
            retry,
        }
    }

    /// The drift journal tracking abandoned deltas
    pub fn journal(&self) -> Arc<DriftJournal> {
        self.journal.clone()
    }

    /// Hook: a patient record was created
    ///
    /// Applies `+test_count` to the patient's community. The caller has
    /// already validated that the community exists and written the patient.
    pub async fn on_patient_created(&self, patient: &Patient) -> DeltaOutcome {
        self.apply_delta(&patient.community, patient.test_count as i64, "patient-created")
            .await
    }

    /// Hook: test entries were appended to a patient
    ///
    /// The patient is re-read so the delta lands on the patient's *current*
    /// community, not a community cached from an earlier request.
    ///
    /// # Errors
    ///
    /// Returns a store error if the re-read fails. A patient that vanished
    /// between the append and this hook (concurrent delete) is treated as a
    /// no-op: the delete hook has already counted the entries out.
    pub async fn on_test_entries_appended(
        &self,
        patient_id: &PatientId,
        appended: usize,
    ) -> Result<DeltaOutcome> {
        if appended == 0 {
            return Ok(DeltaOutcome::Noop);
        }

        let patient = match self.patients.get_patient(patient_id).await? {
            Some(p) => p,
            None => {
                tracing::warn!(
                    patient_id = %patient_id,
                    "Patient disappeared before its append delta was applied"
                );
                return Ok(DeltaOutcome::Noop);
            }
        };

        Ok(self
            .apply_delta(&patient.community, appended as i64, "entries-appended")
            .await)
    }

    /// Hook: a patient record is about to be deleted
    ///
    /// Applies `-test_count` to the patient's community. Runs *before* the
    /// delete: a crash between the two writes then leaves a stale counter
    /// (recoverable drift) rather than a deleted patient that was never
    /// counted out.
    pub async fn on_patient_deleted(&self, patient: &Patient) -> DeltaOutcome {
        self.apply_delta(
            &patient.community,
            -(patient.test_count as i64),
            "patient-deleted",
        )
        .await
    }

    /// Apply a delta with bounded, jittered retries
    ///
    /// Exhaustion is not an error to the caller; the delta is journaled and
    /// logged as an inconsistency requiring reconciliation.
    async fn apply_delta(
        &self,
        community_id: &CommunityId,
        delta: i64,
        trigger: &str,
    ) -> DeltaOutcome {
        if delta == 0 {
            return DeltaOutcome::Noop;
        }

        let mut attempt = 0;
        loop {
            match self.communities.add_to_counter(community_id, delta).await {
                Ok(value) => {
                    tracing::debug!(
                        community_id = %community_id,
                        delta = delta,
                        counter = value,
                        trigger = trigger,
                        "Applied counter delta"
                    );
                    return DeltaOutcome::Applied(value);
                }
                Err(e) if attempt < self.retry.max_retries => {
                    let delay = self.retry.jittered_delay(attempt);
                    tracing::warn!(
                        community_id = %community_id,
                        delta = delta,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Counter delta failed, retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        community_id = %community_id,
                        delta = delta,
                        retries = attempt,
                        error = %e,
                        trigger = trigger,
                        "Abandoning counter delta; community flagged for reconciliation"
                    );
                    self.journal
                        .record_abandoned_delta(community_id, delta, e.to_string())
                        .await;
                    return DeltaOutcome::Abandoned;
                }
            }
        }
    }

    /// Recompute and overwrite a community's counter
    ///
    /// Sums `test_count` across all patients referencing the community at
    /// scan time and overwrites the stored counter if it disagrees.
    /// Idempotent, and safe to run concurrently with live mutations: the
    /// result is consistent with whatever state existed at scan time.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` if the community does not exist.
    pub async fn reconcile(&self, community_id: &CommunityId) -> Result<ReconcileOutcome> {
        self.reconcile_with_shutdown(community_id, None).await
    }

    /// Like [`reconcile`](Self::reconcile), but cancellable
    ///
    /// The scan checks the shutdown signal between patients and performs a
    /// single overwrite at the end, so cancellation has no partial side
    /// effects.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the shutdown signal fired mid-scan.
    pub async fn reconcile_with_shutdown(
        &self,
        community_id: &CommunityId,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<ReconcileOutcome> {
        let community = self
            .communities
            .get_community(community_id)
            .await?
            .ok_or_else(|| SentinelError::community_not_found(community_id.as_str()))?;

        let patients = self.patients.list_patients_by_community(community_id).await?;

        let mut recomputed: i64 = 0;
        for patient in &patients {
            if let Some(rx) = shutdown {
                if *rx.borrow() {
                    tracing::info!(
                        community_id = %community_id,
                        "Reconcile cancelled mid-scan, no changes written"
                    );
                    return Err(SentinelError::Cancelled(format!(
                        "reconcile of {community_id}"
                    )));
                }
            }
            recomputed += patient.test_count as i64;
        }

        let previous = community.total_tests_conducted;
        let corrected = previous != recomputed;

        if corrected {
            tracing::warn!(
                community_id = %community_id,
                stored = previous,
                recomputed = recomputed,
                drift = previous - recomputed,
                "Counter drift detected, correcting in place"
            );
            self.communities.set_counter(community_id, recomputed).await?;
        } else {
            tracing::debug!(
                community_id = %community_id,
                counter = previous,
                "Counter verified, no drift"
            );
        }

        if let Some(record) = self.journal.clear(community_id).await {
            tracing::info!(
                community_id = %community_id,
                abandoned_deltas = record.failures,
                pending_delta = record.pending_delta,
                "Cleared drift journal entry after reconciliation"
            );
        }

        Ok(ReconcileOutcome {
            community_id: community_id.clone(),
            previous,
            recomputed,
            corrected,
            patients_scanned: patients.len(),
        })
    }

    /// Reconcile every community
    ///
    /// Runs sequentially in community insertion order and stops early when
    /// the shutdown signal fires.
    ///
    /// # Errors
    ///
    /// Returns the first store error or `Cancelled`.
    pub async fn reconcile_all(
        &self,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<Vec<ReconcileOutcome>> {
        let communities = self.communities.list_communities().await?;
        let mut outcomes = Vec::with_capacity(communities.len());

        for community in &communities {
            outcomes.push(
                self.reconcile_with_shutdown(&community.id, shutdown)
                    .await?,
            );
        }

        let corrected = outcomes.iter().filter(|o| o.corrected).count();
        tracing::info!(
            communities = outcomes.len(),
            corrected = corrected,
            "Reconciliation pass completed"
        );

        Ok(outcomes)
    }
}
