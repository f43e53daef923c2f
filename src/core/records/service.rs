//! Record service - inbound mutation surface
//!
//! This is what the HTTP/CRUD layer calls. Each mutation enforces the
//! write ordering the aggregate invariant depends on and invokes the
//! matching reconciliation-engine hook; bypassing the service means
//! bypassing the counter, so nothing else in the crate writes patients.

use crate::core::reconcile::{DeltaOutcome, ReconciliationEngine};
use crate::domain::ids::{CommunityId, PatientId};
use crate::domain::{Community, NewPatient, Patient, Result, SentinelError, TestEntry};
use crate::stores::traits::{CommunityStore, PatientStore};
use std::sync::Arc;

/// Service composing the stores and the reconciliation engine
pub struct RecordService {
    patients: Arc<dyn PatientStore>,
    communities: Arc<dyn CommunityStore>,
    engine: Arc<ReconciliationEngine>,
}

impl RecordService {
    /// Create a new record service
    pub fn new(
        patients: Arc<dyn PatientStore>,
        communities: Arc<dyn CommunityStore>,
        engine: Arc<ReconciliationEngine>,
    ) -> Self {
        Self {
            patients,
            communities,
            engine,
        }
    }

    /// Register a community
    ///
    /// # Errors
    ///
    /// Returns a store error if the id collides.
    pub async fn create_community(&self, community: Community) -> Result<Community> {
        self.communities.insert_community(community.clone()).await?;
        tracing::info!(
            community_id = %community.id,
            name = %community.name,
            "Community created"
        );
        Ok(community)
    }

    /// Register a patient, possibly with initial test entries
    ///
    /// Order matters: the community reference is validated first (a
    /// dangling reference fails the whole operation with no partial
    /// write), then the patient is written, then the counter delta is
    /// applied best-effort.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` if the community does not exist. A
    /// failed counter delta is NOT an error: the patient write already
    /// succeeded and the drift is journaled.
    pub async fn create_patient(&self, draft: NewPatient) -> Result<Patient> {
        let community = self
            .communities
            .get_community(&draft.community)
            .await?
            .ok_or_else(|| SentinelError::community_not_found(draft.community.as_str()))?;

        let patient = draft.into_patient(&community.locale);
        self.patients.insert_patient(patient.clone()).await?;

        tracing::info!(
            patient_id = %patient.id,
            community_id = %patient.community,
            initial_entries = patient.test_count,
            "Patient created"
        );

        if self.engine.on_patient_created(&patient).await == DeltaOutcome::Abandoned {
            tracing::warn!(
                patient_id = %patient.id,
                community_id = %patient.community,
                "Patient created but counter delta abandoned"
            );
        }

        Ok(patient)
    }

    /// Append test entries to a patient's record
    ///
    /// The patient write lands first; the counter delta follows against the
    /// patient's current community.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` if the patient does not exist. An empty
    /// entry list is a validation error.
    pub async fn append_test_entries(
        &self,
        patient_id: &PatientId,
        entries: Vec<TestEntry>,
    ) -> Result<Patient> {
        if entries.is_empty() {
            return Err(SentinelError::Validation(
                "append_test_entries requires at least one entry".to_string(),
            ));
        }

        let mut patient = self
            .patients
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| SentinelError::patient_not_found(patient_id.as_str()))?;

        let appended = entries.len();
        patient.append_entries(entries);
        self.patients.put_patient(patient.clone()).await?;

        tracing::info!(
            patient_id = %patient.id,
            appended = appended,
            test_count = patient.test_count,
            "Test entries appended"
        );

        // Aggregate-side failures never fail the append the caller already
        // got; the counter is repaired by reconciliation
        if let Err(e) = self
            .engine
            .on_test_entries_appended(patient_id, appended)
            .await
        {
            tracing::error!(
                patient_id = %patient_id,
                error = %e,
                "Entries appended but counter delta could not be applied"
            );
        }

        Ok(patient)
    }

    /// Delete a patient record
    ///
    /// The counter delta runs before the delete: a crash between the two
    /// writes leaves a stale counter (recoverable by reconcile) rather than
    /// a patient that vanished without being counted out.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceNotFound` if the patient does not exist.
    pub async fn delete_patient(&self, patient_id: &PatientId) -> Result<()> {
        let patient = self
            .patients
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| SentinelError::patient_not_found(patient_id.as_str()))?;

        self.engine.on_patient_deleted(&patient).await;
        self.patients.delete_patient(patient_id).await?;

        tracing::info!(
            patient_id = %patient_id,
            community_id = %patient.community,
            entries_removed = patient.test_count,
            "Patient deleted"
        );

        Ok(())
    }

    /// Look up a patient
    pub async fn get_patient(&self, patient_id: &PatientId) -> Result<Option<Patient>> {
        self.patients.get_patient(patient_id).await
    }

    /// Look up a community with its current counter
    pub async fn get_community(&self, community_id: &CommunityId) -> Result<Option<Community>> {
        self.communities.get_community(community_id).await
    }
}
