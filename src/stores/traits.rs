//! Store abstraction traits
//!
//! This module defines the traits the two storage backends implement. The
//! stores enforce only their local invariants (`test_count` matching the
//! entry list for patients, id uniqueness and referential existence checks
//! for communities) and expose the primitives the reconciliation engine
//! composes. They know nothing about each other's invariants, which keeps
//! the engine testable against fake stores.

use crate::domain::ids::{CommunityId, PatientId};
use crate::domain::{Community, Patient, Result};
use async_trait::async_trait;

/// Patient record storage
///
/// Ordinary keyed storage for patient records. Patients are independently
/// owned per-patient; no cross-patient coordination is required of
/// implementations.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Insert a new patient record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id is already present.
    async fn insert_patient(&self, patient: Patient) -> Result<()>;

    /// Get a patient by id
    ///
    /// Returns `Ok(None)` if no patient with the id exists.
    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>>;

    /// Replace an existing patient record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownPatient` if the patient does not exist.
    async fn put_patient(&self, patient: Patient) -> Result<()>;

    /// Delete a patient record
    ///
    /// Returns `true` if a record was deleted, `false` if the id was absent.
    async fn delete_patient(&self, id: &PatientId) -> Result<bool>;

    /// List all patients
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    /// List patients referencing a community
    async fn list_patients_by_community(&self, community: &CommunityId) -> Result<Vec<Patient>>;

    /// Total number of patient records
    async fn patient_count(&self) -> Result<usize>;
}

/// Community aggregate storage
///
/// Keyed storage for community records plus the counter primitives. The
/// counter update MUST NOT be a read-modify-write at the application level:
/// implementations either use an atomic increment or serialize counter
/// updates per community, so that concurrent deltas are never lost.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Insert a new community record
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id is already present.
    async fn insert_community(&self, community: Community) -> Result<()>;

    /// Get a community by id, with its current counter value
    ///
    /// Returns `Ok(None)` if no community with the id exists.
    async fn get_community(&self, id: &CommunityId) -> Result<Option<Community>>;

    /// Check whether a community exists
    async fn community_exists(&self, id: &CommunityId) -> Result<bool> {
        Ok(self.get_community(id).await?.is_some())
    }

    /// List all communities in insertion order
    async fn list_communities(&self) -> Result<Vec<Community>>;

    /// Delete a community
    ///
    /// A community may be deleted only after its patient references are
    /// detached. Backends that hold both record types (snapshot) enforce
    /// this and refuse with `StoreError::StillReferenced`; backends that
    /// only see communities (memory) rely on the caller honoring the
    /// ordering.
    ///
    /// Returns `true` if a record was deleted, `false` if the id was absent.
    async fn delete_community(&self, id: &CommunityId) -> Result<bool>;

    /// Apply a signed delta to a community's counter
    ///
    /// The update is atomic with respect to concurrent deltas against the
    /// same community. Returns the counter value after the delta.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownCommunity` if the community does not
    /// exist.
    async fn add_to_counter(&self, id: &CommunityId, delta: i64) -> Result<i64>;

    /// Overwrite a community's counter with an absolute value
    ///
    /// This is the reconciliation correction path; normal mutations go
    /// through `add_to_counter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownCommunity` if the community does not
    /// exist.
    async fn set_counter(&self, id: &CommunityId, value: i64) -> Result<()>;

    /// Total number of community records
    async fn community_count(&self) -> Result<usize>;
}
