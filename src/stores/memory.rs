//! In-memory store backend
//!
//! Reference backend used by request handlers embedding the core and by
//! most of the test suite. Community counters live in a dedicated map of
//! `AtomicI64` so `add_to_counter` is a true atomic fetch-add rather than a
//! read-modify-write; record maps are behind `tokio::sync::RwLock`.

use crate::domain::ids::{CommunityId, PatientId};
use crate::domain::{Community, Patient, Result, StoreError};
use crate::stores::traits::{CommunityStore, PatientStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory patient store
#[derive(Default)]
pub struct MemoryPatientStore {
    patients: RwLock<HashMap<PatientId, Patient>>,
}

impl MemoryPatientStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn insert_patient(&self, patient: Patient) -> Result<()> {
        let mut patients = self.patients.write().await;
        if patients.contains_key(&patient.id) {
            return Err(StoreError::DuplicateId(patient.id.to_string()).into());
        }
        patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    async fn get_patient(&self, id: &PatientId) -> Result<Option<Patient>> {
        Ok(self.patients.read().await.get(id).cloned())
    }

    async fn put_patient(&self, patient: Patient) -> Result<()> {
        let mut patients = self.patients.write().await;
        if !patients.contains_key(&patient.id) {
            return Err(StoreError::UnknownPatient(patient.id.to_string()).into());
        }
        patients.insert(patient.id.clone(), patient);
        Ok(())
    }

    async fn delete_patient(&self, id: &PatientId) -> Result<bool> {
        Ok(self.patients.write().await.remove(id).is_some())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.patients.read().await.values().cloned().collect())
    }

    async fn list_patients_by_community(&self, community: &CommunityId) -> Result<Vec<Patient>> {
        Ok(self
            .patients
            .read()
            .await
            .values()
            .filter(|p| &p.community == community)
            .cloned()
            .collect())
    }

    async fn patient_count(&self) -> Result<usize> {
        Ok(self.patients.read().await.len())
    }
}

/// In-memory community store
///
/// Counters are held apart from the records so concurrent deltas contend
/// only on an atomic, never on the record lock. `get_community` and
/// `list_communities` merge the live counter value back into the returned
/// record.
#[derive(Default)]
pub struct MemoryCommunityStore {
    communities: RwLock<HashMap<CommunityId, Community>>,
    counters: RwLock<HashMap<CommunityId, Arc<AtomicI64>>>,
    insertion_order: RwLock<Vec<CommunityId>>,
}

impl MemoryCommunityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    async fn counter_handle(&self, id: &CommunityId) -> Option<Arc<AtomicI64>> {
        self.counters.read().await.get(id).cloned()
    }
}

#[async_trait]
impl CommunityStore for MemoryCommunityStore {
    async fn insert_community(&self, community: Community) -> Result<()> {
        let mut communities = self.communities.write().await;
        if communities.contains_key(&community.id) {
            return Err(StoreError::DuplicateId(community.id.to_string()).into());
        }
        let id = community.id.clone();
        let initial = community.total_tests_conducted;
        communities.insert(id.clone(), community);
        self.counters
            .write()
            .await
            .insert(id.clone(), Arc::new(AtomicI64::new(initial)));
        self.insertion_order.write().await.push(id);
        Ok(())
    }

    async fn get_community(&self, id: &CommunityId) -> Result<Option<Community>> {
        let record = self.communities.read().await.get(id).cloned();
        match record {
            Some(mut community) => {
                if let Some(counter) = self.counter_handle(id).await {
                    community.total_tests_conducted = counter.load(Ordering::SeqCst);
                }
                Ok(Some(community))
            }
            None => Ok(None),
        }
    }

    async fn list_communities(&self) -> Result<Vec<Community>> {
        let order = self.insertion_order.read().await.clone();
        let communities = self.communities.read().await;
        let counters = self.counters.read().await;

        let mut result = Vec::with_capacity(order.len());
        for id in &order {
            if let Some(community) = communities.get(id) {
                let mut community = community.clone();
                if let Some(counter) = counters.get(id) {
                    community.total_tests_conducted = counter.load(Ordering::SeqCst);
                }
                result.push(community);
            }
        }
        Ok(result)
    }

    async fn delete_community(&self, id: &CommunityId) -> Result<bool> {
        let removed = self.communities.write().await.remove(id).is_some();
        if removed {
            self.counters.write().await.remove(id);
            self.insertion_order.write().await.retain(|c| c != id);
        }
        Ok(removed)
    }

    async fn add_to_counter(&self, id: &CommunityId, delta: i64) -> Result<i64> {
        let counter = self
            .counter_handle(id)
            .await
            .ok_or_else(|| StoreError::UnknownCommunity(id.to_string()))?;
        Ok(counter.fetch_add(delta, Ordering::SeqCst) + delta)
    }

    async fn set_counter(&self, id: &CommunityId, value: i64) -> Result<()> {
        let counter = self
            .counter_handle(id)
            .await
            .ok_or_else(|| StoreError::UnknownCommunity(id.to_string()))?;
        counter.store(value, Ordering::SeqCst);
        Ok(())
    }

    async fn community_count(&self) -> Result<usize> {
        Ok(self.communities.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPatient;

    fn community(id: &str, name: &str) -> Community {
        Community::new(CommunityId::new(id).unwrap(), name, "Lagos")
    }

    #[tokio::test]
    async fn test_insert_and_get_patient() {
        let store = MemoryPatientStore::new();
        let patient = NewPatient::new(
            "Adaeze",
            "Okafor",
            CommunityId::new("ikorodu").unwrap(),
        )
        .into_patient("Lagos");
        let id = patient.id.clone();

        store.insert_patient(patient).await.unwrap();
        let retrieved = store.get_patient(&id).await.unwrap().unwrap();
        assert_eq!(retrieved.first_name, "Adaeze");
    }

    #[tokio::test]
    async fn test_duplicate_patient_insert_fails() {
        let store = MemoryPatientStore::new();
        let patient = NewPatient::new("A", "B", CommunityId::new("ikorodu").unwrap())
            .into_patient("Lagos");

        store.insert_patient(patient.clone()).await.unwrap();
        assert!(store.insert_patient(patient).await.is_err());
    }

    #[tokio::test]
    async fn test_put_unknown_patient_fails() {
        let store = MemoryPatientStore::new();
        let patient = NewPatient::new("A", "B", CommunityId::new("ikorodu").unwrap())
            .into_patient("Lagos");
        assert!(store.put_patient(patient).await.is_err());
    }

    #[tokio::test]
    async fn test_list_patients_by_community() {
        let store = MemoryPatientStore::new();
        let ikorodu = CommunityId::new("ikorodu").unwrap();
        let epe = CommunityId::new("epe").unwrap();

        for (first, comm) in [("A", &ikorodu), ("B", &ikorodu), ("C", &epe)] {
            store
                .insert_patient(NewPatient::new(first, "X", comm.clone()).into_patient("Lagos"))
                .await
                .unwrap();
        }

        assert_eq!(
            store.list_patients_by_community(&ikorodu).await.unwrap().len(),
            2
        );
        assert_eq!(store.list_patients_by_community(&epe).await.unwrap().len(), 1);
        assert_eq!(store.patient_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_counter_add_and_set() {
        let store = MemoryCommunityStore::new();
        let id = CommunityId::new("ikorodu").unwrap();
        store.insert_community(community("ikorodu", "Ikorodu")).await.unwrap();

        assert_eq!(store.add_to_counter(&id, 2).await.unwrap(), 2);
        assert_eq!(store.add_to_counter(&id, 3).await.unwrap(), 5);
        assert_eq!(store.add_to_counter(&id, -5).await.unwrap(), 0);

        store.set_counter(&id, 42).await.unwrap();
        let c = store.get_community(&id).await.unwrap().unwrap();
        assert_eq!(c.total_tests_conducted, 42);
    }

    #[tokio::test]
    async fn test_counter_against_unknown_community_fails() {
        let store = MemoryCommunityStore::new();
        let id = CommunityId::new("nowhere").unwrap();
        assert!(store.add_to_counter(&id, 1).await.is_err());
        assert!(store.set_counter(&id, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_list_communities_preserves_insertion_order() {
        let store = MemoryCommunityStore::new();
        for (id, name) in [("ikorodu", "Ikorodu"), ("badagry", "Badagry"), ("epe", "Epe")] {
            store.insert_community(community(id, name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_communities()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ikorodu", "Badagry", "Epe"]);
    }

    #[tokio::test]
    async fn test_concurrent_deltas_are_not_lost() {
        let store = Arc::new(MemoryCommunityStore::new());
        let id = CommunityId::new("ikorodu").unwrap();
        store.insert_community(community("ikorodu", "Ikorodu")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store.add_to_counter(&id, 1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let c = store.get_community(&id).await.unwrap().unwrap();
        assert_eq!(c.total_tests_conducted, 64);
    }
}
