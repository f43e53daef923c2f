//! Integration tests for the counter lifecycle
//!
//! Walks the counter through the full patient lifecycle (create with
//! entries, append, delete) and exercises the reconciliation correction
//! path, including idempotence and commutativity of deltas.

use sentinel::core::reconcile::{ReconciliationEngine, RetryPolicy};
use sentinel::core::records::RecordService;
use sentinel::domain::{Community, CommunityId, NewPatient, TestEntry};
use sentinel::stores::memory::{MemoryCommunityStore, MemoryPatientStore};
use sentinel::stores::traits::CommunityStore;
use std::sync::Arc;

struct Harness {
    communities: Arc<MemoryCommunityStore>,
    engine: Arc<ReconciliationEngine>,
    service: RecordService,
    ikorodu: CommunityId,
}

async fn harness() -> Harness {
    let patients = Arc::new(MemoryPatientStore::new());
    let communities = Arc::new(MemoryCommunityStore::new());
    let engine = Arc::new(ReconciliationEngine::new(
        patients.clone(),
        communities.clone(),
        RetryPolicy::default(),
    ));
    let service = RecordService::new(patients, communities.clone(), engine.clone());

    let ikorodu = CommunityId::new("ikorodu").unwrap();
    service
        .create_community(Community::new(ikorodu.clone(), "Ikorodu", "Lagos"))
        .await
        .unwrap();

    Harness {
        communities,
        engine,
        service,
        ikorodu,
    }
}

fn entries(n: usize) -> Vec<TestEntry> {
    (0..n)
        .map(|_| TestEntry::new("malaria-rdt", Some("Positive".to_string())))
        .collect()
}

async fn counter(h: &Harness) -> i64 {
    h.communities
        .get_community(&h.ikorodu)
        .await
        .unwrap()
        .unwrap()
        .total_tests_conducted
}

#[tokio::test]
async fn test_create_append_delete_lifecycle() {
    let h = harness().await;

    // Create a patient with 2 test entries: counter becomes 2
    let patient = h
        .service
        .create_patient(NewPatient::new("Adaeze", "Okafor", h.ikorodu.clone()).with_entries(entries(2)))
        .await
        .unwrap();
    assert_eq!(counter(&h).await, 2);

    // Append 3 more entries: counter becomes 5
    h.service
        .append_test_entries(&patient.id, entries(3))
        .await
        .unwrap();
    assert_eq!(counter(&h).await, 5);

    // Delete the patient: counter returns to 0
    h.service.delete_patient(&patient.id).await.unwrap();
    assert_eq!(counter(&h).await, 0);
}

#[tokio::test]
async fn test_counter_matches_sum_after_mixed_operations() {
    let h = harness().await;

    let a = h
        .service
        .create_patient(NewPatient::new("A", "One", h.ikorodu.clone()).with_entries(entries(1)))
        .await
        .unwrap();
    let b = h
        .service
        .create_patient(NewPatient::new("B", "Two", h.ikorodu.clone()).with_entries(entries(4)))
        .await
        .unwrap();
    let _c = h
        .service
        .create_patient(NewPatient::new("C", "Three", h.ikorodu.clone()))
        .await
        .unwrap();

    h.service.append_test_entries(&a.id, entries(2)).await.unwrap();
    h.service.delete_patient(&b.id).await.unwrap();

    // Live counters: 1 + 2 (a) + 0 (c) = 3
    assert_eq!(counter(&h).await, 3);

    // Reconcile agrees and changes nothing
    let outcome = h.engine.reconcile(&h.ikorodu).await.unwrap();
    assert!(!outcome.corrected);
    assert_eq!(outcome.recomputed, 3);
}

#[tokio::test]
async fn test_corrupted_counter_is_restored_by_reconcile() {
    let h = harness().await;

    h.service
        .create_patient(NewPatient::new("A", "One", h.ikorodu.clone()).with_entries(entries(3)))
        .await
        .unwrap();

    // Manually corrupt the stored counter
    h.communities.set_counter(&h.ikorodu, -17).await.unwrap();
    assert_eq!(counter(&h).await, -17);

    let outcome = h.engine.reconcile(&h.ikorodu).await.unwrap();
    assert!(outcome.corrected);
    assert_eq!(outcome.previous, -17);
    assert_eq!(outcome.recomputed, 3);
    assert_eq!(counter(&h).await, 3);
}

#[tokio::test]
async fn test_reconcile_twice_is_idempotent() {
    let h = harness().await;
    h.service
        .create_patient(NewPatient::new("A", "One", h.ikorodu.clone()).with_entries(entries(2)))
        .await
        .unwrap();
    h.communities.set_counter(&h.ikorodu, 9).await.unwrap();

    let first = h.engine.reconcile(&h.ikorodu).await.unwrap();
    let second = h.engine.reconcile(&h.ikorodu).await.unwrap();

    assert!(first.corrected);
    assert!(!second.corrected);
    assert_eq!(second.previous, 2);
    assert_eq!(counter(&h).await, 2);
}

#[tokio::test]
async fn test_deltas_commute() {
    let h = harness().await;
    let other = harness().await;

    // Same two deltas, opposite order
    h.communities.add_to_counter(&h.ikorodu, 5).await.unwrap();
    h.communities.add_to_counter(&h.ikorodu, -2).await.unwrap();

    other
        .communities
        .add_to_counter(&other.ikorodu, -2)
        .await
        .unwrap();
    other
        .communities
        .add_to_counter(&other.ikorodu, 5)
        .await
        .unwrap();

    assert_eq!(counter(&h).await, counter(&other).await);
    assert_eq!(counter(&h).await, 3);
}

#[tokio::test]
async fn test_deltas_stay_within_their_community() {
    let h = harness().await;
    let epe = CommunityId::new("epe").unwrap();
    h.service
        .create_community(Community::new(epe.clone(), "Epe", "Lagos"))
        .await
        .unwrap();

    h.service
        .create_patient(NewPatient::new("A", "One", h.ikorodu.clone()).with_entries(entries(2)))
        .await
        .unwrap();
    h.service
        .create_patient(NewPatient::new("B", "Two", epe.clone()).with_entries(entries(5)))
        .await
        .unwrap();

    assert_eq!(counter(&h).await, 2);
    let epe_counter = h
        .communities
        .get_community(&epe)
        .await
        .unwrap()
        .unwrap()
        .total_tests_conducted;
    assert_eq!(epe_counter, 5);
}
