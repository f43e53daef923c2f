//! Drift journal
//!
//! Bookkeeping for abandoned counter deltas. When a delta write exhausts
//! its retries, the triggering mutation has already succeeded from the
//! caller's perspective; the only thing left to do is remember that the
//! community's counter can no longer be trusted so a later reconciliation
//! pass fixes it. The journal is observability state, not a second source
//! of truth: reconcile recomputes from patient records regardless of what
//! is recorded here.

use crate::domain::ids::CommunityId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Record of abandoned deltas for one community
#[derive(Debug, Clone)]
pub struct DriftRecord {
    /// Community whose counter is suspect
    pub community_id: CommunityId,

    /// Sum of the deltas that were never applied
    pub pending_delta: i64,

    /// Number of abandoned delta writes
    pub failures: u32,

    /// When the first delta was abandoned
    pub first_failed_at: DateTime<Utc>,

    /// When the most recent delta was abandoned
    pub last_failed_at: DateTime<Utc>,

    /// Last failure message
    pub last_error: String,
}

/// In-memory journal of communities needing reconciliation
#[derive(Default)]
pub struct DriftJournal {
    records: Mutex<HashMap<CommunityId, DriftRecord>>,
}

impl DriftJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delta that was abandoned after retries
    pub async fn record_abandoned_delta(
        &self,
        community_id: &CommunityId,
        delta: i64,
        error: impl Into<String>,
    ) {
        let now = Utc::now();
        let error = error.into();
        let mut records = self.records.lock().await;
        records
            .entry(community_id.clone())
            .and_modify(|r| {
                r.pending_delta += delta;
                r.failures += 1;
                r.last_failed_at = now;
                r.last_error = error.clone();
            })
            .or_insert_with(|| DriftRecord {
                community_id: community_id.clone(),
                pending_delta: delta,
                failures: 1,
                first_failed_at: now,
                last_failed_at: now,
                last_error: error,
            });
    }

    /// Whether a community has abandoned deltas outstanding
    pub async fn is_pending(&self, community_id: &CommunityId) -> bool {
        self.records.lock().await.contains_key(community_id)
    }

    /// All outstanding records, unordered
    pub async fn pending(&self) -> Vec<DriftRecord> {
        self.records.lock().await.values().cloned().collect()
    }

    /// Clear a community's record after a successful reconciliation
    pub async fn clear(&self, community_id: &CommunityId) -> Option<DriftRecord> {
        self.records.lock().await.remove(community_id)
    }

    /// Number of communities with outstanding records
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the journal is empty
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
