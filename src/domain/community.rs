//! Community domain model
//!
//! This module defines the Community aggregate record, including the
//! denormalized `total_tests_conducted` counter.

use super::ids::CommunityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic community tracked by field officers
///
/// The `total_tests_conducted` counter is derived data: it summarizes the
/// `test_count` of every patient referencing this community and exists only
/// for fast reads. When it disagrees with a recount, the recount wins and
/// reconciliation overwrites the counter.
///
/// The counter is `i64` rather than `u64`: deltas are signed, and a counter
/// that has already drifted can pass through negative values after patient
/// deletes until `reconcile` restores the true sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Unique identifier
    pub id: CommunityId,

    /// Community name (e.g. "Ikorodu")
    pub name: String,

    /// Locale string (state/region); copied onto patients at creation time
    pub locale: String,

    /// Field officer ids assigned to this community
    #[serde(default)]
    pub assigned_officers: Vec<String>,

    /// Estimated population, when known
    pub population_estimate: Option<u64>,

    /// Denormalized count of tests conducted across all member patients
    pub total_tests_conducted: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Creates a new community with a zeroed counter
    pub fn new(id: CommunityId, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            locale: locale.into(),
            assigned_officers: Vec::new(),
            population_estimate: None,
            total_tests_conducted: 0,
            created_at: Utc::now(),
        }
    }

    /// Assigns a field officer
    pub fn with_officer(mut self, officer_id: impl Into<String>) -> Self {
        self.assigned_officers.push(officer_id.into());
        self
    }

    /// Sets the population estimate
    pub fn with_population_estimate(mut self, estimate: u64) -> Self {
        self.population_estimate = Some(estimate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_community_starts_at_zero() {
        let community = Community::new(CommunityId::new("ikorodu").unwrap(), "Ikorodu", "Lagos");
        assert_eq!(community.total_tests_conducted, 0);
        assert!(community.assigned_officers.is_empty());
    }

    #[test]
    fn test_builder_helpers() {
        let community = Community::new(CommunityId::new("badagry").unwrap(), "Badagry", "Lagos")
            .with_officer("officer-17")
            .with_population_estimate(241_000);

        assert_eq!(community.assigned_officers, vec!["officer-17".to_string()]);
        assert_eq!(community.population_estimate, Some(241_000));
    }

    #[test]
    fn test_serialization_round_trip() {
        let community = Community::new(CommunityId::new("epe").unwrap(), "Epe", "Lagos");
        let json = serde_json::to_string(&community).unwrap();
        let back: Community = serde_json::from_str(&json).unwrap();
        assert_eq!(community, back);
    }
}
