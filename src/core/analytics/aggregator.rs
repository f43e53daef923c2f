//! Read-time analytics aggregation
//!
//! Computes dashboard summaries by scanning patient records and/or reading
//! community counters. No side effects: these are pure queries over
//! already-consistent (or intentionally eventually-consistent) state.
//!
//! `dashboard_totals` exposes both the fast cached-counter path and the
//! authoritative full-scan path so the two can be checked against each
//! other; production dashboards read the fast path, periodic verification
//! the slow one.

use crate::core::analytics::summary::{
    CaseOrdering, CommunityCaseCount, DashboardTotals, ResultBreakdown, ResultGroup, TotalsSource,
};
use crate::domain::Result;
use crate::stores::traits::{CommunityStore, PatientStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Analytics aggregator over the two stores
pub struct Aggregator {
    patients: Arc<dyn PatientStore>,
    communities: Arc<dyn CommunityStore>,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(patients: Arc<dyn PatientStore>, communities: Arc<dyn CommunityStore>) -> Self {
        Self {
            patients,
            communities,
        }
    }

    /// Community count, patient count, and total test count
    ///
    /// # Arguments
    ///
    /// * `source` - Whether the test total trusts the cached counters or
    ///   recomputes from patient records
    pub async fn dashboard_totals(&self, source: TotalsSource) -> Result<DashboardTotals> {
        let (communities, patient_count) = futures::try_join!(
            self.communities.list_communities(),
            self.patients.patient_count()
        )?;

        let total_tests = match source {
            TotalsSource::CachedCounters => {
                communities.iter().map(|c| c.total_tests_conducted).sum()
            }
            TotalsSource::FullScan => self
                .patients
                .list_patients()
                .await?
                .iter()
                .map(|p| p.test_count as i64)
                .sum(),
        };

        Ok(DashboardTotals {
            communities: communities.len(),
            patients: patient_count,
            total_tests,
            source,
        })
    }

    /// Per-community (name, case count) series
    ///
    /// Reads the denormalized counters; insertion order unless the caller
    /// requests a sort.
    pub async fn cases_per_community(
        &self,
        ordering: CaseOrdering,
    ) -> Result<Vec<CommunityCaseCount>> {
        let mut cases: Vec<CommunityCaseCount> = self
            .communities
            .list_communities()
            .await?
            .into_iter()
            .map(|c| CommunityCaseCount {
                community_id: c.id,
                name: c.name,
                total_tests_conducted: c.total_tests_conducted,
            })
            .collect();

        match ordering {
            CaseOrdering::InsertionOrder => {}
            CaseOrdering::ByCountDescending => {
                cases.sort_by(|a, b| {
                    b.total_tests_conducted
                        .cmp(&a.total_tests_conducted)
                        .then_with(|| a.name.cmp(&b.name))
                });
            }
            CaseOrdering::ByName => cases.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        Ok(cases)
    }

    /// Distribution of test results across every patient's entries
    ///
    /// Necessarily a full scan; there is no denormalized equivalent.
    /// Grouping is case-sensitive, and entries with a missing or empty
    /// result land in the literal "Unknown" category.
    pub async fn test_result_breakdown(&self) -> Result<ResultBreakdown> {
        let patients = self.patients.list_patients().await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut total_entries: u64 = 0;
        for patient in &patients {
            for entry in &patient.test_entries {
                *counts.entry(entry.result_category().to_string()).or_insert(0) += 1;
                total_entries += 1;
            }
        }

        let mut groups: Vec<ResultGroup> = counts
            .into_iter()
            .map(|(result, count)| ResultGroup { result, count })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.result.cmp(&b.result)));

        Ok(ResultBreakdown {
            groups,
            total_entries,
        })
    }
}
