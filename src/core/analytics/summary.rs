//! Aggregate summary types
//!
//! Plain read-only values returned to the presentation layer: dashboard
//! totals, per-community case counts, and the test-result breakdown.

use crate::domain::ids::CommunityId;

/// Which path computed a dashboard total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsSource {
    /// Sum of the denormalized community counters. Fast; trusts counters.
    CachedCounters,
    /// Sum of `test_count` across all patients. Slow; authoritative.
    FullScan,
}

impl std::fmt::Display for TotalsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalsSource::CachedCounters => write!(f, "cached-counters"),
            TotalsSource::FullScan => write!(f, "full-scan"),
        }
    }
}

/// Top-of-dashboard totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTotals {
    /// Number of communities
    pub communities: usize,

    /// Number of patients
    pub patients: usize,

    /// Total tests conducted across the whole deployment
    pub total_tests: i64,

    /// Which path computed `total_tests`
    pub source: TotalsSource,
}

impl DashboardTotals {
    /// Log the totals
    pub fn log_summary(&self) {
        tracing::info!(
            communities = self.communities,
            patients = self.patients,
            total_tests = self.total_tests,
            source = %self.source,
            "Dashboard totals"
        );
    }

    /// Format as a human-readable block
    pub fn format_summary(&self) -> String {
        format!(
            "Communities: {}\nPatients:    {}\nTotal tests: {} ({})",
            self.communities, self.patients, self.total_tests, self.source
        )
    }
}

/// One community's case count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityCaseCount {
    /// Community id
    pub community_id: CommunityId,

    /// Community name
    pub name: String,

    /// Denormalized test count
    pub total_tests_conducted: i64,
}

/// Ordering for the per-community case series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseOrdering {
    /// Community insertion order (the default)
    #[default]
    InsertionOrder,
    /// Highest case count first
    ByCountDescending,
    /// Alphabetical by community name
    ByName,
}

/// One result category in the breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    /// Result string, or the literal "Unknown" for missing/empty results
    pub result: String,

    /// How many entries carried this result
    pub count: u64,
}

/// Test-result distribution across every patient's entries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultBreakdown {
    /// Groups ordered by count descending, then name
    pub groups: Vec<ResultGroup>,

    /// Total entries scanned
    pub total_entries: u64,
}

impl ResultBreakdown {
    /// Count for a specific result category, zero if absent
    pub fn count_for(&self, result: &str) -> u64 {
        self.groups
            .iter()
            .find(|g| g.result == result)
            .map(|g| g.count)
            .unwrap_or(0)
    }

    /// Format as a human-readable block
    pub fn format_summary(&self) -> String {
        let mut out = format!("Test results ({} entries):\n", self.total_entries);
        for group in &self.groups {
            out.push_str(&format!("  {:<20} {}\n", group.result, group.count));
        }
        out
    }
}
