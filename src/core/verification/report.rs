//! Verification report structures

use crate::domain::ids::CommunityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report from a counter verification scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Number of communities checked
    pub checked: usize,

    /// Communities whose counter matched the recomputed sum
    pub matched: usize,

    /// Communities whose counter disagreed
    pub mismatched: usize,

    /// Details of each mismatch
    pub mismatches: Vec<CounterMismatch>,

    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

/// One community whose stored counter disagreed with the recomputed sum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterMismatch {
    /// Community id
    pub community_id: CommunityId,

    /// Community name
    pub name: String,

    /// Counter value found in the store
    pub stored: i64,

    /// Sum recomputed from patient records
    pub recomputed: i64,
}

impl CounterMismatch {
    /// Signed drift (stored minus true sum)
    pub fn drift(&self) -> i64 {
        self.stored - self.recomputed
    }
}

impl VerificationReport {
    /// Create an empty report stamped now
    pub fn new() -> Self {
        Self {
            verified_at: Utc::now(),
            checked: 0,
            matched: 0,
            mismatched: 0,
            mismatches: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record a community whose counter matched
    pub fn record_match(&mut self) {
        self.checked += 1;
        self.matched += 1;
    }

    /// Record a mismatch
    pub fn record_mismatch(&mut self, mismatch: CounterMismatch) {
        self.checked += 1;
        self.mismatched += 1;
        self.mismatches.push(mismatch);
    }

    /// Set the scan duration
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Whether every counter matched
    pub fn is_clean(&self) -> bool {
        self.mismatched == 0
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Counter Verification Report\n");
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Checked: {}\n", self.checked));
        summary.push_str(&format!("  Matched: {}\n", self.matched));
        summary.push_str(&format!("  Mismatched: {}\n", self.mismatched));

        if !self.mismatches.is_empty() {
            summary.push_str("\nMismatches:\n");
            for (i, m) in self.mismatches.iter().enumerate() {
                summary.push_str(&format!(
                    "  {}. {} ({}): stored {} != recomputed {} (drift {})\n",
                    i + 1,
                    m.name,
                    m.community_id,
                    m.stored,
                    m.recomputed,
                    m.drift()
                ));
            }
        }

        summary
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            checked = self.checked,
            matched = self.matched,
            mismatched = self.mismatched,
            duration_ms = self.duration_ms,
            "Counter verification completed"
        );

        for m in &self.mismatches {
            tracing::warn!(
                community_id = %m.community_id,
                name = %m.name,
                stored = m.stored,
                recomputed = m.recomputed,
                drift = m.drift(),
                "Counter mismatch"
            );
        }
    }
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch(stored: i64, recomputed: i64) -> CounterMismatch {
        CounterMismatch {
            community_id: CommunityId::new("ikorodu").unwrap(),
            name: "Ikorodu".to_string(),
            stored,
            recomputed,
        }
    }

    #[test]
    fn test_clean_report() {
        let mut report = VerificationReport::new();
        report.record_match();
        report.record_match();
        assert!(report.is_clean());
        assert_eq!(report.checked, 2);
    }

    #[test]
    fn test_mismatch_recording_and_drift() {
        let mut report = VerificationReport::new();
        report.record_match();
        report.record_mismatch(mismatch(10, 4));

        assert!(!report.is_clean());
        assert_eq!(report.checked, 2);
        assert_eq!(report.mismatches[0].drift(), 6);
    }

    #[test]
    fn test_format_summary_lists_mismatches() {
        let mut report = VerificationReport::new();
        report.record_mismatch(mismatch(10, 4));
        let text = report.format_summary();
        assert!(text.contains("Mismatched: 1"));
        assert!(text.contains("stored 10 != recomputed 4"));
    }
}
