//! Report command implementation
//!
//! Prints the dashboard aggregates: totals, per-community case counts, and
//! the test-result breakdown.

use crate::config::load_config;
use crate::core::analytics::{Aggregator, CaseOrdering, TotalsSource};
use crate::stores::create_stores;
use clap::{Args, ValueEnum};

/// Which aggregate view to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportView {
    /// All views
    #[default]
    All,
    /// Community/patient/test totals
    Totals,
    /// Per-community case counts
    Cases,
    /// Test-result breakdown
    Breakdown,
}

/// Sort order for the cases view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CaseSort {
    /// Community insertion order
    #[default]
    Insertion,
    /// Highest case count first
    Count,
    /// Alphabetical by name
    Name,
}

impl From<CaseSort> for CaseOrdering {
    fn from(sort: CaseSort) -> Self {
        match sort {
            CaseSort::Insertion => CaseOrdering::InsertionOrder,
            CaseSort::Count => CaseOrdering::ByCountDescending,
            CaseSort::Name => CaseOrdering::ByName,
        }
    }
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Which view to print
    #[arg(long, value_enum, default_value_t = ReportView::All)]
    pub view: ReportView,

    /// Compute totals from the authoritative full scan instead of the
    /// cached counters
    #[arg(long)]
    pub authoritative: bool,

    /// Sort order for the cases view
    #[arg(long, value_enum, default_value_t = CaseSort::Insertion)]
    pub sort: CaseSort,
}

impl ReportArgs {
    /// Execute the report command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Generating report");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let (patients, communities) = match create_stores(&config).await {
            Ok(stores) => stores,
            Err(e) => {
                eprintln!("Failed to open stores: {e}");
                return Ok(4); // Store error exit code
            }
        };

        let aggregator = Aggregator::new(patients, communities);
        let source = if self.authoritative {
            TotalsSource::FullScan
        } else {
            TotalsSource::CachedCounters
        };

        if matches!(self.view, ReportView::All | ReportView::Totals) {
            let totals = aggregator.dashboard_totals(source).await?;
            totals.log_summary();
            println!("📊 Dashboard Totals");
            println!("{}", totals.format_summary());
            println!();
        }

        if matches!(self.view, ReportView::All | ReportView::Cases) {
            let cases = aggregator.cases_per_community(self.sort.into()).await?;
            println!("🏘️  Cases per Community");
            if cases.is_empty() {
                println!("  (no communities)");
            }
            for case in &cases {
                println!("  {:<24} {}", case.name, case.total_tests_conducted);
            }
            println!();
        }

        if matches!(self.view, ReportView::All | ReportView::Breakdown) {
            let breakdown = aggregator.test_result_breakdown().await?;
            println!("🧪 {}", breakdown.format_summary());
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sort_maps_to_ordering() {
        assert_eq!(
            CaseOrdering::from(CaseSort::Insertion),
            CaseOrdering::InsertionOrder
        );
        assert_eq!(
            CaseOrdering::from(CaseSort::Count),
            CaseOrdering::ByCountDescending
        );
        assert_eq!(CaseOrdering::from(CaseSort::Name), CaseOrdering::ByName);
    }

    #[test]
    fn test_report_args_defaults() {
        let args = ReportArgs {
            view: ReportView::default(),
            authoritative: false,
            sort: CaseSort::default(),
        };
        assert_eq!(args.view, ReportView::All);
        assert!(!args.authoritative);
    }
}
