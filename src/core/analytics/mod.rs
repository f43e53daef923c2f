//! Read-time analytics
//!
//! Pure queries producing the dashboard's aggregate views. Independent of
//! the reconciliation engine except for the shared source-of-truth rule:
//! counters are fast but derived, patient records are authoritative.

pub mod aggregator;
pub mod summary;

pub use aggregator::Aggregator;
pub use summary::{
    CaseOrdering, CommunityCaseCount, DashboardTotals, ResultBreakdown, ResultGroup, TotalsSource,
};
