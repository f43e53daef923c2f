//! Counter reconciliation
//!
//! Everything that keeps the per-community `total_tests_conducted` counter
//! honest: the delta-applying engine with its bounded retry policy, the
//! drift journal for abandoned deltas, and the optional periodic sweep.

pub mod engine;
pub mod journal;
pub mod retry;
pub mod sweep;

pub use engine::{DeltaOutcome, ReconcileOutcome, ReconciliationEngine};
pub use journal::{DriftJournal, DriftRecord};
pub use retry::RetryPolicy;
pub use sweep::ReconciliationSweep;
