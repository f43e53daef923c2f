//! Counter verification
//!
//! Read-only audit comparing stored counters against authoritative
//! recomputation. Pairs with the reconciliation engine: verify reports,
//! reconcile corrects.

pub mod report;
pub mod verify;

pub use report::{CounterMismatch, VerificationReport};
pub use verify::Verifier;
