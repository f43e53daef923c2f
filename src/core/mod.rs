//! Business logic
//!
//! The core of the system: the mutation surface ([`records`]), the counter
//! reconciliation machinery ([`reconcile`]), read-time analytics
//! ([`analytics`]), and the read-only counter audit ([`verification`]).

pub mod analytics;
pub mod reconcile;
pub mod records;
pub mod verification;
