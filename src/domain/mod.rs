//! Domain models and types for the surveillance core.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`CommunityId`])
//! - **Domain models** ([`Patient`], [`TestEntry`], [`Community`])
//! - **Error types** ([`SentinelError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so the two id spaces cannot be mixed:
//!
//! ```rust
//! use sentinel::domain::{PatientId, CommunityId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = PatientId::new("patient-123")?;
//! let community_id = CommunityId::new("ikorodu")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: PatientId = community_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # The invariant that matters
//!
//! `Community::total_tests_conducted` must equal the sum of
//! `Patient::test_count` over all patients referencing that community. It is
//! a cross-entity invariant that neither store can enforce alone; the
//! reconciliation engine in [`crate::core::reconcile`] owns it.

pub mod community;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use community::Community;
pub use errors::{RefKind, SentinelError, StoreError};
pub use ids::{CommunityId, PatientId};
pub use patient::{Gender, NewPatient, Patient, TestEntry};
pub use result::Result;
