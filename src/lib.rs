// Sentinel - Community Health Surveillance Core
// Copyright (c) 2025 Sentinel Contributors
// Licensed under the MIT License

//! # Sentinel - Community Health Surveillance Core
//!
//! Sentinel is the aggregate-consistency core of a field-health-data
//! tracker: field officers record patient test results tied to geographic
//! communities, and administrators read per-community and deployment-wide
//! statistics.
//!
//! ## Overview
//!
//! The crate maintains one denormalized counter per community
//! (`total_tests_conducted`) as patient test records are created, extended,
//! and removed - operations that are not atomic with respect to each other
//! - and provides the read-time aggregation the dashboard consumes.
//!
//! The counter is derived data, never a second source of truth. Every
//! mutation applies a best-effort signed delta; drift from failed deltas or
//! crashes is detected and corrected by reconciliation.
//!
//! ## Architecture
//!
//! Sentinel follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (records, reconcile, analytics, verification)
//! - [`stores`] - Storage backends behind the two store traits
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentinel::config::load_config;
//! use sentinel::core::reconcile::{ReconciliationEngine, RetryPolicy};
//! use sentinel::core::records::RecordService;
//! use sentinel::domain::{Community, CommunityId, NewPatient, TestEntry};
//! use sentinel::stores::create_stores;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("sentinel.toml")?;
//!     let (patients, communities) = create_stores(&config).await?;
//!
//!     let engine = Arc::new(ReconciliationEngine::new(
//!         patients.clone(),
//!         communities.clone(),
//!         RetryPolicy::from_config(&config.retry),
//!     ));
//!     let service = RecordService::new(patients, communities, engine.clone());
//!
//!     let ikorodu = CommunityId::new("ikorodu")?;
//!     service
//!         .create_community(Community::new(ikorodu.clone(), "Ikorodu", "Lagos"))
//!         .await?;
//!
//!     let patient = service
//!         .create_patient(
//!             NewPatient::new("Adaeze", "Okafor", ikorodu.clone()).with_entries(vec![
//!                 TestEntry::new("malaria-rdt", Some("Positive".to_string())),
//!             ]),
//!         )
//!         .await?;
//!
//!     // The community counter now reflects the patient's test entries
//!     let community = service.get_community(&ikorodu).await?.unwrap();
//!     assert_eq!(community.total_tests_conducted, 1);
//!
//!     // Out-of-band correction path
//!     engine.reconcile(&ikorodu).await?;
//!     # let _ = patient;
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency model
//!
//! The patient write and the counter write form an implicit two-phase
//! update with no cross-store transaction. The primary (patient) write is
//! authoritative; the counter delta is best-effort with bounded, jittered
//! retries. An abandoned delta is journaled and logged - never surfaced to
//! the caller, whose patient-facing operation already succeeded - and the
//! periodic or manual `reconcile` recomputes the true sum and overwrites
//! the counter.
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`] with
//! [`domain::SentinelError`]:
//!
//! ```rust,no_run
//! use sentinel::domain::{Result, SentinelError};
//!
//! fn example() -> Result<()> {
//!     let config = sentinel::config::load_config("sentinel.toml")?;
//!     # let _ = config;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting reconciliation");
//! warn!(community_id = "ikorodu", drift = 3, "Counter drift detected");
//! error!(error = "backend unavailable", "Delta abandoned");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod stores;
