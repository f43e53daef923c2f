//! Patient and community record operations
//!
//! The mutation surface the CRUD layer consumes. Every mutation that
//! changes a patient's test-entry count goes through [`RecordService`] so
//! the reconciliation hooks cannot be bypassed.

pub mod service;

pub use service::RecordService;
