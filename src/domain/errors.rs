//! Domain error types
//!
//! Error hierarchy for the surveillance core. Errors here are the ones that
//! are fatal to the triggering operation and surfaced synchronously to the
//! caller. Aggregate-only problems (counter drift, an abandoned delta) are
//! deliberately NOT errors on this path: they are recorded by the
//! reconciliation journal and logged, and never fail a patient-facing
//! mutation.

use thiserror::Error;

/// Which entity kind a dangling reference pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A patient record
    Patient,
    /// A community record
    Community,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Patient => write!(f, "Patient"),
            RefKind::Community => write!(f, "Community"),
        }
    }
}

/// Main error type for the surveillance core
///
/// This is the primary error type used throughout the crate. It wraps the
/// storage-level error type and provides context for error handling.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A mutation referenced an entity that does not exist. Fatal to that
    /// operation; no partial write is performed.
    #[error("{kind} not found: {id}")]
    ReferenceNotFound {
        /// Entity kind of the missing reference
        kind: RefKind,
        /// The id that failed to resolve
        id: String,
    },

    /// Storage backend errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// A long-running scan was cancelled before completing
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SentinelError {
    /// Shorthand for a missing patient reference
    pub fn patient_not_found(id: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            kind: RefKind::Patient,
            id: id.into(),
        }
    }

    /// Shorthand for a missing community reference
    pub fn community_not_found(id: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            kind: RefKind::Community,
            id: id.into(),
        }
    }
}

/// Storage-backend errors
///
/// Errors raised by the patient and community stores. These don't expose
/// backend-specific types; the snapshot backend maps its file and encoding
/// failures into the variants here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert collided with an existing id
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// A counter operation targeted a community the store does not hold
    #[error("Unknown community: {0}")]
    UnknownCommunity(String),

    /// An update targeted a patient the store does not hold
    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    /// A community delete was attempted while patients still reference it
    #[error("Community {id} still referenced by {patients} patient(s)")]
    StillReferenced {
        /// The community id
        id: String,
        /// How many patients still reference it
        patients: usize,
    },

    /// A persisted snapshot failed its integrity check
    #[error("Snapshot corrupt: {0}")]
    Corrupt(String),

    /// Snapshot file I/O failed
    #[error("Snapshot I/O error: {0}")]
    Io(String),

    /// Snapshot encoding/decoding failed
    #[error("Snapshot encoding error: {0}")]
    Serialization(String),

    /// A write was rejected by the backend
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SentinelError {
    fn from(err: std::io::Error) -> Self {
        SentinelError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        SentinelError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SentinelError {
    fn from(err: toml::de::Error) -> Self {
        SentinelError::Configuration(format!("TOML parse error: {err}"))
    }
}
