//! Domain identifier types with validation
//!
//! Newtype wrappers for the two entity identifiers so patient and community
//! ids cannot be mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// Represents a unique identifier for a patient record. Generated as a UUID
/// when a patient is created through the core, but any non-empty string is
/// accepted so externally-assigned ids keep working.
///
/// # Examples
///
/// ```
/// use sentinel::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.as_str(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace-only
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random PatientId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Community identifier newtype wrapper
///
/// Represents a unique identifier for a geographic community. Patients hold
/// a `CommunityId` reference; the community's aggregate counter is keyed by it.
///
/// # Examples
///
/// ```
/// use sentinel::domain::ids::CommunityId;
/// use std::str::FromStr;
///
/// let id = CommunityId::from_str("ikorodu").unwrap();
/// assert_eq!(id.as_str(), "ikorodu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityId(String);

impl CommunityId {
    /// Creates a new CommunityId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace-only
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Community ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh random CommunityId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the community ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommunityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CommunityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
