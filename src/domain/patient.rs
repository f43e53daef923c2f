//! Patient domain model
//!
//! This module defines the Patient record: demographics, a community
//! reference, and the ordered list of test entries with its cached count.

use super::ids::{CommunityId, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single test entry on a patient record
///
/// Entries are append-only in normal operation; the whole list only shrinks
/// when the patient record itself is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntry {
    /// Kind of test conducted (e.g. "malaria-rdt", "hiv-rapid")
    pub test_type: String,

    /// Recorded outcome. `None` and empty strings both land in the
    /// "Unknown" bucket of the result breakdown.
    pub test_result: Option<String>,

    /// When the test was conducted
    pub date_conducted: DateTime<Utc>,

    /// Optional free-text note from the field officer
    pub note: Option<String>,
}

impl TestEntry {
    /// Creates a new test entry conducted now
    pub fn new(test_type: impl Into<String>, test_result: Option<String>) -> Self {
        Self {
            test_type: test_type.into(),
            test_result,
            date_conducted: Utc::now(),
            note: None,
        }
    }

    /// Sets the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The result category this entry contributes to in the breakdown
    ///
    /// Grouping is case-sensitive; a missing or empty result maps to the
    /// literal category "Unknown".
    pub fn result_category(&self) -> &str {
        match self.test_result.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => "Unknown",
        }
    }
}

/// Gender as recorded at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

/// A patient record
///
/// Owned by exactly one community via `community`. The `locale` string is
/// denormalized from the community at creation time. `test_count` is a
/// local cache of `test_entries.len()` and is maintained by the store
/// operations that mutate the entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier
    pub id: PatientId,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Age in years
    pub age: Option<u8>,

    /// Gender
    pub gender: Option<Gender>,

    /// Owning community reference
    pub community: CommunityId,

    /// Locale string copied from the community at creation time
    pub locale: String,

    /// Ordered test entries, append-only in normal operation
    pub test_entries: Vec<TestEntry>,

    /// Cached count, always equal to `test_entries.len()`
    pub test_count: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Appends test entries, keeping the cached count in sync
    pub fn append_entries(&mut self, entries: impl IntoIterator<Item = TestEntry>) {
        self.test_entries.extend(entries);
        self.test_count = self.test_entries.len() as u64;
        self.updated_at = Utc::now();
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Checks the local invariant: cached count equals the entry list length
    pub fn count_is_consistent(&self) -> bool {
        self.test_count == self.test_entries.len() as u64
    }
}

/// Draft patient data as received from the inbound CRUD layer
///
/// The core assigns the id, copies the community locale, and stamps the
/// timestamps; callers supply everything else. Initial test entries may be
/// present (a field officer often records the first test at registration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Age in years
    pub age: Option<u8>,

    /// Gender
    pub gender: Option<Gender>,

    /// Owning community reference; must exist before the patient is written
    pub community: CommunityId,

    /// Zero or more test entries recorded at registration
    #[serde(default)]
    pub test_entries: Vec<TestEntry>,
}

impl NewPatient {
    /// Creates a minimal draft with the required fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        community: CommunityId,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            age: None,
            gender: None,
            community,
            test_entries: Vec::new(),
        }
    }

    /// Adds initial test entries
    pub fn with_entries(mut self, entries: Vec<TestEntry>) -> Self {
        self.test_entries = entries;
        self
    }

    /// Materializes the draft into a full Patient record
    ///
    /// # Arguments
    ///
    /// * `locale` - Locale string copied from the owning community
    pub fn into_patient(self, locale: impl Into<String>) -> Patient {
        let now = Utc::now();
        let test_count = self.test_entries.len() as u64;
        Patient {
            id: PatientId::generate(),
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            age: self.age,
            gender: self.gender,
            community: self.community,
            locale: locale.into(),
            test_entries: self.test_entries,
            test_count,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community() -> CommunityId {
        CommunityId::new("ikorodu").unwrap()
    }

    #[test]
    fn test_new_patient_materialization() {
        let draft = NewPatient::new("Adaeze", "Okafor", community()).with_entries(vec![
            TestEntry::new("malaria-rdt", Some("Positive".to_string())),
            TestEntry::new("malaria-rdt", Some("Negative".to_string())),
        ]);

        let patient = draft.into_patient("Lagos");
        assert_eq!(patient.full_name(), "Adaeze Okafor");
        assert_eq!(patient.locale, "Lagos");
        assert_eq!(patient.test_count, 2);
        assert!(patient.count_is_consistent());
    }

    #[test]
    fn test_append_entries_keeps_count_in_sync() {
        let mut patient = NewPatient::new("Tunde", "Bello", community()).into_patient("Lagos");
        assert_eq!(patient.test_count, 0);

        patient.append_entries(vec![
            TestEntry::new("hiv-rapid", Some("Negative".to_string())),
            TestEntry::new("malaria-rdt", None),
            TestEntry::new("malaria-rdt", Some("Positive".to_string())),
        ]);

        assert_eq!(patient.test_count, 3);
        assert!(patient.count_is_consistent());
    }

    #[test]
    fn test_result_category_unknown_for_missing_or_empty() {
        let missing = TestEntry::new("malaria-rdt", None);
        let empty = TestEntry::new("malaria-rdt", Some(String::new()));
        let present = TestEntry::new("malaria-rdt", Some("Positive".to_string()));

        assert_eq!(missing.result_category(), "Unknown");
        assert_eq!(empty.result_category(), "Unknown");
        assert_eq!(present.result_category(), "Positive");
    }

    #[test]
    fn test_result_category_is_case_sensitive() {
        let upper = TestEntry::new("malaria-rdt", Some("POSITIVE".to_string()));
        let mixed = TestEntry::new("malaria-rdt", Some("Positive".to_string()));
        assert_ne!(upper.result_category(), mixed.result_category());
    }

    #[test]
    fn test_patient_serialization_round_trip() {
        let patient = NewPatient::new("Adaeze", "Okafor", community())
            .with_entries(vec![TestEntry::new("malaria-rdt", Some("Positive".into()))])
            .into_patient("Lagos");

        let json = serde_json::to_string(&patient).unwrap();
        let back: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(patient, back);
    }
}
