//! Patient records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Store-assigned identity.
    pub id: i64,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Date of birth, when known.
    pub birth_date: Option<NaiveDate>,
}

impl Patient {
    /// Returns the patient's name parts.
    pub fn name(&self) -> PersonName {
        PersonName {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// A patient that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Date of birth, when known.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl NewPatient {
    /// Creates a patient without a birth date.
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            birth_date: None,
        }
    }

    /// Sets the birth date.
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }
}

/// First and last name of a person, loaded alongside records that reference
/// a patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonName {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl PersonName {
    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_is_first_then_last() {
        let patient = Patient {
            id: 1,
            last_name: "Martin".to_string(),
            first_name: "Jeanne".to_string(),
            birth_date: None,
        };
        assert_eq!(patient.name().full_name(), "Jeanne Martin");
    }

    #[test]
    fn test_new_patient_builder() {
        let date = NaiveDate::from_ymd_opt(1992, 3, 10).unwrap();
        let patient = NewPatient::new("Martin", "Jeanne").with_birth_date(date);
        assert_eq!(patient.birth_date, Some(date));
    }
}
