//! Test fixtures for REST API testing.
//!
//! Patients and medications are read-only over HTTP, so fixtures are written
//! straight into storage.

use chrono::NaiveDate;
use medrec_persistence::types::{MedicationStatus, NewMedication, NewPatient};

/// Shorthand for a calendar date.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Sample patients, in insertion order.
pub fn patients() -> Vec<NewPatient> {
    vec![
        NewPatient::new("Martin", "Jeanne").with_birth_date(date(1992, 3, 10)),
        NewPatient::new("Durand", "Jean").with_birth_date(date(1980, 5, 20)),
        NewPatient::new("Bernard", "Paul"),
        NewPatient::new("MARTINEZ", "Luc").with_birth_date(date(1975, 11, 2)),
    ]
}

/// Sample medications, in insertion order.
pub fn medications() -> Vec<NewMedication> {
    vec![
        NewMedication::new("PARA500", "Paracétamol 500mg", MedicationStatus::Active),
        NewMedication::new("IBU200", "Ibuprofène 200mg", MedicationStatus::Retired),
        NewMedication::new("AMOX1G", "Amoxicilline 1g", MedicationStatus::Active),
    ]
}
