//! Record types for the persistence layer.
//!
//! - [`Patient`] - A patient, listed by last name then first name
//! - [`Medication`] - A medication, referenced by prescriptions
//! - [`Prescription`] - A medication prescribed to a patient over a date range
//!
//! Each entity comes with a `New*` type describing a record that has not been
//! stored yet. Prescriptions also have a [`PrescriptionPatch`] for partial
//! updates.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use medrec_persistence::types::{NewPrescription, PrescriptionStatus};
//!
//! let draft = NewPrescription {
//!     patient_id: 1,
//!     medication_id: 1,
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//!     status: PrescriptionStatus::Validated,
//!     comment: String::new(),
//! };
//! assert_eq!(draft.status.as_str(), "valide");
//! ```

mod medication;
mod patient;
mod prescription;

pub use medication::{Medication, MedicationStatus, NewMedication};
pub use patient::{NewPatient, Patient, PersonName};
pub use prescription::{NewPrescription, Prescription, PrescriptionPatch, PrescriptionStatus};

use thiserror::Error;

/// Error returned when a string is not one of an enumeration's wire values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a valid choice.")]
pub struct InvalidChoice(pub String);
