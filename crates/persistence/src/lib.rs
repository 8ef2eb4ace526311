//! MedRec Persistence Layer
//!
//! This crate holds the data model of the MedRec service (patients,
//! medications and prescriptions), the prescription date rule, list filters,
//! the storage traits and their SQLite implementation, and the demo data
//! generator.
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`types`] - Record types and status enumerations
//! - [`validation`] - The date rule and the pre-commit [`Validate`](validation::Validate) hook
//! - [`filter`] - List filters and the criteria they produce
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits
//! - [`backends`] - Backend implementations
//! - [`seed`] - Demo data generator
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::NaiveDate;
//! use medrec_persistence::backends::sqlite::SqliteBackend;
//! use medrec_persistence::core::{MedicationStorage, PatientStorage, PrescriptionStorage};
//! use medrec_persistence::types::{
//!     MedicationStatus, NewMedication, NewPatient, NewPrescription, PrescriptionStatus,
//! };
//!
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let patient = backend.create_patient(NewPatient::new("Martin", "Jeanne")).await?;
//! let medication = backend
//!     .create_medication(NewMedication::new("PARA500", "Paracétamol 500mg", MedicationStatus::Active))
//!     .await?;
//!
//! let prescription = backend
//!     .create_prescription(NewPrescription {
//!         patient_id: patient.id,
//!         medication_id: medication.id,
//!         start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//!         status: PrescriptionStatus::Validated,
//!         comment: String::new(),
//!     })
//!     .await?;
//! assert_eq!(prescription.patient_name.full_name(), "Jeanne Martin");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod filter;
pub mod seed;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};

// Re-export core traits
pub use core::{MedicationStorage, PatientStorage, PrescriptionStorage, RecordStorage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
