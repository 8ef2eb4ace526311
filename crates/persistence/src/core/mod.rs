//! Core storage traits.
//!
//! Each entity has its own async storage trait. [`RecordStorage`] combines
//! them and is what the REST layer and the demo data generator depend on.
//!
//! ```text
//! PatientStorage ─┐
//! MedicationStorage ─┼── RecordStorage
//! PrescriptionStorage ─┘
//! ```

mod storage;

pub use storage::{MedicationStorage, PatientStorage, PrescriptionStorage, RecordStorage};
