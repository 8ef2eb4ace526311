//! Response building for the MedRec REST API.

pub mod representation;

pub use representation::PrescriptionRepresentation;
