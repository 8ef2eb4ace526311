//! HTTP request handlers for the MedRec REST API.
//!
//! # Handler Overview
//!
//! | Handler | Method | Path |
//! |---------|--------|------|
//! | [`list_patients_handler`] | GET | `/patients` |
//! | [`read_patient_handler`] | GET | `/patients/{id}` |
//! | [`list_medications_handler`] | GET | `/medications` |
//! | [`read_medication_handler`] | GET | `/medications/{id}` |
//! | [`list_prescriptions_handler`] | GET | `/prescriptions` |
//! | [`create_prescription_handler`] | POST | `/prescriptions` |
//! | [`read_prescription_handler`] | GET | `/prescriptions/{id}` |
//! | [`update_prescription_handler`] | PUT | `/prescriptions/{id}` |
//! | [`patch_prescription_handler`] | PATCH | `/prescriptions/{id}` |
//! | [`delete_prescription_handler`] | DELETE | `/prescriptions/{id}` |
//! | [`health_handler`] | GET | `/health` |

pub mod create;
pub mod delete;
pub mod fallback;
pub mod health;
pub mod patch;
pub mod read;
pub mod search;
pub mod update;

// Re-export handlers for convenience
pub use create::create_prescription_handler;
pub use delete::delete_prescription_handler;
pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use patch::patch_prescription_handler;
pub use read::{read_medication_handler, read_patient_handler, read_prescription_handler};
pub use search::{list_medications_handler, list_patients_handler, list_prescriptions_handler};
pub use update::update_prescription_handler;
