//! Entity storage traits.
//!
//! Lookups return `Ok(None)` for a missing record; the `get_*` helpers turn
//! that into [`ResourceError::NotFound`]. Every write runs the record's
//! [`Validate`](crate::validation::Validate) hook before anything is stored,
//! so callers never observe a partially written record.

use async_trait::async_trait;

use crate::error::{ResourceError, StorageResult};
use crate::filter::{MedicationFilter, PatientFilter, PrescriptionFilter};
use crate::types::{
    Medication, NewMedication, NewPatient, NewPrescription, Patient, Prescription,
    PrescriptionPatch,
};

/// Storage for patients.
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Reads a patient by identity.
    async fn find_patient(&self, id: i64) -> StorageResult<Option<Patient>>;

    /// Lists patients matching `filter`, ordered by last name, first name and id.
    async fn list_patients(&self, filter: &PatientFilter) -> StorageResult<Vec<Patient>>;

    /// Stores a new patient.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If a name is blank or too long
    async fn create_patient(&self, patient: NewPatient) -> StorageResult<Patient>;

    /// Deletes a patient together with all of its prescriptions.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the patient does not exist
    async fn delete_patient(&self, id: i64) -> StorageResult<()>;

    /// Reads a patient, failing if it does not exist.
    async fn get_patient(&self, id: i64) -> StorageResult<Patient> {
        self.find_patient(id).await?.ok_or_else(|| {
            ResourceError::NotFound {
                entity: "patient",
                id,
            }
            .into()
        })
    }
}

/// Storage for medications.
#[async_trait]
pub trait MedicationStorage: Send + Sync {
    /// Reads a medication by identity.
    async fn find_medication(&self, id: i64) -> StorageResult<Option<Medication>>;

    /// Lists medications matching `filter`, ordered by code.
    async fn list_medications(&self, filter: &MedicationFilter) -> StorageResult<Vec<Medication>>;

    /// Stores a new medication.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(AlreadyExists)` - If the code is taken
    /// * `StorageError::Validation` - If the code or label is blank or too long
    async fn create_medication(&self, medication: NewMedication) -> StorageResult<Medication>;

    /// Deletes a medication that no prescription references.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the medication does not exist
    /// * `StorageError::Integrity(ProtectedReference)` - If prescriptions still
    ///   reference it
    async fn delete_medication(&self, id: i64) -> StorageResult<()>;

    /// Reads a medication, failing if it does not exist.
    async fn get_medication(&self, id: i64) -> StorageResult<Medication> {
        self.find_medication(id).await?.ok_or_else(|| {
            ResourceError::NotFound {
                entity: "medication",
                id,
            }
            .into()
        })
    }
}

/// Storage for prescriptions.
#[async_trait]
pub trait PrescriptionStorage: Send + Sync {
    /// Reads a prescription by identity, with the referenced patient's name.
    async fn find_prescription(&self, id: i64) -> StorageResult<Option<Prescription>>;

    /// Lists prescriptions matching `filter`, latest start date first.
    async fn list_prescriptions(
        &self,
        filter: &PrescriptionFilter,
    ) -> StorageResult<Vec<Prescription>>;

    /// Stores a new prescription.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation(DateRangeInvalid)` - If it ends before it starts
    /// * `StorageError::Validation(ReferenceNotFound)` - If the patient or
    ///   medication does not exist
    async fn create_prescription(&self, prescription: NewPrescription)
    -> StorageResult<Prescription>;

    /// Merges `patch` onto the stored prescription and writes the result.
    ///
    /// The merged record is validated as a whole, so changing a single date
    /// can still be rejected. `updated_at` is refreshed, `created_at` is kept.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the prescription does not exist
    /// * `StorageError::Validation` - Same as [`create_prescription`](Self::create_prescription)
    async fn update_prescription(
        &self,
        id: i64,
        patch: PrescriptionPatch,
    ) -> StorageResult<Prescription>;

    /// Deletes a prescription.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the prescription does not exist
    async fn delete_prescription(&self, id: i64) -> StorageResult<()>;

    /// Deletes every prescription and returns how many were removed.
    async fn delete_all_prescriptions(&self) -> StorageResult<u64>;

    /// Reads a prescription, failing if it does not exist.
    async fn get_prescription(&self, id: i64) -> StorageResult<Prescription> {
        self.find_prescription(id).await?.ok_or_else(|| {
            ResourceError::NotFound {
                entity: "prescription",
                id,
            }
            .into()
        })
    }
}

/// Storage for every entity of the service.
#[async_trait]
pub trait RecordStorage: PatientStorage + MedicationStorage + PrescriptionStorage {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Checks that the backend can serve queries.
    async fn health_check(&self) -> StorageResult<()>;
}
