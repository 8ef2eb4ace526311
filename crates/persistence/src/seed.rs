//! Demo data generator.
//!
//! Replaces every prescription with randomly generated ones that reference
//! existing patients and active medications. Each record goes through the
//! regular storage `create_prescription`, so the date rule applies to
//! generated data exactly as it does to API writes.
//!
//! The random source and the current date are parameters, which keeps runs
//! reproducible in tests.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::info;

use crate::core::RecordStorage;
use crate::error::{ResourceError, StorageError};
use crate::filter::{MedicationFilter, PatientFilter};
use crate::types::{
    MedicationStatus, NewMedication, NewPatient, NewPrescription, PrescriptionStatus,
};

/// Number of prescriptions generated when no count is given.
pub const DEFAULT_SEED_COUNT: usize = 30;

/// Comment attached to every generated prescription.
pub const SEED_COMMENT: &str = "Prescription de démonstration";

/// How far back a generated treatment may start, in days.
const MAX_START_OFFSET_DAYS: i64 = 365;

/// Bounds of a generated treatment's length, in days.
const MIN_DURATION_DAYS: i64 = 5;
const MAX_DURATION_DAYS: i64 = 90;

/// Options for a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Number of prescriptions to create.
    pub count: usize,
    /// The day generated start dates count back from.
    pub today: NaiveDate,
    /// Insert sample patients and medications when none are usable.
    pub bootstrap: bool,
}

impl SeedOptions {
    /// Default options relative to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            count: DEFAULT_SEED_COUNT,
            today,
            bootstrap: false,
        }
    }
}

/// Outcome of a generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Prescriptions deleted before generating.
    pub removed: u64,
    /// Prescriptions created.
    pub created: usize,
    /// Sample patients inserted by `bootstrap`.
    pub bootstrapped_patients: usize,
    /// Sample medications inserted by `bootstrap`.
    pub bootstrapped_medications: usize,
}

/// Errors that stop a generator run.
#[derive(Error, Debug)]
pub enum SeedError {
    /// There is no patient to prescribe to.
    #[error("no patients found; create some first or run with --bootstrap")]
    NoPatients,

    /// There is no active medication to prescribe.
    #[error("no active medications found; create some first or run with --bootstrap")]
    NoActiveMedications,

    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn sample_patients() -> Vec<NewPatient> {
    let mut patients = Vec::new();
    if let Some(birth_date) = NaiveDate::from_ymd_opt(1992, 3, 10) {
        patients.push(NewPatient::new("Martin", "Jeanne").with_birth_date(birth_date));
    }
    if let Some(birth_date) = NaiveDate::from_ymd_opt(1980, 5, 20) {
        patients.push(NewPatient::new("Durand", "Jean").with_birth_date(birth_date));
    }
    patients.push(NewPatient::new("Bernard", "Paul"));
    patients
}

fn sample_medications() -> Vec<NewMedication> {
    vec![
        NewMedication::new("PARA500", "Paracétamol 500mg", MedicationStatus::Active),
        NewMedication::new("IBU200", "Ibuprofène 200mg", MedicationStatus::Active),
        NewMedication::new("AMOX1G", "Amoxicilline 1g", MedicationStatus::Active),
    ]
}

/// Deletes all prescriptions and generates `options.count` new ones.
///
/// Start dates fall within the year before `options.today` and treatments
/// last between 5 and 90 days. Patients and statuses are drawn uniformly;
/// medications are drawn among active ones only.
///
/// # Errors
///
/// * [`SeedError::NoPatients`] / [`SeedError::NoActiveMedications`] - If a
///   required set is empty and `options.bootstrap` is false
/// * [`SeedError::Storage`] - If a storage operation fails
pub async fn seed_prescriptions<S, R>(
    storage: &S,
    rng: &mut R,
    options: &SeedOptions,
) -> Result<SeedReport, SeedError>
where
    S: RecordStorage + ?Sized,
    R: Rng + ?Sized,
{
    let mut report = SeedReport::default();

    let mut patients = storage.list_patients(&PatientFilter::default()).await?;
    if patients.is_empty() && options.bootstrap {
        for patient in sample_patients() {
            patients.push(storage.create_patient(patient).await?);
            report.bootstrapped_patients += 1;
        }
    }

    let active = MedicationFilter {
        status: Some(MedicationStatus::Active),
    };
    let mut medications = storage.list_medications(&active).await?;
    if medications.is_empty() && options.bootstrap {
        for medication in sample_medications() {
            match storage.create_medication(medication).await {
                Ok(created) => {
                    medications.push(created);
                    report.bootstrapped_medications += 1;
                }
                // A retired medication may already hold the sample code.
                Err(StorageError::Resource(ResourceError::AlreadyExists { .. })) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    if patients.is_empty() {
        return Err(SeedError::NoPatients);
    }
    if medications.is_empty() {
        return Err(SeedError::NoActiveMedications);
    }

    report.removed = storage.delete_all_prescriptions().await?;

    for _ in 0..options.count {
        let (Some(patient), Some(medication), Some(status)) = (
            patients.choose(rng),
            medications.choose(rng),
            PrescriptionStatus::ALL.choose(rng),
        ) else {
            break;
        };

        let start_date =
            options.today - Duration::days(rng.gen_range(0..=MAX_START_OFFSET_DAYS));
        let end_date =
            start_date + Duration::days(rng.gen_range(MIN_DURATION_DAYS..=MAX_DURATION_DAYS));

        storage
            .create_prescription(NewPrescription {
                patient_id: patient.id,
                medication_id: medication.id,
                start_date,
                end_date,
                status: *status,
                comment: SEED_COMMENT.to_string(),
            })
            .await?;
        report.created += 1;
    }

    info!(
        removed = report.removed,
        created = report.created,
        bootstrapped_patients = report.bootstrapped_patients,
        bootstrapped_medications = report.bootstrapped_medications,
        "Seeded demo prescriptions"
    );

    Ok(report)
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::backends::sqlite::SqliteBackend;
    use crate::core::{MedicationStorage, PatientStorage, PrescriptionStorage};
    use crate::filter::PrescriptionFilter;

    fn create_test_backend() -> SqliteBackend {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn options(count: usize, bootstrap: bool) -> SeedOptions {
        SeedOptions {
            count,
            today: today(),
            bootstrap,
        }
    }

    #[tokio::test]
    async fn test_fails_without_patients() {
        let backend = create_test_backend();
        let mut rng = StdRng::seed_from_u64(1);
        let err = seed_prescriptions(&backend, &mut rng, &options(5, false))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::NoPatients));
    }

    #[tokio::test]
    async fn test_fails_with_only_retired_medications() {
        let backend = create_test_backend();
        backend
            .create_patient(NewPatient::new("Martin", "Jeanne"))
            .await
            .unwrap();
        backend
            .create_medication(NewMedication::new("OLD1", "Retiré", MedicationStatus::Retired))
            .await
            .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let err = seed_prescriptions(&backend, &mut rng, &options(5, false))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::NoActiveMedications));
    }

    #[tokio::test]
    async fn test_bootstrap_creates_exactly_n_valid_prescriptions() {
        let backend = create_test_backend();
        backend
            .create_medication(NewMedication::new("OLD1", "Retiré", MedicationStatus::Retired))
            .await
            .unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let report = seed_prescriptions(&backend, &mut rng, &options(25, true))
            .await
            .unwrap();
        assert_eq!(report.created, 25);
        assert_eq!(report.removed, 0);
        assert_eq!(report.bootstrapped_patients, 3);
        assert_eq!(report.bootstrapped_medications, 3);

        let retired = backend
            .list_medications(&MedicationFilter {
                status: Some(MedicationStatus::Retired),
            })
            .await
            .unwrap();
        let prescriptions = backend
            .list_prescriptions(&PrescriptionFilter::default())
            .await
            .unwrap();
        assert_eq!(prescriptions.len(), 25);
        for p in &prescriptions {
            assert!(p.end_date >= p.start_date);
            let offset = (today() - p.start_date).num_days();
            assert!((0..=365).contains(&offset), "start offset {offset}");
            let duration = (p.end_date - p.start_date).num_days();
            assert!((5..=90).contains(&duration), "duration {duration}");
            assert_eq!(p.comment, SEED_COMMENT);
            assert!(retired.iter().all(|m| m.id != p.medication_id));
        }
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_prescriptions() {
        let backend = create_test_backend();
        let mut rng = StdRng::seed_from_u64(7);
        seed_prescriptions(&backend, &mut rng, &options(10, true))
            .await
            .unwrap();

        let report = seed_prescriptions(&backend, &mut rng, &options(4, true))
            .await
            .unwrap();
        assert_eq!(report.removed, 10);
        assert_eq!(report.created, 4);
        assert_eq!(report.bootstrapped_patients, 0);
        assert_eq!(report.bootstrapped_medications, 0);

        let count = backend
            .list_prescriptions(&PrescriptionFilter::default())
            .await
            .unwrap()
            .len();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_same_seed_same_data() {
        let mut runs = Vec::new();
        for _ in 0..2 {
            let backend = create_test_backend();
            let mut rng = StdRng::seed_from_u64(99);
            seed_prescriptions(&backend, &mut rng, &options(8, true))
                .await
                .unwrap();
            let dates: Vec<_> = backend
                .list_prescriptions(&PrescriptionFilter::default())
                .await
                .unwrap()
                .into_iter()
                .map(|p| (p.start_date, p.end_date, p.status, p.patient_id))
                .collect();
            runs.push(dates);
        }
        assert_eq!(runs[0], runs[1]);
    }

    #[test]
    fn test_default_options() {
        let options = SeedOptions::new(today());
        assert_eq!(options.count, 30);
        assert!(!options.bootstrap);
    }
}
