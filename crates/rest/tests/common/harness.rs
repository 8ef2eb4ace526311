//! REST API test harness.
//!
//! Provides a test server and direct access to its storage.

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use medrec_persistence::backends::sqlite::SqliteBackend;
use medrec_persistence::core::{MedicationStorage, PatientStorage, PrescriptionStorage};
use medrec_persistence::types::{
    Medication, NewPrescription, Patient, Prescription, PrescriptionStatus,
};
use serde_json::Value;

use medrec_rest::{AppState, ServerConfig};

use super::fixtures;

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_read() {
///     let harness = RestTestHarness::seeded().await;
///     let response = harness.get("/patients").await;
///     assert_eq!(response.status_code(), 200);
/// }
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend shared with the server.
    pub backend: Arc<SqliteBackend>,

    /// Seeded patients, in fixture order.
    pub patients: Vec<Patient>,

    /// Seeded medications, in fixture order.
    pub medications: Vec<Medication>,
}

impl RestTestHarness {
    /// Creates a harness over an empty database.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness over an empty database with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        let backend = Arc::new(backend);

        let state = AppState::new(Arc::clone(&backend), config);
        let app = medrec_rest::routing::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            patients: Vec::new(),
            medications: Vec::new(),
        }
    }

    /// Creates a harness with the fixture patients and medications stored.
    pub async fn seeded() -> Self {
        let mut harness = Self::new();
        for patient in fixtures::patients() {
            let stored = harness
                .backend
                .create_patient(patient)
                .await
                .expect("Failed to seed patient");
            harness.patients.push(stored);
        }
        for medication in fixtures::medications() {
            let stored = harness
                .backend
                .create_medication(medication)
                .await
                .expect("Failed to seed medication");
            harness.medications.push(stored);
        }
        harness
    }

    /// Stores a prescription directly, bypassing the API.
    pub async fn store_prescription(
        &self,
        patient: &Patient,
        medication: &Medication,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
        status: PrescriptionStatus,
    ) -> Prescription {
        self.backend
            .create_prescription(NewPrescription {
                patient_id: patient.id,
                medication_id: medication.id,
                start_date: fixtures::date(start.0, start.1, start.2),
                end_date: fixtures::date(end.0, end.1, end.2),
                status,
                comment: "Test initial".to_string(),
            })
            .await
            .expect("Failed to seed prescription")
    }

    /// Reads a prescription straight from storage.
    pub async fn stored_prescription(&self, id: i64) -> Option<Prescription> {
        self.backend
            .find_prescription(id)
            .await
            .expect("Failed to read prescription")
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }

    /// Makes a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.server.post(path).json(&body).await
    }

    /// Makes a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.server.put(path).json(&body).await
    }

    /// Makes a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.server.patch(path).json(&body).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.server.delete(path).await
    }
}
