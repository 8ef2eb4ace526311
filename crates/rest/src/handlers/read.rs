//! Retrieve handlers.
//!
//! `GET [base]/[collection]/[id]` returns one record, or `404 Not Found` when
//! the id is unknown or not a positive integer.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordId;
use crate::responses::PrescriptionRepresentation;
use crate::state::AppState;

/// Handler for `GET [base]/patients/[id]`.
pub async fn read_patient_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, "Processing patient read request");
    let patient = state.storage().get_patient(id).await?;
    Ok(Json(patient).into_response())
}

/// Handler for `GET [base]/medications/[id]`.
pub async fn read_medication_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, "Processing medication read request");
    let medication = state.storage().get_medication(id).await?;
    Ok(Json(medication).into_response())
}

/// Handler for `GET [base]/prescriptions/[id]`.
///
/// # Response
///
/// - `200 OK` - The prescription, with `patient_full_name`
/// - `404 Not Found` - No such prescription
///
/// # Example
///
/// ```http
/// GET /prescriptions/1 HTTP/1.1
/// Accept: application/json
/// ```
pub async fn read_prescription_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, "Processing prescription read request");

    let prescription = state.storage().get_prescription(id).await?;

    debug!(
        id,
        patient = prescription.patient_id,
        "Returning prescription"
    );
    Ok(Json(PrescriptionRepresentation::from(prescription)).into_response())
}
