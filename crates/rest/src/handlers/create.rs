//! Create handler.
//!
//! `POST [base]/prescriptions`

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::RecordPayload;
use crate::responses::PrescriptionRepresentation;
use crate::state::AppState;
use crate::validation::{WriteMode, check_prescription, parse_prescription};

/// Handler for prescription creation.
///
/// The payload is parsed, references are checked, and the date rule runs
/// before the record reaches storage.
///
/// # HTTP Request
///
/// `POST [base]/prescriptions`
///
/// # Response
///
/// - `201 Created` - Prescription created, `Location` header set
/// - `400 Bad Request` - Field errors, including a dangling reference or an
///   end date before the start date
/// - `415 Unsupported Media Type` - Body is neither JSON nor form-encoded
///
/// # Example
///
/// ```http
/// POST /prescriptions HTTP/1.1
/// Content-Type: application/json
///
/// {"patient": 1, "medication": 1, "start_date": "2025-01-01",
///  "end_date": "2025-01-10", "status": "valide"}
/// ```
pub async fn create_prescription_handler<S>(
    State(state): State<AppState<S>>,
    payload: RecordPayload,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(fields = payload.0.len(), "Processing prescription create request");

    let candidate = parse_prescription(&payload, WriteMode::Create)?
        .into_new()
        .ok_or_else(|| RestError::InternalError {
            message: "parsed payload is incomplete".to_string(),
        })?;
    check_prescription(state.storage(), &candidate).await?;

    let created = state.storage().create_prescription(candidate).await?;

    let location = state.record_url("prescriptions", created.id);

    debug!(
        id = created.id,
        patient = created.patient_id,
        location = %location,
        "Prescription created"
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PrescriptionRepresentation::from(created)),
    )
        .into_response())
}
