//! Partial update handler.
//!
//! `PATCH [base]/prescriptions/[id]`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{RecordId, RecordPayload};
use crate::responses::PrescriptionRepresentation;
use crate::state::AppState;
use crate::validation::{WriteMode, check_prescription, parse_prescription};

/// Handler for partially updating a prescription.
///
/// Submitted fields are merged over the stored record and the merged record
/// is validated as a whole, so moving only `start_date` past the stored
/// `end_date` is rejected.
///
/// # Response
///
/// - `200 OK` - Prescription updated
/// - `400 Bad Request` - Field errors; the stored record is unchanged
/// - `404 Not Found` - No such prescription
pub async fn patch_prescription_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
    payload: RecordPayload,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, fields = payload.0.len(), "Processing prescription patch request");

    let current = state.storage().get_prescription(id).await?;
    let patch = parse_prescription(&payload, WriteMode::Partial)?;
    check_prescription(state.storage(), &patch.apply_to(&current)).await?;

    let updated = state.storage().update_prescription(id, patch).await?;

    debug!(id, "Prescription patched");
    Ok(Json(PrescriptionRepresentation::from(updated)).into_response())
}
