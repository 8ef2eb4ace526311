//! Full update handler.
//!
//! `PUT [base]/prescriptions/[id]`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use medrec_persistence::types::PrescriptionPatch;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{RecordId, RecordPayload};
use crate::responses::PrescriptionRepresentation;
use crate::state::AppState;
use crate::validation::{WriteMode, check_prescription, parse_prescription};

/// Handler for replacing a prescription.
///
/// Every writable field except `comment` must be present. An omitted
/// `comment` keeps its stored value.
///
/// # Response
///
/// - `200 OK` - Prescription updated
/// - `400 Bad Request` - Field errors; the stored record is unchanged
/// - `404 Not Found` - No such prescription
pub async fn update_prescription_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
    payload: RecordPayload,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, "Processing prescription update request");

    let current = state.storage().get_prescription(id).await?;
    let candidate = parse_prescription(&payload, WriteMode::Replace)?.apply_to(&current);
    check_prescription(state.storage(), &candidate).await?;

    let updated = state
        .storage()
        .update_prescription(id, PrescriptionPatch::from(candidate))
        .await?;

    debug!(id, "Prescription updated");
    Ok(Json(PrescriptionRepresentation::from(updated)).into_response())
}
