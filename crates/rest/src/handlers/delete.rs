//! Delete handler.
//!
//! `DELETE [base]/prescriptions/[id]`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::RecordId;
use crate::state::AppState;

/// Handler for deleting a prescription.
///
/// Deletion is permanent.
///
/// # Response
///
/// - `204 No Content` - Prescription deleted
/// - `404 Not Found` - No such prescription
///
/// # Example
///
/// ```http
/// DELETE /prescriptions/12 HTTP/1.1
/// ```
pub async fn delete_prescription_handler<S>(
    State(state): State<AppState<S>>,
    RecordId(id): RecordId,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(id, "Processing prescription delete request");

    state.storage().delete_prescription(id).await?;

    debug!(id, "Prescription deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
