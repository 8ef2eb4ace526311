//! List handlers.
//!
//! `GET [base]/[collection]?[filters]` returns every matching record as a
//! JSON array in the collection's default order. There is no pagination.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use medrec_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::FilterParams;
use crate::responses::PrescriptionRepresentation;
use crate::state::AppState;

/// Handler for `GET [base]/patients`.
///
/// # Query Parameters
///
/// - `nom` (alias `last_name`) - Last name contains, ignoring case
/// - `date_naissance` (alias `birth_date`) - Exact birth date, `YYYY-MM-DD`
pub async fn list_patients_handler<S>(
    State(state): State<AppState<S>>,
    params: FilterParams,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let filter = params.patient_filter()?;
    debug!(filter = ?filter, "Processing patient list request");

    let patients = state.storage().list_patients(&filter).await?;

    debug!(count = patients.len(), "Returning patients");
    Ok(Json(patients).into_response())
}

/// Handler for `GET [base]/medications`.
///
/// # Query Parameters
///
/// - `status` - `actif` or `suppr`
pub async fn list_medications_handler<S>(
    State(state): State<AppState<S>>,
    params: FilterParams,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let filter = params.medication_filter()?;
    debug!(filter = ?filter, "Processing medication list request");

    let medications = state.storage().list_medications(&filter).await?;

    debug!(count = medications.len(), "Returning medications");
    Ok(Json(medications).into_response())
}

/// Handler for `GET [base]/prescriptions`.
///
/// # Query Parameters
///
/// - `patient`, `medication` - Exact reference ids
/// - `status` - `valide`, `en_attente` or `suppr`
/// - `start_date_from`, `start_date_to` - Inclusive bounds on the start date
/// - `end_date_from`, `end_date_to` - Inclusive bounds on the end date
///
/// # Response
///
/// - `200 OK` - Matching prescriptions, most recent start first
/// - `400 Bad Request` - A filter value is malformed
pub async fn list_prescriptions_handler<S>(
    State(state): State<AppState<S>>,
    params: FilterParams,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let filter = params.prescription_filter()?;
    debug!(filter = ?filter, "Processing prescription list request");

    let prescriptions: Vec<PrescriptionRepresentation> = state
        .storage()
        .list_prescriptions(&filter)
        .await?
        .into_iter()
        .map(PrescriptionRepresentation::from)
        .collect();

    debug!(count = prescriptions.len(), "Returning prescriptions");
    Ok(Json(prescriptions).into_response())
}
