//! Route configuration.
//!
//! Defines all routes for the MedRec REST API.

use axum::{
    Router,
    routing::{MethodRouter, get},
};
use medrec_persistence::core::RecordStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Read-only collections
/// - `GET /patients`, `GET /patients/{id}`
/// - `GET /medications`, `GET /medications/{id}`
///
/// ## Prescriptions
/// - `GET /prescriptions` - List
/// - `POST /prescriptions` - Create
/// - `GET /prescriptions/{id}` - Retrieve
/// - `PUT /prescriptions/{id}` - Update
/// - `PATCH /prescriptions/{id}` - Partial update
/// - `DELETE /prescriptions/{id}` - Delete
///
/// Unserved methods answer `405` and unknown paths `404`, both with a JSON
/// error body.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", json_405(get(handlers::health_handler::<S>)))
        .route("/_liveness", json_405(get(handlers::liveness_handler)))
        .route("/_readiness", json_405(get(handlers::readiness_handler::<S>)))
        // Read-only collections
        .route(
            "/patients",
            json_405(get(handlers::list_patients_handler::<S>)),
        )
        .route(
            "/patients/{id}",
            json_405(get(handlers::read_patient_handler::<S>)),
        )
        .route(
            "/medications",
            json_405(get(handlers::list_medications_handler::<S>)),
        )
        .route(
            "/medications/{id}",
            json_405(get(handlers::read_medication_handler::<S>)),
        )
        // Prescriptions
        .route(
            "/prescriptions",
            json_405(
                get(handlers::list_prescriptions_handler::<S>)
                    .post(handlers::create_prescription_handler::<S>),
            ),
        )
        .route(
            "/prescriptions/{id}",
            json_405(
                get(handlers::read_prescription_handler::<S>)
                    .put(handlers::update_prescription_handler::<S>)
                    .patch(handlers::patch_prescription_handler::<S>)
                    .delete(handlers::delete_prescription_handler::<S>),
            ),
        )
        .fallback(handlers::not_found_handler)
        // State
        .with_state(state)
}

fn json_405<S>(route: MethodRouter<AppState<S>>) -> MethodRouter<AppState<S>>
where
    S: RecordStorage + Send + Sync + 'static,
{
    route.fallback(handlers::method_not_allowed_handler)
}
