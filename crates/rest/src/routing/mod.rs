//! HTTP routing for the MedRec REST API.

pub mod routes;

pub use routes::create_routes;
