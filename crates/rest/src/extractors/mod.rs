//! Custom Axum extractors for the MedRec REST API.
//!
//! - [`RecordId`] - The `{id}` path segment, 404 when not a valid identity
//! - [`RecordPayload`] - JSON or form-encoded write bodies
//! - [`FilterParams`] - List query parameters

mod filter_params;
mod record_id;
mod record_payload;

pub use filter_params::FilterParams;
pub use record_id::RecordId;
pub use record_payload::{PayloadRejection, RecordPayload, json_type_name};
