//! Error types for the MedRec REST API.
//!
//! Every error is rendered as a JSON body:
//!
//! ```json
//! { "code": "invalid", "detail": "Invalid input.", "fields": { "end_date": ["end date must be on or after start date"] } }
//! ```
//!
//! `fields` is present only for errors that can be attributed to input fields.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | NotFound | 404 | not_found |
//! | AlreadyExists | 409 | conflict |
//! | Validation | 400 | invalid |
//! | ProtectedReference | 409 | protected |
//! | Unavailable / PoolExhausted | 503 | unavailable |
//! | BackendError | 500 | server_error |

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medrec_persistence::error::{
    BackendError, IntegrityError, ResourceError, StorageError, ValidationError,
};
use serde::Serialize;
use tracing::{error, warn};

/// Client-facing detail of a 500 response. The cause is only logged.
const SERVER_ERROR_DETAIL: &str = "A server error occurred.";

/// Client-facing detail of a 503 response.
const UNAVAILABLE_DETAIL: &str = "Service temporarily unavailable, try again later.";

/// Validation messages grouped by input field, in field name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns true if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `Ok(())` when empty, otherwise a [`RestError::Validation`].
    pub fn into_result(self) -> RestResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RestError::Validation { errors: self })
        }
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| format!("{field}: {message}"))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(err.field(), field_message(&err));
        errors
    }
}

/// Message shown to API clients for a storage validation error.
pub fn field_message(err: &ValidationError) -> String {
    match err {
        ValidationError::ReferenceNotFound { id, .. } => {
            format!("Invalid pk \"{id}\" - object does not exist.")
        }
        ValidationError::InvalidField { message, .. } => message.clone(),
        ValidationError::DateRangeInvalid { .. } => err.to_string(),
    }
}

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Record not found, or the id is not a valid identity (HTTP 404).
    NotFound {
        /// The entity name (e.g., "prescription").
        entity: String,
        /// The requested id, as sent by the client.
        id: String,
    },

    /// Input failed validation, attributed to fields (HTTP 400).
    Validation {
        /// Messages per field.
        errors: FieldErrors,
    },

    /// Malformed request that no field can be blamed for (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// A record with the same unique key exists (HTTP 409).
    Conflict {
        /// Error message.
        message: String,
    },

    /// Deletion refused because the record is still referenced (HTTP 409).
    ProtectedReference {
        /// Error message.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Request body exceeds the configured limit (HTTP 413).
    PayloadTooLarge,

    /// Method not allowed (HTTP 405).
    MethodNotAllowed {
        /// The method that was attempted.
        method: String,
    },

    /// Storage is not reachable (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { entity, id } => write!(f, "Not found: {} {}", entity, id),
            RestError::Validation { errors } => write!(f, "Invalid input: {}", errors.summary()),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Conflict { message } => write!(f, "Conflict: {}", message),
            RestError::ProtectedReference { message } => write!(f, "Protected: {}", message),
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::PayloadTooLarge => write!(f, "Request body too large"),
            RestError::MethodNotAllowed { method } => write!(f, "Method {} not allowed", method),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            RestError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found", "Not found.".to_string())
            }
            RestError::Validation { errors } => {
                (StatusCode::BAD_REQUEST, "invalid", errors.summary())
            }
            RestError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "parse_error", message.clone())
            }
            RestError::Conflict { message } => (StatusCode::CONFLICT, "conflict", message.clone()),
            RestError::ProtectedReference { message } => {
                (StatusCode::CONFLICT, "protected", message.clone())
            }
            RestError::UnsupportedMediaType { content_type } => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                format!("Unsupported media type \"{}\" in request.", content_type),
            ),
            RestError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "Request body too large.".to_string(),
            ),
            RestError::MethodNotAllowed { method } => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                format!("Method \"{}\" not allowed.", method),
            ),
            RestError::ServiceUnavailable { message } => {
                warn!(error = %message, "Storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    UNAVAILABLE_DETAIL.to_string(),
                )
            }
            RestError::InternalError { message } => {
                error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    SERVER_ERROR_DETAIL.to_string(),
                )
            }
        };

        let fields = match &self {
            RestError::Validation { errors } => Some(errors),
            _ => None,
        };

        let body = ErrorBody {
            code,
            detail,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Integrity(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { entity, id } => RestError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            },
            ResourceError::AlreadyExists { .. } => RestError::Conflict {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::Validation {
            errors: err.into(),
        }
    }
}

impl From<IntegrityError> for RestError {
    fn from(err: IntegrityError) -> Self {
        match err {
            IntegrityError::ProtectedReference { .. } => RestError::ProtectedReference {
                message: err.to_string(),
            },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable { .. }
            | BackendError::ConnectionFailed { .. }
            | BackendError::PoolExhausted { .. } => RestError::ServiceUnavailable {
                message: err.to_string(),
            },
            _ => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
