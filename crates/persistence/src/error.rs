//! Error types for the persistence layer.
//!
//! Errors are grouped by category so that callers (the REST layer in
//! particular) can map each group onto a response class without inspecting
//! messages: resource state, validation of a candidate record, referential
//! integrity, and backend failures.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Message reported when a prescription ends before it starts.
pub const DATE_RANGE_MESSAGE: &str = "end date must be on or after start date";

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors raised before a write is committed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referential integrity errors
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A record with the same unique key already exists.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },
}

/// Errors raised when a candidate record violates a business rule.
///
/// Every variant is attributable to a single input field, see
/// [`ValidationError::field`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The end date precedes the start date.
    #[error("end date must be on or after start date")]
    DateRangeInvalid { field: &'static str },

    /// A referenced record does not exist.
    #[error("{entity} {id} referenced by '{field}' does not exist")]
    ReferenceNotFound {
        field: &'static str,
        entity: &'static str,
        id: i64,
    },

    /// A field value is not acceptable.
    #[error("invalid value for '{field}': {message}")]
    InvalidField { field: &'static str, message: String },
}

impl ValidationError {
    /// Returns the name of the input field the error is attributed to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::DateRangeInvalid { field }
            | ValidationError::ReferenceNotFound { field, .. }
            | ValidationError::InvalidField { field, .. } => *field,
        }
    }
}

/// Errors related to relations between records.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// The record is still referenced and its relation forbids deletion.
    #[error("cannot delete {entity} {id}: referenced by {count} {referenced_by}")]
    ProtectedReference {
        entity: &'static str,
        id: i64,
        referenced_by: &'static str,
        count: u64,
    },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema creation error.
    #[error("schema initialization failed: {message}")]
    SchemaError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data could not be decoded.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            entity: "prescription",
            id: 12,
        });
        assert_eq!(err.to_string(), "prescription not found: 12");
    }

    #[test]
    fn test_date_range_message() {
        let err = ValidationError::DateRangeInvalid { field: "end_date" };
        assert_eq!(err.to_string(), DATE_RANGE_MESSAGE);
        assert_eq!(err.field(), "end_date");
    }

    #[test]
    fn test_reference_not_found_field() {
        let err = ValidationError::ReferenceNotFound {
            field: "patient",
            entity: "patient",
            id: 9999,
        };
        assert_eq!(err.field(), "patient");
        assert!(err.to_string().contains("9999"));
    }

    #[test]
    fn test_protected_reference_display() {
        let err = IntegrityError::ProtectedReference {
            entity: "medication",
            id: 3,
            referenced_by: "prescriptions",
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "cannot delete medication 3: referenced by 2 prescriptions"
        );
    }

    #[test]
    fn test_storage_error_from_validation() {
        let err: StorageError = ValidationError::DateRangeInvalid { field: "end_date" }.into();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::DateRangeInvalid { .. })
        ));
    }
}
