//! Fallback handlers for unrouted requests.
//!
//! Both render the usual JSON error body instead of axum's empty defaults.

use axum::http::{Method, Uri};

use crate::error::RestError;

/// Handler for paths that match no route.
pub async fn not_found_handler(uri: Uri) -> RestError {
    RestError::NotFound {
        entity: "route".to_string(),
        id: uri.path().to_string(),
    }
}

/// Handler for methods a route does not serve.
///
/// Read-only collections use it for `POST`, `PUT`, `PATCH` and `DELETE`.
pub async fn method_not_allowed_handler(method: Method) -> RestError {
    RestError::MethodNotAllowed {
        method: method.to_string(),
    }
}
