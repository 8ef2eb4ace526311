//! Record identity extractor.
//!
//! Extracts the `{id}` path segment of instance routes. Identities are
//! positive integers; anything else cannot name a record and yields 404.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::RestError;

/// The identity of the record addressed by the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Parses a raw path segment.
    ///
    /// `entity` is only used to describe the failure.
    pub fn parse(entity: &str, raw: &str) -> Result<Self, RestError> {
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(RecordId(id)),
            _ => Err(RestError::NotFound {
                entity: entity.to_string(),
                id: raw.to_string(),
            }),
        }
    }
}

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let collection = parts
            .uri
            .path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| RestError::NotFound {
                entity: collection.clone(),
                id: String::new(),
            })?;

        RecordId::parse(&collection, &raw)
    }
}
