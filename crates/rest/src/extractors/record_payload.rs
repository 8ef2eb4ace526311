//! Record payload extractor.
//!
//! Reads a write request body into a JSON object. Two encodings are
//! accepted: `application/json` and `application/x-www-form-urlencoded`.
//! Form values arrive as strings; field parsers accept both shapes.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::error::{FieldErrors, RestError};

/// Media type of JSON bodies.
const JSON: &str = "application/json";

/// Media type of HTML form bodies.
const FORM: &str = "application/x-www-form-urlencoded";

/// A write request body decoded into field/value pairs.
///
/// An empty body decodes to an empty object, which a partial update accepts.
#[derive(Debug, Default)]
pub struct RecordPayload(pub Map<String, Value>);

impl RecordPayload {
    /// Returns the value submitted for a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Decodes a body according to its content type.
    pub fn decode(content_type: Option<&str>, bytes: &[u8]) -> Result<Self, PayloadRejection> {
        let media_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match media_type.as_deref() {
            None | Some("") if bytes.is_empty() => Ok(Self::default()),
            None | Some("") | Some(JSON) => Self::from_json(bytes),
            Some(ct) if ct.ends_with("+json") => Self::from_json(bytes),
            Some(FORM) => Ok(Self::from_form(bytes)),
            Some(_) => Err(PayloadRejection::UnsupportedMediaType(
                content_type.unwrap_or_default().to_string(),
            )),
        }
    }

    fn from_json(bytes: &[u8]) -> Result<Self, PayloadRejection> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| PayloadRejection::InvalidJson(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PayloadRejection::NotAnObject(json_type_name(&other))),
        }
    }

    fn from_form(bytes: &[u8]) -> Self {
        let map = url::form_urlencoded::parse(bytes)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();
        Self(map)
    }
}

/// Name of a JSON value's type, as reported in type errors.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Rejection type for [`RecordPayload`] extraction.
#[derive(Debug)]
pub enum PayloadRejection {
    /// Body is not valid JSON.
    InvalidJson(String),
    /// Body is JSON but not an object.
    NotAnObject(&'static str),
    /// Content type is neither JSON nor form-encoded.
    UnsupportedMediaType(String),
    /// Body exceeds the configured limit.
    TooLarge,
    /// Body could not be read.
    Unreadable(String),
}

impl From<PayloadRejection> for RestError {
    fn from(rejection: PayloadRejection) -> Self {
        match rejection {
            PayloadRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("JSON parse error - {}", msg),
            },
            PayloadRejection::NotAnObject(found) => {
                let mut errors = FieldErrors::new();
                errors.add(
                    "non_field_errors",
                    format!("Invalid data. Expected a dictionary, but got {}.", found),
                );
                RestError::Validation { errors }
            }
            PayloadRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
            PayloadRejection::TooLarge => RestError::PayloadTooLarge,
            PayloadRejection::Unreadable(msg) => RestError::BadRequest { message: msg },
        }
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        RestError::from(self).into_response()
    }
}

impl<S> FromRequest<S> for RecordPayload
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                PayloadRejection::TooLarge
            } else {
                PayloadRejection::Unreadable(e.body_text())
            }
        })?;

        Self::decode(content_type.as_deref(), &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object() {
        let payload =
            RecordPayload::decode(Some("application/json"), br#"{"patient": 1}"#).unwrap();
        assert_eq!(payload.get("patient"), Some(&json!(1)));
    }

    #[test]
    fn test_json_with_charset() {
        let payload = RecordPayload::decode(
            Some("application/json; charset=utf-8"),
            br#"{"status": "valide"}"#,
        )
        .unwrap();
        assert_eq!(payload.get("status"), Some(&json!("valide")));
    }

    #[test]
    fn test_form_values_are_strings() {
        let payload = RecordPayload::decode(
            Some("application/x-www-form-urlencoded"),
            b"patient=3&comment=Prise+le+soir&start_date=2025-01-01",
        )
        .unwrap();
        assert_eq!(payload.get("patient"), Some(&json!("3")));
        assert_eq!(payload.get("comment"), Some(&json!("Prise le soir")));
    }

    #[test]
    fn test_empty_body_without_content_type() {
        let payload = RecordPayload::decode(None, b"").unwrap();
        assert!(payload.0.is_empty());
    }

    #[test]
    fn test_missing_content_type_defaults_to_json() {
        let payload = RecordPayload::decode(None, br#"{"comment": "x"}"#).unwrap();
        assert_eq!(payload.get("comment"), Some(&json!("x")));
    }

    #[test]
    fn test_array_is_rejected() {
        let err = RecordPayload::decode(Some("application/json"), b"[1, 2]").unwrap_err();
        assert!(matches!(err, PayloadRejection::NotAnObject("list")));
    }

    #[test]
    fn test_invalid_json() {
        let err = RecordPayload::decode(Some("application/json"), b"{").unwrap_err();
        assert!(matches!(err, PayloadRejection::InvalidJson(_)));
    }

    #[test]
    fn test_unsupported_media_type() {
        let err = RecordPayload::decode(Some("text/plain"), b"hello").unwrap_err();
        match err {
            PayloadRejection::UnsupportedMediaType(ct) => assert_eq!(ct, "text/plain"),
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!(true)), "bool");
        assert_eq!(json_type_name(&json!({})), "dict");
    }
}
