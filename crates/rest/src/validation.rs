//! Validation of prescription write payloads.
//!
//! A payload is checked in two passes, mirroring how the storage layer
//! validates a record:
//!
//! 1. [`parse_prescription`] reads each submitted field and collects every
//!    type, format and presence error.
//! 2. [`check_prescription`] checks the complete candidate record: referenced
//!    patient and medication must exist, then the date rule runs on the final
//!    `(start_date, end_date)` pair.
//!
//! The storage backend runs the same date rule again before committing.

use chrono::NaiveDate;
use medrec_persistence::core::RecordStorage;
use medrec_persistence::types::{NewPrescription, PrescriptionPatch, PrescriptionStatus};
use medrec_persistence::validation::{parse_iso_date, validate_date_range};
use serde_json::Value;

use crate::error::{FieldErrors, RestResult};
use crate::extractors::{RecordPayload, json_type_name};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const DATE_FORMAT: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// How a payload relates to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `POST`: every field but `comment` is required.
    Create,
    /// `PUT`: every field but `comment` is required; an omitted comment is kept.
    Replace,
    /// `PATCH`: every field is optional.
    Partial,
}

impl WriteMode {
    fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// Reads the writable prescription fields from a payload.
///
/// `id`, `created_at`, `updated_at`, `patient_full_name` and unknown fields
/// are ignored.
pub fn parse_prescription(payload: &RecordPayload, mode: WriteMode) -> RestResult<PrescriptionPatch> {
    let mut errors = FieldErrors::new();

    let patch = PrescriptionPatch {
        patient_id: field(payload, "patient", mode, &mut errors, parse_reference),
        medication_id: field(payload, "medication", mode, &mut errors, parse_reference),
        start_date: field(payload, "start_date", mode, &mut errors, parse_date),
        end_date: field(payload, "end_date", mode, &mut errors, parse_date),
        status: field(payload, "status", mode, &mut errors, parse_status),
        comment: field(payload, "comment", WriteMode::Partial, &mut errors, parse_text),
    };

    errors.into_result().map(|()| patch)
}

/// Checks a complete candidate record before it is written.
///
/// Reference errors are reported together. The date rule is checked only
/// once every field is individually valid.
pub async fn check_prescription<S>(storage: &S, candidate: &NewPrescription) -> RestResult<()>
where
    S: RecordStorage + ?Sized,
{
    let mut errors = FieldErrors::new();

    if storage.find_patient(candidate.patient_id).await?.is_none() {
        errors.add("patient", does_not_exist(candidate.patient_id));
    }
    if storage
        .find_medication(candidate.medication_id)
        .await?
        .is_none()
    {
        errors.add("medication", does_not_exist(candidate.medication_id));
    }
    errors.into_result()?;

    validate_date_range(candidate.start_date, candidate.end_date).map_err(Into::into)
}

fn does_not_exist(id: impl std::fmt::Display) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Reads one field, recording presence and parse errors.
fn field<T>(
    payload: &RecordPayload,
    name: &'static str,
    mode: WriteMode,
    errors: &mut FieldErrors,
    parse: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    match payload.get(name) {
        None => {
            if mode.requires_all() {
                errors.add(name, REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            None
        }
        Some(value) => match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                errors.add(name, message);
                None
            }
        },
    }
}

fn parse_reference(value: &Value) -> Result<i64, String> {
    let incorrect_type = || {
        format!(
            "Incorrect type. Expected pk value, received {}.",
            json_type_name(value)
        )
    };
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(incorrect_type),
        Value::String(s) if s.trim().is_empty() => Err(NOT_NULL.to_string()),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| incorrect_type()),
        _ => Err(incorrect_type()),
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    value
        .as_str()
        .and_then(|s| parse_iso_date(s.trim()))
        .ok_or_else(|| DATE_FORMAT.to_string())
}

fn parse_status(value: &Value) -> Result<PrescriptionStatus, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    raw.parse::<PrescriptionStatus>().map_err(|e| e.to_string())
}

fn parse_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err("Not a valid string.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RecordPayload {
        match value {
            Value::Object(map) => RecordPayload(map),
            _ => panic!("payload must be an object"),
        }
    }

    fn field_errors(result: RestResult<PrescriptionPatch>) -> FieldErrors {
        match result {
            Err(crate::error::RestError::Validation { errors }) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_parses_every_field() {
        let patch = parse_prescription(
            &payload(json!({
                "patient": 1,
                "medication": "2",
                "start_date": "2025-01-01",
                "end_date": "2025-01-10",
                "status": "valide",
                "comment": "Matin et soir",
                "patient_full_name": "ignored",
                "id": 99
            })),
            WriteMode::Create,
        )
        .unwrap();

        assert_eq!(patch.patient_id, Some(1));
        assert_eq!(patch.medication_id, Some(2));
        assert_eq!(patch.start_date, Some(date(2025, 1, 1)));
        assert_eq!(patch.end_date, Some(date(2025, 1, 10)));
        assert_eq!(patch.status, Some(PrescriptionStatus::Validated));
        assert_eq!(patch.comment.as_deref(), Some("Matin et soir"));
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = field_errors(parse_prescription(&payload(json!({})), WriteMode::Create));
        for name in ["patient", "medication", "start_date", "end_date", "status"] {
            assert_eq!(errors.get(name), Some(&[REQUIRED.to_string()][..]), "{name}");
        }
        assert!(errors.get("comment").is_none());
    }

    #[test]
    fn test_replace_requires_fields_but_not_comment() {
        let patch = parse_prescription(
            &payload(json!({
                "patient": 1,
                "medication": 2,
                "start_date": "2025-01-01",
                "end_date": "2025-01-10",
                "status": "en_attente"
            })),
            WriteMode::Replace,
        )
        .unwrap();
        assert!(patch.comment.is_none());

        let errors = field_errors(parse_prescription(
            &payload(json!({"status": "valide"})),
            WriteMode::Replace,
        ));
        assert!(errors.get("patient").is_some());
    }

    #[test]
    fn test_partial_accepts_subset() {
        let patch = parse_prescription(
            &payload(json!({"end_date": "2025-02-01"})),
            WriteMode::Partial,
        )
        .unwrap();
        assert_eq!(patch.end_date, Some(date(2025, 2, 1)));
        assert!(patch.start_date.is_none());
    }

    #[test]
    fn test_type_and_format_errors() {
        let errors = field_errors(parse_prescription(
            &payload(json!({
                "patient": "abc",
                "medication": true,
                "start_date": "10/05/2025",
                "end_date": null,
                "status": "active",
                "comment": ["x"]
            })),
            WriteMode::Partial,
        ));

        assert_eq!(
            errors.get("patient"),
            Some(&["Incorrect type. Expected pk value, received str.".to_string()][..])
        );
        assert_eq!(
            errors.get("medication"),
            Some(&["Incorrect type. Expected pk value, received bool.".to_string()][..])
        );
        assert_eq!(errors.get("start_date"), Some(&[DATE_FORMAT.to_string()][..]));
        assert_eq!(errors.get("end_date"), Some(&[NOT_NULL.to_string()][..]));
        assert_eq!(
            errors.get("status"),
            Some(&["\"active\" is not a valid choice.".to_string()][..])
        );
        assert_eq!(
            errors.get("comment"),
            Some(&["Not a valid string.".to_string()][..])
        );
    }

    #[test]
    fn test_five_digit_year_has_wrong_format() {
        let errors = field_errors(parse_prescription(
            &payload(json!({
                "start_date": "2025-01-01",
                "end_date": "+10000-01-01",
            })),
            WriteMode::Partial,
        ));
        assert_eq!(errors.get("start_date"), None);
        assert_eq!(errors.get("end_date"), Some(&[DATE_FORMAT.to_string()][..]));
    }

    #[test]
    fn test_empty_form_reference_is_null() {
        let errors = field_errors(parse_prescription(
            &payload(json!({"patient": ""})),
            WriteMode::Partial,
        ));
        assert_eq!(errors.get("patient"), Some(&[NOT_NULL.to_string()][..]));
    }
}
