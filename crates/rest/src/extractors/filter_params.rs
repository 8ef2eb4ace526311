//! List filter parameters extractor.
//!
//! Collects the query string of a list request and turns it into one of the
//! persistence filters. Unknown parameters and empty values are ignored. A
//! known parameter with a malformed value is a field error.
//!
//! # Parameters
//!
//! | Collection | Parameter | Alias | Matches |
//! |------------|-----------|-------|---------|
//! | patients | `nom` | `last_name` | last name contains, ignoring case |
//! | patients | `date_naissance` | `birth_date` | exact birth date |
//! | medications | `status` | | exact status |
//! | prescriptions | `patient`, `medication` | | exact reference |
//! | prescriptions | `status` | | exact status |
//! | prescriptions | `start_date_from`, `start_date_to` | | inclusive start date bounds |
//! | prescriptions | `end_date_from`, `end_date_to` | | inclusive end date bounds |

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::NaiveDate;
use medrec_persistence::filter::{MedicationFilter, PatientFilter, PrescriptionFilter};
use medrec_persistence::types::{MedicationStatus, PrescriptionStatus};
use medrec_persistence::validation::parse_iso_date;

use crate::error::{FieldErrors, RestError, RestResult};

/// Query parameters of a list request.
#[derive(Debug, Default, Clone)]
pub struct FilterParams {
    params: HashMap<String, String>,
}

impl FilterParams {
    /// Creates filter parameters from a map.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Returns the first non-empty value among `names`.
    fn value(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.params.get(*name))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Builds the patient filter.
    pub fn patient_filter(&self) -> RestResult<PatientFilter> {
        let mut errors = FieldErrors::new();
        let filter = PatientFilter {
            last_name: self.value(&["nom", "last_name"]).map(str::to_string),
            birth_date: self.date(&["date_naissance", "birth_date"], &mut errors),
        };
        errors.into_result().map(|()| filter)
    }

    /// Builds the medication filter.
    pub fn medication_filter(&self) -> RestResult<MedicationFilter> {
        let mut errors = FieldErrors::new();
        let filter = MedicationFilter {
            status: self.choice::<MedicationStatus>("status", &mut errors),
        };
        errors.into_result().map(|()| filter)
    }

    /// Builds the prescription filter.
    pub fn prescription_filter(&self) -> RestResult<PrescriptionFilter> {
        let mut errors = FieldErrors::new();
        let filter = PrescriptionFilter {
            patient: self.reference("patient", &mut errors),
            medication: self.reference("medication", &mut errors),
            status: self.choice::<PrescriptionStatus>("status", &mut errors),
            start_date_from: self.date(&["start_date_from"], &mut errors),
            start_date_to: self.date(&["start_date_to"], &mut errors),
            end_date_from: self.date(&["end_date_from"], &mut errors),
            end_date_to: self.date(&["end_date_to"], &mut errors),
        };
        errors.into_result().map(|()| filter)
    }

    fn date(&self, names: &[&str], errors: &mut FieldErrors) -> Option<NaiveDate> {
        let raw = self.value(names)?;
        match parse_iso_date(raw) {
            Some(date) => Some(date),
            None => {
                errors.add(names[0], "Enter a valid date.");
                None
            }
        }
    }

    fn reference(&self, name: &str, errors: &mut FieldErrors) -> Option<i64> {
        let raw = self.value(&[name])?;
        match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(
                    name,
                    "Select a valid choice. That choice is not one of the available choices.",
                );
                None
            }
        }
    }

    fn choice<T: FromStr>(&self, name: &str, errors: &mut FieldErrors) -> Option<T> {
        let raw = self.value(&[name])?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.add(
                    name,
                    format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        raw
                    ),
                );
                None
            }
        }
    }
}

impl<S> FromRequestParts<S> for FilterParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Invalid query parameters: {}", e.body_text()),
            })?;

        Ok(FilterParams::from_map(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> FilterParams {
        FilterParams::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_patient_filter_names() {
        let filter = params(&[("nom", "mart"), ("date_naissance", "1992-03-10")])
            .patient_filter()
            .unwrap();
        assert_eq!(filter.last_name.as_deref(), Some("mart"));
        assert_eq!(filter.birth_date, Some(date(1992, 3, 10)));
    }

    #[test]
    fn test_patient_filter_aliases() {
        let filter = params(&[("last_name", "dur"), ("birth_date", "1980-05-20")])
            .patient_filter()
            .unwrap();
        assert_eq!(filter.last_name.as_deref(), Some("dur"));
        assert_eq!(filter.birth_date, Some(date(1980, 5, 20)));
    }

    #[test]
    fn test_unknown_and_empty_params_are_ignored() {
        let filter = params(&[("colour", "blue"), ("nom", ""), ("status", "  ")])
            .patient_filter()
            .unwrap();
        assert_eq!(filter, PatientFilter::default());

        let filter = params(&[("status", "")]).medication_filter().unwrap();
        assert_eq!(filter, MedicationFilter::default());
    }

    #[test]
    fn test_bad_date_is_a_field_error() {
        let err = params(&[("start_date_from", "01/02/2025")])
            .prescription_filter()
            .unwrap_err();
        match err {
            RestError::Validation { errors } => {
                assert_eq!(
                    errors.get("start_date_from"),
                    Some(&["Enter a valid date.".to_string()][..])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_five_digit_year_is_a_field_error() {
        let err = params(&[("end_date_from", "+10000-01-01"), ("date_naissance", "10000-01-01")])
            .prescription_filter()
            .unwrap_err();
        match err {
            RestError::Validation { errors } => {
                assert_eq!(
                    errors.get("end_date_from"),
                    Some(&["Enter a valid date.".to_string()][..])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(
            params(&[("date_naissance", "10000-01-01")])
                .patient_filter()
                .is_err()
        );
    }

    #[test]
    fn test_bad_status_and_reference() {
        let err = params(&[("status", "active"), ("patient", "abc")])
            .prescription_filter()
            .unwrap_err();
        match err {
            RestError::Validation { errors } => {
                assert!(errors.get("status").is_some());
                assert!(errors.get("patient").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prescription_filter_all_params() {
        let filter = params(&[
            ("patient", "1"),
            ("medication", "2"),
            ("status", "en_attente"),
            ("start_date_from", "2025-01-01"),
            ("start_date_to", "2025-01-31"),
            ("end_date_from", "2025-02-01"),
            ("end_date_to", "2025-02-28"),
        ])
        .prescription_filter()
        .unwrap();
        assert_eq!(filter.patient, Some(1));
        assert_eq!(filter.medication, Some(2));
        assert_eq!(filter.status, Some(PrescriptionStatus::Pending));
        assert_eq!(filter.start_date_from, Some(date(2025, 1, 1)));
        assert_eq!(filter.start_date_to, Some(date(2025, 1, 31)));
        assert_eq!(filter.end_date_from, Some(date(2025, 2, 1)));
        assert_eq!(filter.end_date_to, Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_medication_status() {
        let filter = params(&[("status", "suppr")]).medication_filter().unwrap();
        assert_eq!(filter.status, Some(MedicationStatus::Retired));
    }
}
