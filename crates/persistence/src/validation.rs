//! Business rules checked before a record is written.
//!
//! [`validate_date_range`] is the prescription date rule. It is called from two
//! places that must never disagree: the storage backends run [`Validate`] on
//! the final record inside the write transaction, and the REST layer runs the
//! same function on incoming payloads before anything reaches storage.

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::types::{NewMedication, NewPatient, NewPrescription};

/// Field the date rule is attributed to.
pub const END_DATE_FIELD: &str = "end_date";

/// Maximum length of a patient name part.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum length of a medication code.
pub const MAX_CODE_LENGTH: usize = 64;

/// Maximum length of a medication label.
pub const MAX_LABEL_LENGTH: usize = 255;

/// Years a stored date may carry.
///
/// Dates are stored as `YYYY-MM-DD` text and compared as text, which only
/// orders correctly for four-digit years.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parses an ISO `YYYY-MM-DD` date whose year lies in [`YEAR_RANGE`].
///
/// Signed and five-digit years such as `+10000-01-01` are rejected.
///
/// ```
/// use medrec_persistence::validation::parse_iso_date;
///
/// assert!(parse_iso_date("2025-01-10").is_some());
/// assert!(parse_iso_date("+10000-01-01").is_none());
/// assert!(parse_iso_date("10/01/2025").is_none());
/// ```
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    if !raw.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

/// Checks that `date` can be stored.
pub fn check_date(field: &'static str, date: NaiveDate) -> Result<(), ValidationError> {
    if YEAR_RANGE.contains(&date.year()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidField {
            field,
            message: "Year must be between 1 and 9999.".to_string(),
        })
    }
}

/// Checks that a treatment does not end before it starts.
///
/// A one-day treatment (`end == start`) is valid.
///
/// # Example
///
/// ```
/// use chrono::{Datelike, NaiveDate};
/// use medrec_persistence::validation::validate_date_range;
///
/// let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let jan_10 = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// assert!(validate_date_range(jan_1, jan_10).is_ok());
/// assert!(validate_date_range(jan_10, jan_1).is_err());
/// ```
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::DateRangeInvalid {
            field: END_DATE_FIELD,
        });
    }
    Ok(())
}

/// Pre-commit hook run by storage backends on every record they write.
pub trait Validate {
    /// Returns the first rule the record violates.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for NewPrescription {
    fn validate(&self) -> Result<(), ValidationError> {
        check_date("start_date", self.start_date)?;
        check_date(END_DATE_FIELD, self.end_date)?;
        validate_date_range(self.start_date, self.end_date)
    }
}

impl Validate for NewPatient {
    fn validate(&self) -> Result<(), ValidationError> {
        check_text("last_name", &self.last_name, MAX_NAME_LENGTH)?;
        check_text("first_name", &self.first_name, MAX_NAME_LENGTH)?;
        match self.birth_date {
            Some(birth_date) => check_date("birth_date", birth_date),
            None => Ok(()),
        }
    }
}

impl Validate for NewMedication {
    fn validate(&self) -> Result<(), ValidationError> {
        check_text("code", &self.code, MAX_CODE_LENGTH)?;
        check_text("label", &self.label, MAX_LABEL_LENGTH)
    }
}

fn check_text(field: &'static str, value: &str, max_length: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field,
            message: "This field may not be blank.".to_string(),
        });
    }
    if value.chars().count() > max_length {
        return Err(ValidationError::InvalidField {
            field,
            message: format!("Ensure this field has no more than {max_length} characters."),
        });
    }
    Ok(())
}
