//! List filters.
//!
//! A filter describes which records a list operation should return. Filters
//! are plain data; [`Filter::criteria`] turns one into backend-agnostic
//! [`Criterion`] values that every criterion must satisfy (logical AND).
//! Backends translate criteria into their own query language.
//!
//! An unset field imposes no constraint, so `Default::default()` matches
//! everything.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use medrec_persistence::filter::{Criterion, Filter, PrescriptionFilter};
//!
//! let filter = PrescriptionFilter {
//!     start_date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
//!     ..Default::default()
//! };
//! assert_eq!(filter.criteria().len(), 1);
//! assert!(matches!(filter.criteria()[0], Criterion::Range { column: "start_date", .. }));
//! ```

use chrono::NaiveDate;

use crate::types::{MedicationStatus, PrescriptionStatus};

/// A typed value compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Integer value (identities).
    Integer(i64),
    /// Text value (enumeration wire values, names).
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
}

/// A single condition on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// The column contains `value`, ignoring case.
    ContainsIgnoreCase {
        /// Column name.
        column: &'static str,
        /// Substring to look for.
        value: String,
    },
    /// The column equals `value`.
    Equals {
        /// Column name.
        column: &'static str,
        /// Expected value.
        value: FilterValue,
    },
    /// The column lies within `[from, to]`; a missing bound is open.
    Range {
        /// Column name.
        column: &'static str,
        /// Inclusive lower bound.
        from: Option<FilterValue>,
        /// Inclusive upper bound.
        to: Option<FilterValue>,
    },
}

/// A set of constraints for one entity's list operation.
pub trait Filter {
    /// Returns the criteria a record must all satisfy.
    fn criteria(&self) -> Vec<Criterion>;

    /// Returns true if the filter matches every record.
    fn is_empty(&self) -> bool {
        self.criteria().is_empty()
    }
}

/// Patient list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    /// Case-insensitive substring of the last name.
    pub last_name: Option<String>,
    /// Exact birth date.
    pub birth_date: Option<NaiveDate>,
}

impl Filter for PatientFilter {
    fn criteria(&self) -> Vec<Criterion> {
        let mut criteria = Vec::new();
        if let Some(last_name) = &self.last_name {
            criteria.push(Criterion::ContainsIgnoreCase {
                column: "last_name",
                value: last_name.clone(),
            });
        }
        if let Some(birth_date) = self.birth_date {
            criteria.push(Criterion::Equals {
                column: "birth_date",
                value: FilterValue::Date(birth_date),
            });
        }
        criteria
    }
}

/// Medication list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationFilter {
    /// Exact status.
    pub status: Option<MedicationStatus>,
}

impl Filter for MedicationFilter {
    fn criteria(&self) -> Vec<Criterion> {
        self.status
            .map(|status| Criterion::Equals {
                column: "status",
                value: FilterValue::Text(status.as_str().to_string()),
            })
            .into_iter()
            .collect()
    }
}

/// Prescription list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrescriptionFilter {
    /// Exact patient identity.
    pub patient: Option<i64>,
    /// Exact medication identity.
    pub medication: Option<i64>,
    /// Exact status.
    pub status: Option<PrescriptionStatus>,
    /// Inclusive lower bound on the start date.
    pub start_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the start date.
    pub start_date_to: Option<NaiveDate>,
    /// Inclusive lower bound on the end date.
    pub end_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the end date.
    pub end_date_to: Option<NaiveDate>,
}

impl Filter for PrescriptionFilter {
    fn criteria(&self) -> Vec<Criterion> {
        let mut criteria = Vec::new();
        if let Some(patient) = self.patient {
            criteria.push(Criterion::Equals {
                column: "patient_id",
                value: FilterValue::Integer(patient),
            });
        }
        if let Some(medication) = self.medication {
            criteria.push(Criterion::Equals {
                column: "medication_id",
                value: FilterValue::Integer(medication),
            });
        }
        if let Some(status) = self.status {
            criteria.push(Criterion::Equals {
                column: "status",
                value: FilterValue::Text(status.as_str().to_string()),
            });
        }
        criteria.extend(date_range(
            "start_date",
            self.start_date_from,
            self.start_date_to,
        ));
        criteria.extend(date_range("end_date", self.end_date_from, self.end_date_to));
        criteria
    }
}

fn date_range(
    column: &'static str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Option<Criterion> {
    if from.is_none() && to.is_none() {
        return None;
    }
    Some(Criterion::Range {
        column,
        from: from.map(FilterValue::Date),
        to: to.map(FilterValue::Date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_filters_are_empty() {
        assert!(PatientFilter::default().is_empty());
        assert!(MedicationFilter::default().is_empty());
        assert!(PrescriptionFilter::default().is_empty());
    }

    #[test]
    fn test_patient_filter_criteria() {
        let filter = PatientFilter {
            last_name: Some("mart".to_string()),
            birth_date: Some(date(1980, 5, 20)),
        };
        assert_eq!(
            filter.criteria(),
            vec![
                Criterion::ContainsIgnoreCase {
                    column: "last_name",
                    value: "mart".to_string(),
                },
                Criterion::Equals {
                    column: "birth_date",
                    value: FilterValue::Date(date(1980, 5, 20)),
                },
            ]
        );
    }

    #[test]
    fn test_medication_status_uses_wire_value() {
        let filter = MedicationFilter {
            status: Some(MedicationStatus::Retired),
        };
        assert_eq!(
            filter.criteria(),
            vec![Criterion::Equals {
                column: "status",
                value: FilterValue::Text("suppr".to_string()),
            }]
        );
    }

    #[test]
    fn test_one_sided_start_range() {
        let filter = PrescriptionFilter {
            start_date_to: Some(date(2025, 12, 31)),
            ..Default::default()
        };
        assert_eq!(
            filter.criteria(),
            vec![Criterion::Range {
                column: "start_date",
                from: None,
                to: Some(FilterValue::Date(date(2025, 12, 31))),
            }]
        );
    }

    #[test]
    fn test_prescription_filter_combines_all_constraints() {
        let filter = PrescriptionFilter {
            patient: Some(1),
            medication: Some(2),
            status: Some(PrescriptionStatus::Pending),
            start_date_from: Some(date(2025, 1, 1)),
            start_date_to: Some(date(2025, 6, 30)),
            end_date_from: Some(date(2025, 2, 1)),
            end_date_to: None,
        };
        let criteria = filter.criteria();
        assert_eq!(criteria.len(), 5);
        assert!(criteria.contains(&Criterion::Equals {
            column: "status",
            value: FilterValue::Text("en_attente".to_string()),
        }));
        assert!(criteria.contains(&Criterion::Range {
            column: "end_date",
            from: Some(FilterValue::Date(date(2025, 2, 1))),
            to: None,
        }));
    }
}
