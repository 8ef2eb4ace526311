//! JSON representations of stored records.
//!
//! Patients and medications serialize as stored. Prescriptions expose their
//! references by id and add the read-only `patient_full_name`.

use chrono::{DateTime, NaiveDate, Utc};
use medrec_persistence::types::{Prescription, PrescriptionStatus};
use serde::Serialize;

/// Prescription as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrescriptionRepresentation {
    /// Record identity.
    pub id: i64,
    /// Prescribed patient id.
    pub patient: i64,
    /// Prescribed medication id.
    pub medication: i64,
    /// First day of treatment.
    pub start_date: NaiveDate,
    /// Last day of treatment.
    pub end_date: NaiveDate,
    /// Status wire value.
    pub status: PrescriptionStatus,
    /// Free text, possibly empty.
    pub comment: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last modification instant.
    pub updated_at: DateTime<Utc>,
    /// `"{first_name} {last_name}"` of the patient.
    pub patient_full_name: String,
}

impl From<Prescription> for PrescriptionRepresentation {
    fn from(p: Prescription) -> Self {
        let patient_full_name = p.patient_name.full_name();
        Self {
            id: p.id,
            patient: p.patient_id,
            medication: p.medication_id,
            start_date: p.start_date,
            end_date: p.end_date,
            status: p.status,
            comment: p.comment,
            created_at: p.created_at,
            updated_at: p.updated_at,
            patient_full_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrec_persistence::types::PersonName;

    #[test]
    fn test_prescription_wire_shape() {
        let now = Utc::now();
        let prescription = Prescription {
            id: 4,
            patient_id: 1,
            medication_id: 2,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            status: PrescriptionStatus::Validated,
            comment: String::new(),
            created_at: now,
            updated_at: now,
            patient_name: PersonName {
                first_name: "Jeanne".to_string(),
                last_name: "Martin".to_string(),
            },
        };

        let json = serde_json::to_value(PrescriptionRepresentation::from(prescription)).unwrap();
        assert_eq!(json["patient"], 1);
        assert_eq!(json["medication"], 2);
        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["status"], "valide");
        assert_eq!(json["comment"], "");
        assert_eq!(json["patient_full_name"], "Jeanne Martin");
        assert!(json.get("patient_name").is_none());
    }
}
