//! Prescription records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{InvalidChoice, PersonName};

/// Workflow status of a prescription.
///
/// `Retired` is an ordinary value; it does not delete anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrescriptionStatus {
    /// Checked and in force.
    #[serde(rename = "valide")]
    Validated,
    /// Awaiting validation.
    #[serde(rename = "en_attente")]
    Pending,
    /// Withdrawn.
    #[serde(rename = "suppr")]
    Retired,
}

impl PrescriptionStatus {
    /// Every status, in declaration order.
    pub const ALL: [PrescriptionStatus; 3] = [
        PrescriptionStatus::Validated,
        PrescriptionStatus::Pending,
        PrescriptionStatus::Retired,
    ];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Validated => "valide",
            PrescriptionStatus::Pending => "en_attente",
            PrescriptionStatus::Retired => "suppr",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valide" => Ok(PrescriptionStatus::Validated),
            "en_attente" => Ok(PrescriptionStatus::Pending),
            "suppr" => Ok(PrescriptionStatus::Retired),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

/// A stored prescription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prescription {
    /// Store-assigned identity.
    pub id: i64,
    /// The prescribed patient. Deleting the patient deletes the prescription.
    pub patient_id: i64,
    /// The prescribed medication. A referenced medication cannot be deleted.
    pub medication_id: i64,
    /// First day of the treatment.
    pub start_date: NaiveDate,
    /// Last day of the treatment, never before `start_date`.
    pub end_date: NaiveDate,
    /// Workflow status.
    pub status: PrescriptionStatus,
    /// Free text, possibly empty.
    pub comment: String,
    /// Set once when the row is inserted.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_at: DateTime<Utc>,
    /// Name of the referenced patient, read together with the row.
    pub patient_name: PersonName,
}

impl Prescription {
    /// Returns the writable fields of this prescription.
    pub fn to_new(&self) -> NewPrescription {
        NewPrescription {
            patient_id: self.patient_id,
            medication_id: self.medication_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            comment: self.comment.clone(),
        }
    }
}

/// A prescription that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrescription {
    /// The prescribed patient.
    pub patient_id: i64,
    /// The prescribed medication.
    pub medication_id: i64,
    /// First day of the treatment.
    pub start_date: NaiveDate,
    /// Last day of the treatment.
    pub end_date: NaiveDate,
    /// Workflow status.
    pub status: PrescriptionStatus,
    /// Free text, possibly empty.
    pub comment: String,
}

/// A partial update of a prescription.
///
/// `None` leaves the stored value untouched. A full update is a patch with
/// every field set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct PrescriptionPatch {
    pub patient_id: Option<i64>,
    pub medication_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<PrescriptionStatus>,
    pub comment: Option<String>,
}

impl PrescriptionPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &PrescriptionPatch::default()
    }

    /// Converts a patch that sets every required field into a new record.
    ///
    /// A missing comment becomes empty. Returns `None` if a required field is
    /// unset.
    pub fn into_new(self) -> Option<NewPrescription> {
        Some(NewPrescription {
            patient_id: self.patient_id?,
            medication_id: self.medication_id?,
            start_date: self.start_date?,
            end_date: self.end_date?,
            status: self.status?,
            comment: self.comment.unwrap_or_default(),
        })
    }

    /// Applies the patch to the writable fields of a stored prescription and
    /// returns the resulting candidate record.
    pub fn apply_to(&self, current: &Prescription) -> NewPrescription {
        NewPrescription {
            patient_id: self.patient_id.unwrap_or(current.patient_id),
            medication_id: self.medication_id.unwrap_or(current.medication_id),
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date: self.end_date.unwrap_or(current.end_date),
            status: self.status.unwrap_or(current.status),
            comment: self
                .comment
                .clone()
                .unwrap_or_else(|| current.comment.clone()),
        }
    }
}

impl From<NewPrescription> for PrescriptionPatch {
    fn from(record: NewPrescription) -> Self {
        Self {
            patient_id: Some(record.patient_id),
            medication_id: Some(record.medication_id),
            start_date: Some(record.start_date),
            end_date: Some(record.end_date),
            status: Some(record.status),
            comment: Some(record.comment),
        }
    }
}
