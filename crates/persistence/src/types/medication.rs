//! Medication records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InvalidChoice;

/// Availability of a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MedicationStatus {
    /// Can be prescribed.
    #[default]
    #[serde(rename = "actif")]
    Active,
    /// Withdrawn from use.
    #[serde(rename = "suppr")]
    Retired,
}

impl MedicationStatus {
    /// Every status, in declaration order.
    pub const ALL: [MedicationStatus; 2] = [MedicationStatus::Active, MedicationStatus::Retired];

    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "actif",
            MedicationStatus::Retired => "suppr",
        }
    }
}

impl fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MedicationStatus {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actif" => Ok(MedicationStatus::Active),
            "suppr" => Ok(MedicationStatus::Retired),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

/// A stored medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Store-assigned identity.
    pub id: i64,
    /// Unique medication code (e.g. "PARA500").
    pub code: String,
    /// Human readable label.
    pub label: String,
    /// Availability.
    pub status: MedicationStatus,
}

/// A medication that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedication {
    /// Unique medication code.
    pub code: String,
    /// Human readable label.
    pub label: String,
    /// Availability, active unless stated otherwise.
    #[serde(default)]
    pub status: MedicationStatus,
}

impl NewMedication {
    /// Creates a medication with the given status.
    pub fn new(code: impl Into<String>, label: impl Into<String>, status: MedicationStatus) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            status,
        }
    }
}
