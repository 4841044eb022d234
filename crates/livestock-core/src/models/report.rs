//! Symptom reports filed by staff.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::withdrawal::format_timestamp;

/// Report lifecycle. Reports start `Open` and become `Treated` once a
/// treatment links to them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Open,
    Treated,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "OPEN",
            ReportStatus::Treated => "TREATED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OPEN" => Ok(ReportStatus::Open),
            "TREATED" => Ok(ReportStatus::Treated),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

/// An observation of ill health, preceding a veterinary treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomReport {
    /// Unique report ID
    pub id: String,
    /// Animal record ID
    pub animal_id: String,
    /// Reporting user ID
    pub reported_by_id: String,
    /// Free-text description of symptoms
    pub description: String,
    /// Creation timestamp
    pub created_at: String,
    /// Lifecycle status
    pub status: ReportStatus,
    /// Veterinarian assigned to the case
    pub assigned_vet_id: Option<String>,
}

impl SymptomReport {
    /// Create a new open report.
    pub fn new(animal_id: String, reported_by_id: String, description: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            animal_id,
            reported_by_id,
            description,
            created_at: format_timestamp(chrono::Utc::now()),
            status: ReportStatus::Open,
            assigned_vet_id: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ReportStatus::Open
    }

    /// Merge a partial update.
    pub fn apply(&mut self, patch: ReportPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(vet) = patch.assigned_vet_id {
            self.assigned_vet_id = vet;
        }
    }
}

/// Partial update for a [`SymptomReport`].
///
/// `assigned_vet_id` is doubly optional: `Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportPatch {
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub assigned_vet_id: Option<Option<String>>,
}
