//! Treatment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Drug;
use crate::withdrawal::{
    compute_withdrawal_end, format_timestamp, parse_timestamp, snapshot, WithdrawalResult,
    WithdrawalSnapshot,
};

/// A drug administration and the withdrawal window it opened.
///
/// The window (`treatment_date`, `withdrawal_end_date`) is fixed when the
/// treatment is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    /// Unique treatment ID
    pub id: String,
    /// Animal record ID
    pub animal_id: String,
    /// Drug ID
    pub drug_id: String,
    /// Veterinarian who administered the drug
    pub administered_by_id: String,
    /// Diagnosis text
    pub diagnosis: String,
    /// Dosage as written by the vet (e.g., "5ml intramuscular")
    pub dosage: String,
    /// Administration timestamp
    pub treatment_date: String,
    /// End of the milk withdrawal window
    pub withdrawal_end_date: String,
    /// Symptom report this treatment answers
    pub linked_report_id: Option<String>,
}

impl Treatment {
    /// Record an administration of `drug` at `at`, computing the window end.
    pub fn administer(
        animal_id: String,
        drug: &Drug,
        administered_by_id: String,
        diagnosis: String,
        dosage: String,
        at: DateTime<Utc>,
    ) -> Self {
        let end = compute_withdrawal_end(at, drug.milk_withdrawal_hours);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            animal_id,
            drug_id: drug.id.clone(),
            administered_by_id,
            diagnosis,
            dosage,
            treatment_date: format_timestamp(at),
            withdrawal_end_date: format_timestamp(end),
            linked_report_id: None,
        }
    }

    /// Parsed administration time.
    pub fn treatment_time(&self) -> WithdrawalResult<DateTime<Utc>> {
        parse_timestamp(&self.treatment_date)
    }

    /// Parsed window end.
    pub fn withdrawal_end(&self) -> WithdrawalResult<DateTime<Utc>> {
        parse_timestamp(&self.withdrawal_end_date)
    }

    /// Status and countdown at `now`.
    pub fn withdrawal_at(&self, now: DateTime<Utc>) -> WithdrawalResult<WithdrawalSnapshot> {
        Ok(snapshot(self.withdrawal_end()?, now))
    }

    /// Check the stored end against the drug's current interval.
    pub fn window_matches(&self, drug: &Drug) -> WithdrawalResult<bool> {
        let expected = compute_withdrawal_end(self.treatment_time()?, drug.milk_withdrawal_hours);
        Ok(expected == self.withdrawal_end()?)
    }

    /// Merge a partial update. The window is not patchable.
    pub fn apply(&mut self, patch: TreatmentPatch) {
        if let Some(diagnosis) = patch.diagnosis {
            self.diagnosis = diagnosis;
        }
        if let Some(dosage) = patch.dosage {
            self.dosage = dosage;
        }
    }
}

/// Amendable treatment fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TreatmentPatch {
    pub diagnosis: Option<String>,
    pub dosage: Option<String>,
}
