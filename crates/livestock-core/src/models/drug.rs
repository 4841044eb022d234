//! Drug catalog models.

use serde::{Deserialize, Serialize};

/// A drug with its withdrawal intervals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// Unique drug ID
    pub id: String,
    /// Drug name (e.g., "Penicillin")
    pub name: String,
    /// Hours after administration before milk may be used
    pub milk_withdrawal_hours: u32,
    /// Days after administration before meat may be used
    pub meat_withdrawal_days: u32,
}

impl Drug {
    /// Create a new drug with a generated ID.
    pub fn new(name: String, milk_withdrawal_hours: u32, meat_withdrawal_days: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            milk_withdrawal_hours,
            meat_withdrawal_days,
        }
    }

    /// Merge a partial update.
    pub fn apply(&mut self, patch: DrugPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(hours) = patch.milk_withdrawal_hours {
            self.milk_withdrawal_hours = hours;
        }
        if let Some(days) = patch.meat_withdrawal_days {
            self.meat_withdrawal_days = days;
        }
    }
}

/// Partial update for a [`Drug`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugPatch {
    pub name: Option<String>,
    pub milk_withdrawal_hours: Option<u32>,
    pub meat_withdrawal_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch() {
        let mut drug = Drug::new("Tylosin".into(), 96, 14);
        drug.apply(DrugPatch {
            milk_withdrawal_hours: Some(72),
            ..Default::default()
        });
        assert_eq!(drug.milk_withdrawal_hours, 72);
        assert_eq!(drug.meat_withdrawal_days, 14);
        assert_eq!(drug.name, "Tylosin");
    }
}
