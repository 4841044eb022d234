//! Animal records.

use serde::{Deserialize, Serialize};

use crate::withdrawal::format_timestamp;

/// A single animal in the herd.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    /// Unique record ID
    pub id: String,
    /// Animal name
    pub name: String,
    /// External ear-tag identifier (e.g., "COW001")
    pub animal_tag: String,
    /// Species (e.g., "Cattle", "Pig")
    pub species: String,
    /// Breed
    pub breed: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: String,
    /// Owning user ID
    pub owner_id: String,
    /// Creation timestamp
    pub created_at: String,
}

/// Fields supplied when registering an animal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAnimal {
    pub name: String,
    pub animal_tag: String,
    pub species: String,
    pub breed: String,
    pub date_of_birth: String,
    pub owner_id: String,
}

impl NewAnimal {
    /// Assign an ID and creation timestamp.
    pub fn into_animal(self) -> Animal {
        Animal {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            animal_tag: self.animal_tag,
            species: self.species,
            breed: self.breed,
            date_of_birth: self.date_of_birth,
            owner_id: self.owner_id,
            created_at: format_timestamp(chrono::Utc::now()),
        }
    }
}

/// Partial update for an [`Animal`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimalPatch {
    pub name: Option<String>,
    pub animal_tag: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub date_of_birth: Option<String>,
    pub owner_id: Option<String>,
}

impl Animal {
    /// Merge a partial update. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: AnimalPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.animal_tag {
            self.animal_tag = v;
        }
        if let Some(v) = patch.species {
            self.species = v;
        }
        if let Some(v) = patch.breed {
            self.breed = v;
        }
        if let Some(v) = patch.date_of_birth {
            self.date_of_birth = v;
        }
        if let Some(v) = patch.owner_id {
            self.owner_id = v;
        }
    }
}
