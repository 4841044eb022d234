//! Animal database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Animal, AnimalPatch, NewAnimal};

const ANIMAL_COLUMNS: &str =
    "id, name, animal_tag, species, breed, date_of_birth, owner_id, created_at";

impl Database {
    /// Insert an animal record as-is.
    pub fn insert_animal(&self, animal: &Animal) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO animals (
                id, name, animal_tag, species, breed, date_of_birth, owner_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                animal.id,
                animal.name,
                animal.animal_tag,
                animal.species,
                animal.breed,
                animal.date_of_birth,
                animal.owner_id,
                animal.created_at,
            ],
        )?;
        Ok(())
    }

    /// Create an animal with a generated ID and creation timestamp.
    pub fn create_animal(&self, new: NewAnimal) -> DbResult<Animal> {
        let animal = new.into_animal();
        self.insert_animal(&animal)?;
        Ok(animal)
    }

    /// Get an animal by record ID.
    pub fn get_animal(&self, id: &str) -> DbResult<Option<Animal>> {
        let sql = format!("SELECT {} FROM animals WHERE id = ?", ANIMAL_COLUMNS);
        self.conn
            .query_row(&sql, [id], read_animal)
            .optional()
            .map_err(Into::into)
    }

    /// List all animals in insertion order.
    pub fn list_animals(&self) -> DbResult<Vec<Animal>> {
        let sql = format!("SELECT {} FROM animals ORDER BY rowid", ANIMAL_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_animal)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List animals owned by a user.
    pub fn animals_owned_by(&self, owner_id: &str) -> DbResult<Vec<Animal>> {
        let sql = format!(
            "SELECT {} FROM animals WHERE owner_id = ? ORDER BY rowid",
            ANIMAL_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([owner_id], read_animal)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Merge a patch into a stored animal.
    pub fn update_animal(&self, id: &str, patch: AnimalPatch) -> DbResult<Option<Animal>> {
        let Some(mut animal) = self.get_animal(id)? else {
            return Ok(None);
        };
        animal.apply(patch);

        self.conn.execute(
            r#"
            UPDATE animals SET
                name = ?2,
                animal_tag = ?3,
                species = ?4,
                breed = ?5,
                date_of_birth = ?6,
                owner_id = ?7
            WHERE id = ?1
            "#,
            params![
                animal.id,
                animal.name,
                animal.animal_tag,
                animal.species,
                animal.breed,
                animal.date_of_birth,
                animal.owner_id,
            ],
        )?;
        Ok(Some(animal))
    }

    /// Delete an animal, returning the removed record.
    pub fn delete_animal(&self, id: &str) -> DbResult<Option<Animal>> {
        let Some(animal) = self.get_animal(id)? else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM animals WHERE id = ?", [id])?;
        Ok(Some(animal))
    }
}

fn read_animal(row: &Row<'_>) -> rusqlite::Result<Animal> {
    Ok(Animal {
        id: row.get(0)?,
        name: row.get(1)?,
        animal_tag: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        date_of_birth: row.get(5)?,
        owner_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}
