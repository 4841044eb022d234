//! Drug database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Drug, DrugPatch};

impl Database {
    /// Insert a drug record as-is.
    pub fn insert_drug(&self, drug: &Drug) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO drugs (id, name, milk_withdrawal_hours, meat_withdrawal_days)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                drug.id,
                drug.name,
                drug.milk_withdrawal_hours,
                drug.meat_withdrawal_days,
            ],
        )?;
        Ok(())
    }

    /// Create a drug with a generated ID.
    pub fn create_drug(
        &self,
        name: String,
        milk_withdrawal_hours: u32,
        meat_withdrawal_days: u32,
    ) -> DbResult<Drug> {
        let drug = Drug::new(name, milk_withdrawal_hours, meat_withdrawal_days);
        self.insert_drug(&drug)?;
        Ok(drug)
    }

    /// Get a drug by ID.
    pub fn get_drug(&self, id: &str) -> DbResult<Option<Drug>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, milk_withdrawal_hours, meat_withdrawal_days
                FROM drugs
                WHERE id = ?
                "#,
                [id],
                read_drug,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find the first drug with exactly this name.
    pub fn find_drug_by_name(&self, name: &str) -> DbResult<Option<Drug>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, milk_withdrawal_hours, meat_withdrawal_days
                FROM drugs
                WHERE name = ?
                ORDER BY rowid
                LIMIT 1
                "#,
                [name],
                read_drug,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all drugs in insertion order.
    pub fn list_drugs(&self) -> DbResult<Vec<Drug>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, milk_withdrawal_hours, meat_withdrawal_days
            FROM drugs
            ORDER BY rowid
            "#,
        )?;
        let rows = stmt.query_map([], read_drug)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Merge a patch into a stored drug.
    ///
    /// Existing treatments keep the window computed when they were recorded.
    pub fn update_drug(&self, id: &str, patch: DrugPatch) -> DbResult<Option<Drug>> {
        let Some(mut drug) = self.get_drug(id)? else {
            return Ok(None);
        };
        drug.apply(patch);

        self.conn.execute(
            r#"
            UPDATE drugs SET
                name = ?2,
                milk_withdrawal_hours = ?3,
                meat_withdrawal_days = ?4
            WHERE id = ?1
            "#,
            params![
                drug.id,
                drug.name,
                drug.milk_withdrawal_hours,
                drug.meat_withdrawal_days,
            ],
        )?;
        Ok(Some(drug))
    }

    /// Delete a drug, returning the removed record.
    pub fn delete_drug(&self, id: &str) -> DbResult<Option<Drug>> {
        let Some(drug) = self.get_drug(id)? else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM drugs WHERE id = ?", [id])?;
        Ok(Some(drug))
    }
}

fn read_drug(row: &Row<'_>) -> rusqlite::Result<Drug> {
    Ok(Drug {
        id: row.get(0)?,
        name: row.get(1)?,
        milk_withdrawal_hours: row.get(2)?,
        meat_withdrawal_days: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_find() {
        let db = setup_db();
        let drug = db.create_drug("Penicillin".into(), 72, 10).unwrap();

        assert_eq!(db.get_drug(&drug.id).unwrap().unwrap(), drug);
        assert_eq!(db.find_drug_by_name("Penicillin").unwrap().unwrap().id, drug.id);
        assert!(db.find_drug_by_name("penicillin").unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete() {
        let db = setup_db();
        let drug = db.create_drug("Tylosin".into(), 96, 14).unwrap();

        let updated = db
            .update_drug(
                &drug.id,
                DrugPatch {
                    meat_withdrawal_days: Some(21),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.meat_withdrawal_days, 21);
        assert_eq!(updated.milk_withdrawal_hours, 96);

        let removed = db.delete_drug(&drug.id).unwrap().unwrap();
        assert_eq!(removed.meat_withdrawal_days, 21);
        assert!(db.list_drugs().unwrap().is_empty());
        assert!(db.update_drug(&drug.id, DrugPatch::default()).unwrap().is_none());
    }
}
