//! Treatment database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ReportStatus, Treatment, TreatmentPatch};

const TREATMENT_COLUMNS: &str = "id, animal_id, drug_id, administered_by_id, diagnosis, dosage, \
     treatment_date, withdrawal_end_date, linked_report_id";

impl Database {
    /// Insert a treatment record as-is. Does not touch any linked report.
    pub fn insert_treatment(&self, treatment: &Treatment) -> DbResult<()> {
        insert_treatment_on(&self.conn, treatment)
    }

    /// Insert a treatment and mark its linked report treated, atomically.
    ///
    /// If the linked report does not exist nothing is written.
    pub fn insert_treatment_closing_report(&self, treatment: &Treatment) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_treatment_on(&tx, treatment)?;

        if let Some(report_id) = &treatment.linked_report_id {
            let rows_affected = tx.execute(
                "UPDATE symptom_reports SET status = ?2 WHERE id = ?1",
                params![report_id, ReportStatus::Treated.as_str()],
            )?;
            if rows_affected == 0 {
                // dropping `tx` rolls back the insert
                return Err(DbError::NotFound(format!("symptom report {}", report_id)));
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Get a treatment by ID.
    pub fn get_treatment(&self, id: &str) -> DbResult<Option<Treatment>> {
        let sql = format!("SELECT {} FROM treatments WHERE id = ?", TREATMENT_COLUMNS);
        self.conn
            .query_row(&sql, [id], read_treatment)
            .optional()
            .map_err(Into::into)
    }

    /// List all treatments in insertion order.
    pub fn list_treatments(&self) -> DbResult<Vec<Treatment>> {
        let sql = format!("SELECT {} FROM treatments ORDER BY rowid", TREATMENT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_treatment)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Treatments given to one animal, in insertion order.
    pub fn treatments_for_animal(&self, animal_id: &str) -> DbResult<Vec<Treatment>> {
        let sql = format!(
            "SELECT {} FROM treatments WHERE animal_id = ? ORDER BY rowid",
            TREATMENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([animal_id], read_treatment)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Amend diagnosis or dosage. The withdrawal window cannot be changed.
    pub fn update_treatment(&self, id: &str, patch: TreatmentPatch) -> DbResult<Option<Treatment>> {
        let Some(mut treatment) = self.get_treatment(id)? else {
            return Ok(None);
        };
        treatment.apply(patch);

        self.conn.execute(
            "UPDATE treatments SET diagnosis = ?2, dosage = ?3 WHERE id = ?1",
            params![treatment.id, treatment.diagnosis, treatment.dosage],
        )?;
        Ok(Some(treatment))
    }

    /// Delete a treatment, returning the removed record.
    pub fn delete_treatment(&self, id: &str) -> DbResult<Option<Treatment>> {
        let Some(treatment) = self.get_treatment(id)? else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM treatments WHERE id = ?", [id])?;
        Ok(Some(treatment))
    }
}

fn insert_treatment_on(conn: &Connection, treatment: &Treatment) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO treatments (
            id, animal_id, drug_id, administered_by_id, diagnosis, dosage,
            treatment_date, withdrawal_end_date, linked_report_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            treatment.id,
            treatment.animal_id,
            treatment.drug_id,
            treatment.administered_by_id,
            treatment.diagnosis,
            treatment.dosage,
            treatment.treatment_date,
            treatment.withdrawal_end_date,
            treatment.linked_report_id,
        ],
    )?;
    Ok(())
}

fn read_treatment(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        id: row.get(0)?,
        animal_id: row.get(1)?,
        drug_id: row.get(2)?,
        administered_by_id: row.get(3)?,
        diagnosis: row.get(4)?,
        dosage: row.get(5)?,
        treatment_date: row.get(6)?,
        withdrawal_end_date: row.get(7)?,
        linked_report_id: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Drug;
    use crate::withdrawal::parse_timestamp;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_treatment(animal_id: &str, at: &str) -> Treatment {
        let drug = Drug {
            id: "2".into(),
            name: "Tylosin".into(),
            milk_withdrawal_hours: 96,
            meat_withdrawal_days: 14,
        };
        Treatment::administer(
            animal_id.into(),
            &drug,
            "3".into(),
            "Respiratory infection".into(),
            "5ml intramuscular".into(),
            parse_timestamp(at).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let treatment = make_treatment("2", "2024-09-13T10:00:00Z");
        db.insert_treatment(&treatment).unwrap();

        let retrieved = db.get_treatment(&treatment.id).unwrap().unwrap();
        assert_eq!(retrieved, treatment);
        assert_eq!(db.treatments_for_animal("2").unwrap().len(), 1);
        assert!(db.treatments_for_animal("1").unwrap().is_empty());
    }

    #[test]
    fn test_closing_report_marks_treated() {
        let db = setup_db();
        let report = db
            .create_report("2".into(), "4".into(), "Coughing".into())
            .unwrap();

        let mut treatment = make_treatment("2", "2024-09-13T10:00:00Z");
        treatment.linked_report_id = Some(report.id.clone());
        db.insert_treatment_closing_report(&treatment).unwrap();

        let report = db.get_report(&report.id).unwrap().unwrap();
        assert_eq!(report.status, ReportStatus::Treated);
        assert!(db.get_treatment(&treatment.id).unwrap().is_some());
    }

    #[test]
    fn test_missing_report_rolls_back_insert() {
        let db = setup_db();
        let mut treatment = make_treatment("2", "2024-09-13T10:00:00Z");
        treatment.linked_report_id = Some("no-such-report".into());

        let result = db.insert_treatment_closing_report(&treatment);
        assert!(matches!(result, Err(DbError::NotFound(_))));
        assert!(db.get_treatment(&treatment.id).unwrap().is_none());
    }

    #[test]
    fn test_update_amends_dosage_only() {
        let db = setup_db();
        let treatment = make_treatment("2", "2024-09-13T10:00:00Z");
        db.insert_treatment(&treatment).unwrap();

        let updated = db
            .update_treatment(
                &treatment.id,
                TreatmentPatch {
                    dosage: Some("10ml intramuscular".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.dosage, "10ml intramuscular");
        assert_eq!(updated.withdrawal_end_date, treatment.withdrawal_end_date);
    }

    #[test]
    fn test_delete_treatment() {
        let db = setup_db();
        let treatment = make_treatment("2", "2024-09-13T10:00:00Z");
        db.insert_treatment(&treatment).unwrap();

        assert_eq!(
            db.delete_treatment(&treatment.id).unwrap().unwrap().id,
            treatment.id
        );
        assert!(db.list_treatments().unwrap().is_empty());
    }
}
