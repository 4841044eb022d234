//! Symptom report database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ReportPatch, ReportStatus, SymptomReport};

const REPORT_COLUMNS: &str =
    "id, animal_id, reported_by_id, description, created_at, status, assigned_vet_id";

impl Database {
    /// Insert a report record as-is.
    pub fn insert_report(&self, report: &SymptomReport) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO symptom_reports (
                id, animal_id, reported_by_id, description, created_at, status, assigned_vet_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                report.id,
                report.animal_id,
                report.reported_by_id,
                report.description,
                report.created_at,
                report.status.as_str(),
                report.assigned_vet_id,
            ],
        )?;
        Ok(())
    }

    /// Create an open report with a generated ID and creation timestamp.
    pub fn create_report(
        &self,
        animal_id: String,
        reported_by_id: String,
        description: String,
    ) -> DbResult<SymptomReport> {
        let report = SymptomReport::new(animal_id, reported_by_id, description);
        self.insert_report(&report)?;
        Ok(report)
    }

    /// Get a report by ID.
    pub fn get_report(&self, id: &str) -> DbResult<Option<SymptomReport>> {
        let sql = format!("SELECT {} FROM symptom_reports WHERE id = ?", REPORT_COLUMNS);
        let row = self.conn.query_row(&sql, [id], read_report_row).optional()?;
        row.map(SymptomReport::try_from).transpose()
    }

    /// List all reports in insertion order.
    pub fn list_reports(&self) -> DbResult<Vec<SymptomReport>> {
        let sql = format!("SELECT {} FROM symptom_reports ORDER BY rowid", REPORT_COLUMNS);
        self.query_reports(&sql, [])
    }

    /// Reports filed against one animal.
    pub fn reports_for_animal(&self, animal_id: &str) -> DbResult<Vec<SymptomReport>> {
        let sql = format!(
            "SELECT {} FROM symptom_reports WHERE animal_id = ? ORDER BY rowid",
            REPORT_COLUMNS
        );
        self.query_reports(&sql, [animal_id])
    }

    /// Reports in a given status.
    pub fn reports_with_status(&self, status: ReportStatus) -> DbResult<Vec<SymptomReport>> {
        let sql = format!(
            "SELECT {} FROM symptom_reports WHERE status = ? ORDER BY rowid",
            REPORT_COLUMNS
        );
        self.query_reports(&sql, [status.as_str()])
    }

    /// Merge a patch into a stored report.
    pub fn update_report(&self, id: &str, patch: ReportPatch) -> DbResult<Option<SymptomReport>> {
        let Some(mut report) = self.get_report(id)? else {
            return Ok(None);
        };
        report.apply(patch);

        self.conn.execute(
            r#"
            UPDATE symptom_reports SET
                description = ?2,
                status = ?3,
                assigned_vet_id = ?4
            WHERE id = ?1
            "#,
            params![
                report.id,
                report.description,
                report.status.as_str(),
                report.assigned_vet_id,
            ],
        )?;
        Ok(Some(report))
    }

    /// Delete a report, returning the removed record.
    pub fn delete_report(&self, id: &str) -> DbResult<Option<SymptomReport>> {
        let Some(report) = self.get_report(id)? else {
            return Ok(None);
        };
        self.conn
            .execute("DELETE FROM symptom_reports WHERE id = ?", [id])?;
        Ok(Some(report))
    }

    fn query_reports<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> DbResult<Vec<SymptomReport>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_report_row)?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(row?.try_into()?);
        }
        Ok(reports)
    }
}

/// Intermediate row struct for database mapping.
struct ReportRow {
    id: String,
    animal_id: String,
    reported_by_id: String,
    description: String,
    created_at: String,
    status: String,
    assigned_vet_id: Option<String>,
}

fn read_report_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        animal_id: row.get(1)?,
        reported_by_id: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        status: row.get(5)?,
        assigned_vet_id: row.get(6)?,
    })
}

impl TryFrom<ReportRow> for SymptomReport {
    type Error = DbError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(SymptomReport {
            id: row.id,
            animal_id: row.animal_id,
            reported_by_id: row.reported_by_id,
            description: row.description,
            created_at: row.created_at,
            status: row.status.parse().map_err(DbError::Constraint)?,
            assigned_vet_id: row.assigned_vet_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();
        let report = db
            .create_report("1".into(), "2".into(), "Swollen udder".into())
            .unwrap();

        let retrieved = db.get_report(&report.id).unwrap().unwrap();
        assert_eq!(retrieved, report);
        assert_eq!(retrieved.status, ReportStatus::Open);
    }

    #[test]
    fn test_status_filters() {
        let db = setup_db();
        let first = db
            .create_report("1".into(), "2".into(), "Mastitis".into())
            .unwrap();
        db.create_report("2".into(), "4".into(), "Lethargic".into())
            .unwrap();

        db.update_report(
            &first.id,
            ReportPatch {
                status: Some(ReportStatus::Treated),
                assigned_vet_id: Some(Some("3".into())),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(db.reports_with_status(ReportStatus::Open).unwrap().len(), 1);
        let treated = db.reports_with_status(ReportStatus::Treated).unwrap();
        assert_eq!(treated.len(), 1);
        assert_eq!(treated[0].assigned_vet_id, Some("3".into()));
        assert_eq!(db.reports_for_animal("1").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_report() {
        let db = setup_db();
        let report = db
            .create_report("1".into(), "2".into(), "Cough".into())
            .unwrap();
        assert!(db.delete_report(&report.id).unwrap().is_some());
        assert!(db.get_report(&report.id).unwrap().is_none());
        assert!(db.list_reports().unwrap().is_empty());
    }
}
