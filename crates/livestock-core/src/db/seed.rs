//! Demo records for a fresh store.

use super::{Database, DbResult};
use crate::models::{Animal, Drug, ReportStatus, Role, SymptomReport, Treatment, User};

impl Database {
    /// Load the demo farm into an empty store.
    ///
    /// Returns `false` without writing anything if users already exist.
    pub fn seed_demo(&self) -> DbResult<bool> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let tx = self.conn.unchecked_transaction()?;
        for user in demo_users() {
            self.insert_user(&user)?;
        }
        for animal in demo_animals() {
            self.insert_animal(&animal)?;
        }
        for drug in demo_drugs() {
            self.insert_drug(&drug)?;
        }
        for report in demo_reports() {
            self.insert_report(&report)?;
        }
        for treatment in demo_treatments() {
            self.insert_treatment(&treatment)?;
        }
        tx.commit()?;

        tracing::info!("Seeded demo records");
        Ok(true)
    }
}

fn user(id: &str, name: &str, email: &str, role: Role) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        password: "password".into(),
        role,
    }
}

fn demo_users() -> Vec<User> {
    vec![
        user("1", "John Manager", "manager@farm.com", Role::Manager),
        user("2", "Jane Staff", "staff@farm.com", Role::Staff),
        user("3", "Dr. Smith", "vet@farm.com", Role::Veterinarian),
        user("4", "Mike Farmer", "farmer@farm.com", Role::Staff),
    ]
}

#[allow(clippy::too_many_arguments)]
fn animal(
    id: &str,
    name: &str,
    tag: &str,
    species: &str,
    dob: &str,
    breed: &str,
    owner: &str,
    created: &str,
) -> Animal {
    Animal {
        id: id.into(),
        name: name.into(),
        animal_tag: tag.into(),
        species: species.into(),
        breed: breed.into(),
        date_of_birth: dob.into(),
        owner_id: owner.into(),
        created_at: created.into(),
    }
}

fn demo_animals() -> Vec<Animal> {
    vec![
        animal("1", "Bessie", "COW001", "Cattle", "2022-03-15", "Holstein", "4", "2024-01-15T10:00:00Z"),
        animal("2", "Thunder", "BULL002", "Cattle", "2021-08-22", "Angus", "4", "2024-01-20T14:30:00Z"),
        animal("3", "Porky", "PIG003", "Pig", "2023-01-10", "Yorkshire", "2", "2024-02-01T09:15:00Z"),
    ]
}

fn demo_drugs() -> Vec<Drug> {
    [
        ("1", "Penicillin", 72, 10),
        ("2", "Tylosin", 96, 14),
        ("3", "Oxytetracycline", 120, 21),
    ]
    .into_iter()
    .map(|(id, name, hours, days)| Drug {
        id: id.into(),
        name: name.into(),
        milk_withdrawal_hours: hours,
        meat_withdrawal_days: days,
    })
    .collect()
}

fn demo_reports() -> Vec<SymptomReport> {
    vec![
        SymptomReport {
            id: "1".into(),
            animal_id: "1".into(),
            reported_by_id: "2".into(),
            description: "Cow showing signs of mastitis - swollen udder, reduced milk production"
                .into(),
            created_at: "2024-09-10T08:30:00Z".into(),
            status: ReportStatus::Open,
            assigned_vet_id: None,
        },
        SymptomReport {
            id: "2".into(),
            animal_id: "2".into(),
            reported_by_id: "4".into(),
            description: "Bull appears lethargic, not eating well, possible respiratory issue"
                .into(),
            created_at: "2024-09-12T14:20:00Z".into(),
            status: ReportStatus::Treated,
            assigned_vet_id: Some("3".into()),
        },
    ]
}

fn demo_treatments() -> Vec<Treatment> {
    vec![Treatment {
        id: "1".into(),
        animal_id: "2".into(),
        drug_id: "2".into(),
        administered_by_id: "3".into(),
        diagnosis: "Respiratory infection".into(),
        dosage: "5ml intramuscular".into(),
        treatment_date: "2024-09-13T10:00:00Z".into(),
        withdrawal_end_date: "2024-09-17T10:00:00Z".into(),
        linked_report_id: Some("2".into()),
    }]
}
