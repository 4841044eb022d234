//! Livestock Records Core Library
//!
//! Local record keeping for a livestock farm: animals, drugs, symptom
//! reports and treatments, with drug-withdrawal tracking.
//!
//! # Withdrawal
//!
//! ```text
//! Symptom report (OPEN)
//!        │
//!        ▼
//! Vet records treatment ──► withdrawal_end = treatment_date + milk hours
//!        │                          │
//!        ▼                          ▼
//! Report → TREATED          status derived from "now":
//!                              now >  end → Clear
//!                              now <= end → In Withdrawal (ceil days left)
//! ```
//!
//! # Core Principle
//!
//! **Withdrawal status is never stored.** Only the window is recorded; status
//! and countdown are recomputed against the clock on every read.
//!
//! # Modules
//!
//! - [`db`]: SQLite record store
//! - [`models`]: Domain types (User, Animal, Drug, SymptomReport, Treatment)
//! - [`withdrawal`]: Window arithmetic and status classification
//! - [`recommend`]: Diagnosis keyword → drug suggestion
//! - [`access`]: Role permissions
//! - [`service`]: Role-gated commands
//! - [`session`]: Login session persistence
//! - [`board`]: Status board, alerts and dashboard
//! - [`search`]: List filters

pub mod access;
pub mod board;
pub mod db;
pub mod models;
pub mod recommend;
pub mod search;
pub mod service;
pub mod session;
pub mod withdrawal;

// Re-export commonly used types
pub use board::{AnimalStatus, BoardConfig, Dashboard, WithdrawalAlerts};
pub use db::Database;
pub use models::{
    Animal, Drug, NewAnimal, ReportStatus, Role, SymptomReport, Treatment, User,
};
pub use recommend::{recommend_drug, Recommender};
pub use search::StatusFilter;
pub use service::{RecordsService, TreatmentRequest};
pub use session::{MemoryStorage, SessionManager, SessionStorage};
pub use withdrawal::{
    classify_status, compute_withdrawal_end, days_remaining, WithdrawalSnapshot, WithdrawalStatus,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::Utc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LivestockError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for LivestockError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => LivestockError::NotFound(what),
            other => LivestockError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LivestockError {
    fn from(e: serde_json::Error) -> Self {
        LivestockError::SerializationError(e.to_string())
    }
}

impl From<withdrawal::WithdrawalError> for LivestockError {
    fn from(e: withdrawal::WithdrawalError) -> Self {
        LivestockError::InvalidInput(e.to_string())
    }
}

impl From<service::ServiceError> for LivestockError {
    fn from(e: service::ServiceError) -> Self {
        use service::ServiceError;
        match e {
            ServiceError::AccessDenied(msg) => LivestockError::AccessDenied(msg),
            ServiceError::Validation(msg) => LivestockError::InvalidInput(msg),
            ServiceError::NotFound(what) => LivestockError::NotFound(what),
            ServiceError::Database(e) => e.into(),
            ServiceError::Withdrawal(e) => e.into(),
        }
    }
}

impl From<board::BoardError> for LivestockError {
    fn from(e: board::BoardError) -> Self {
        match e {
            board::BoardError::Database(e) => e.into(),
            board::BoardError::Withdrawal(e) => e.into(),
            other => LivestockError::InvalidInput(other.to_string()),
        }
    }
}

impl From<recommend::RecommendError> for LivestockError {
    fn from(e: recommend::RecommendError) -> Self {
        match e {
            recommend::RecommendError::Database(e) => e.into(),
            other => LivestockError::InvalidInput(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for LivestockError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LivestockError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a record store at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<LivestockCore>, LivestockError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(LivestockCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory record store.
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<LivestockCore>, LivestockError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(LivestockCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Window end for a treatment given as an ISO-8601 timestamp.
#[uniffi::export]
pub fn calculate_withdrawal_end(
    treatment_date: String,
    withdrawal_hours: u32,
) -> Result<String, LivestockError> {
    Ok(withdrawal::withdrawal_end_for(&treatment_date, withdrawal_hours)?)
}

/// Suggested drug name for a diagnosis.
#[uniffi::export]
pub fn suggest_drug(diagnosis: String) -> String {
    recommend_drug(&diagnosis)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe record store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct LivestockCore {
    db: Arc<Mutex<Database>>,
}

fn load_actor(db: &Database, actor_id: &str) -> Result<User, LivestockError> {
    db.get_user(actor_id)?
        .ok_or_else(|| LivestockError::NotFound(format!("user {}", actor_id)))
}

#[uniffi::export]
impl LivestockCore {
    /// Load the demo farm if the store is empty.
    pub fn seed_demo(&self) -> Result<bool, LivestockError> {
        let db = self.db.lock()?;
        Ok(db.seed_demo()?)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Check credentials. `None` for an unknown email or wrong password.
    pub fn authenticate(
        &self,
        email: String,
        password: String,
    ) -> Result<Option<FfiUser>, LivestockError> {
        let db = self.db.lock()?;
        let user = db
            .get_user_by_email(&email)?
            .filter(|u| u.password_matches(&password));
        Ok(user.map(|u| u.into()))
    }

    /// Users matching `term`. Managers only.
    pub fn search_users(
        &self,
        actor_id: String,
        term: String,
    ) -> Result<Vec<FfiUser>, LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        RecordsService::new(&db, &actor).users()?;
        let users = db.search_users(&term)?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Create an account. Managers only.
    pub fn create_user(
        &self,
        actor_id: String,
        name: String,
        email: String,
        password: String,
        role: String,
    ) -> Result<FfiUser, LivestockError> {
        let role: Role = role.parse().map_err(LivestockError::InvalidInput)?;
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        let user =
            RecordsService::new(&db, &actor).create_user(&name, &email, &password, role)?;
        Ok(user.into())
    }

    /// Delete an account. Managers only, never oneself.
    pub fn delete_user(&self, actor_id: String, user_id: String) -> Result<(), LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        RecordsService::new(&db, &actor).delete_user(&user_id)?;
        Ok(())
    }

    // =========================================================================
    // Animals
    // =========================================================================

    pub fn get_animal(&self, animal_id: String) -> Result<Option<FfiAnimal>, LivestockError> {
        let db = self.db.lock()?;
        Ok(db.get_animal(&animal_id)?.map(|a| a.into()))
    }

    /// Animals matching `term` by species, breed or owner name.
    pub fn search_animals(&self, term: String) -> Result<Vec<FfiAnimal>, LivestockError> {
        let db = self.db.lock()?;
        let animals = db.search_animals(&term)?;
        Ok(animals.into_iter().map(|a| a.into()).collect())
    }

    pub fn register_animal(
        &self,
        actor_id: String,
        animal: FfiNewAnimal,
    ) -> Result<FfiAnimal, LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        let animal = RecordsService::new(&db, &actor).register_animal(animal.into())?;
        Ok(animal.into())
    }

    pub fn delete_animal(&self, actor_id: String, animal_id: String) -> Result<(), LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        RecordsService::new(&db, &actor).delete_animal(&animal_id)?;
        Ok(())
    }

    // =========================================================================
    // Drugs
    // =========================================================================

    pub fn search_drugs(&self, term: String) -> Result<Vec<FfiDrug>, LivestockError> {
        let db = self.db.lock()?;
        let drugs = db.search_drugs(&term)?;
        Ok(drugs.into_iter().map(|d| d.into()).collect())
    }

    pub fn add_drug(
        &self,
        actor_id: String,
        name: String,
        milk_withdrawal_hours: u32,
        meat_withdrawal_days: u32,
    ) -> Result<FfiDrug, LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        let drug = RecordsService::new(&db, &actor).add_drug(
            &name,
            milk_withdrawal_hours,
            meat_withdrawal_days,
        )?;
        Ok(drug.into())
    }

    /// Catalog drug suggested for a diagnosis, if stocked.
    pub fn recommend_for_diagnosis(
        &self,
        diagnosis: String,
    ) -> Result<Option<FfiDrug>, LivestockError> {
        let db = self.db.lock()?;
        let drug = db.recommend_for_diagnosis(&Recommender::default(), &diagnosis)?;
        Ok(drug.map(|d| d.into()))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Reports matching `term`; `status` is ALL, OPEN or TREATED.
    pub fn search_reports(
        &self,
        term: String,
        status: String,
    ) -> Result<Vec<FfiSymptomReport>, LivestockError> {
        let filter: StatusFilter = status.parse().map_err(LivestockError::InvalidInput)?;
        let db = self.db.lock()?;
        let reports = db.search_reports(&term, filter)?;
        Ok(reports.into_iter().map(|r| r.into()).collect())
    }

    pub fn file_report(
        &self,
        actor_id: String,
        animal_id: String,
        description: String,
    ) -> Result<FfiSymptomReport, LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        let report = RecordsService::new(&db, &actor).file_report(&animal_id, &description)?;
        Ok(report.into())
    }

    // =========================================================================
    // Treatments
    // =========================================================================

    pub fn search_treatments(&self, term: String) -> Result<Vec<FfiTreatment>, LivestockError> {
        let db = self.db.lock()?;
        let treatments = db.search_treatments(&term)?;
        Ok(treatments.into_iter().map(|t| t.into()).collect())
    }

    /// Record a treatment administered now. Veterinarians only.
    pub fn record_treatment(
        &self,
        actor_id: String,
        animal_id: String,
        drug_id: String,
        diagnosis: String,
        dosage: String,
        linked_report_id: Option<String>,
    ) -> Result<FfiTreatment, LivestockError> {
        let db = self.db.lock()?;
        let actor = load_actor(&db, &actor_id)?;
        let request = TreatmentRequest {
            animal_id,
            drug_id,
            diagnosis,
            dosage,
            linked_report_id,
        };
        let treatment = RecordsService::new(&db, &actor).record_treatment(request, Utc::now())?;
        Ok(treatment.into())
    }

    // =========================================================================
    // Status Board
    // =========================================================================

    /// Current withdrawal status of an animal.
    pub fn animal_status(&self, animal_id: String) -> Result<FfiAnimalStatus, LivestockError> {
        let db = self.db.lock()?;
        let status = db.animal_status(&animal_id, Utc::now())?;
        Ok(status.into())
    }

    /// Treatments still in withdrawal, and those about to clear.
    pub fn withdrawal_alerts(&self) -> Result<FfiWithdrawalAlerts, LivestockError> {
        let db = self.db.lock()?;
        let alerts = db.withdrawal_alerts(Utc::now(), &BoardConfig::default())?;
        Ok(alerts.into())
    }

    /// Full dashboard as JSON.
    pub fn dashboard_json(&self) -> Result<String, LivestockError> {
        let db = self.db.lock()?;
        let dashboard = db.dashboard(Utc::now(), &BoardConfig::default())?;
        Ok(serde_json::to_string(&dashboard)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe user. The password never crosses the boundary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for FfiUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

/// FFI-safe animal.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimal {
    pub id: String,
    pub name: String,
    pub animal_tag: String,
    pub species: String,
    pub breed: String,
    pub date_of_birth: String,
    pub owner_id: String,
    pub created_at: String,
}

impl From<Animal> for FfiAnimal {
    fn from(animal: Animal) -> Self {
        Self {
            id: animal.id,
            name: animal.name,
            animal_tag: animal.animal_tag,
            species: animal.species,
            breed: animal.breed,
            date_of_birth: animal.date_of_birth,
            owner_id: animal.owner_id,
            created_at: animal.created_at,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewAnimal {
    pub name: String,
    pub animal_tag: String,
    pub species: String,
    pub breed: String,
    pub date_of_birth: String,
    pub owner_id: String,
}

impl From<FfiNewAnimal> for NewAnimal {
    fn from(animal: FfiNewAnimal) -> Self {
        NewAnimal {
            name: animal.name,
            animal_tag: animal.animal_tag,
            species: animal.species,
            breed: animal.breed,
            date_of_birth: animal.date_of_birth,
            owner_id: animal.owner_id,
        }
    }
}

/// FFI-safe drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub id: String,
    pub name: String,
    pub milk_withdrawal_hours: u32,
    pub meat_withdrawal_days: u32,
}

impl From<Drug> for FfiDrug {
    fn from(drug: Drug) -> Self {
        Self {
            id: drug.id,
            name: drug.name,
            milk_withdrawal_hours: drug.milk_withdrawal_hours,
            meat_withdrawal_days: drug.meat_withdrawal_days,
        }
    }
}

/// FFI-safe symptom report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomReport {
    pub id: String,
    pub animal_id: String,
    pub reported_by_id: String,
    pub description: String,
    pub created_at: String,
    pub status: String,
    pub assigned_vet_id: Option<String>,
}

impl From<SymptomReport> for FfiSymptomReport {
    fn from(report: SymptomReport) -> Self {
        Self {
            id: report.id,
            animal_id: report.animal_id,
            reported_by_id: report.reported_by_id,
            description: report.description,
            created_at: report.created_at,
            status: report.status.as_str().to_string(),
            assigned_vet_id: report.assigned_vet_id,
        }
    }
}

/// FFI-safe treatment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatment {
    pub id: String,
    pub animal_id: String,
    pub drug_id: String,
    pub administered_by_id: String,
    pub diagnosis: String,
    pub dosage: String,
    pub treatment_date: String,
    pub withdrawal_end_date: String,
    pub linked_report_id: Option<String>,
}

impl From<Treatment> for FfiTreatment {
    fn from(t: Treatment) -> Self {
        Self {
            id: t.id,
            animal_id: t.animal_id,
            drug_id: t.drug_id,
            administered_by_id: t.administered_by_id,
            diagnosis: t.diagnosis,
            dosage: t.dosage,
            treatment_date: t.treatment_date,
            withdrawal_end_date: t.withdrawal_end_date,
            linked_report_id: t.linked_report_id,
        }
    }
}

/// FFI-safe animal status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnimalStatus {
    pub animal_id: String,
    /// "Clear" or "In Withdrawal"
    pub status: String,
    /// Display countdown, never negative
    pub days_left: i64,
    pub latest_treatment_id: Option<String>,
}

impl From<AnimalStatus> for FfiAnimalStatus {
    fn from(status: AnimalStatus) -> Self {
        Self {
            days_left: status.days_left(),
            animal_id: status.animal_id,
            status: status.status.label().to_string(),
            latest_treatment_id: status.latest_treatment_id,
        }
    }
}

/// A treatment with its current countdown.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentStatus {
    pub treatment: FfiTreatment,
    pub status: String,
    pub days_left: i64,
}

impl From<board::TreatmentStatus> for FfiTreatmentStatus {
    fn from(entry: board::TreatmentStatus) -> Self {
        Self {
            status: entry.withdrawal.status.label().to_string(),
            days_left: entry.withdrawal.days_left(),
            treatment: entry.treatment.into(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWithdrawalAlerts {
    pub in_withdrawal: Vec<FfiTreatmentStatus>,
    pub expiring_soon: Vec<FfiTreatmentStatus>,
}

impl From<WithdrawalAlerts> for FfiWithdrawalAlerts {
    fn from(alerts: WithdrawalAlerts) -> Self {
        Self {
            in_withdrawal: alerts.in_withdrawal.into_iter().map(|e| e.into()).collect(),
            expiring_soon: alerts.expiring_soon.into_iter().map(|e| e.into()).collect(),
        }
    }
}
