//! Role-gated commands over the record store.
//!
//! [`RecordsService`] pairs a store with the acting user. Every write checks
//! the actor's role and validates its input before touching the store.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::access::{is_permitted, Permission};
use crate::db::{Database, DbError};
use crate::models::{
    Animal, AnimalPatch, Drug, DrugPatch, NewAnimal, Role, SymptomReport, Treatment,
    TreatmentPatch, User, UserPatch,
};
use crate::withdrawal::WithdrawalError;

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Withdrawal error: {0}")]
    Withdrawal(#[from] WithdrawalError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Input for [`RecordsService::record_treatment`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreatmentRequest {
    pub animal_id: String,
    pub drug_id: String,
    pub diagnosis: String,
    pub dosage: String,
    /// Symptom report this treatment answers
    pub linked_report_id: Option<String>,
}

/// Commands executed on behalf of one user.
pub struct RecordsService<'a> {
    db: &'a Database,
    actor: &'a User,
}

impl<'a> RecordsService<'a> {
    pub fn new(db: &'a Database, actor: &'a User) -> Self {
        Self { db, actor }
    }

    pub fn actor(&self) -> &User {
        self.actor
    }

    fn authorize(&self, permission: Permission) -> ServiceResult<()> {
        if is_permitted(self.actor.role, permission) {
            return Ok(());
        }
        tracing::warn!(
            user = %self.actor.id,
            role = %self.actor.role,
            ?permission,
            "Command denied"
        );
        Err(ServiceError::AccessDenied(permission.denial_message().into()))
    }

    // =========================================================================
    // Animals
    // =========================================================================

    /// Register a new animal.
    pub fn register_animal(&self, new: NewAnimal) -> ServiceResult<Animal> {
        self.authorize(Permission::EditAnimals)?;
        require("name", &new.name)?;
        require("animal ID", &new.animal_tag)?;
        require("species", &new.species)?;
        self.require_owner(&new.owner_id)?;

        let animal = self.db.create_animal(new)?;
        tracing::info!(animal = %animal.id, tag = %animal.animal_tag, "Animal registered");
        Ok(animal)
    }

    /// Edit an animal.
    pub fn update_animal(&self, id: &str, patch: AnimalPatch) -> ServiceResult<Animal> {
        self.authorize(Permission::EditAnimals)?;
        if let Some(name) = &patch.name {
            require("name", name)?;
        }
        if let Some(tag) = &patch.animal_tag {
            require("animal ID", tag)?;
        }
        if let Some(species) = &patch.species {
            require("species", species)?;
        }
        if let Some(owner_id) = &patch.owner_id {
            self.require_owner(owner_id)?;
        }
        let animal = self
            .db
            .update_animal(id, patch)?
            .ok_or_else(|| not_found("animal", id))?;
        tracing::info!(animal = %animal.id, "Animal updated");
        Ok(animal)
    }

    /// Remove an animal. Its treatments and reports are kept.
    pub fn delete_animal(&self, id: &str) -> ServiceResult<Animal> {
        self.authorize(Permission::DeleteAnimals)?;
        let animal = self
            .db
            .delete_animal(id)?
            .ok_or_else(|| not_found("animal", id))?;
        tracing::info!(animal = %animal.id, "Animal deleted");
        Ok(animal)
    }

    fn require_owner(&self, owner_id: &str) -> ServiceResult<()> {
        require("owner", owner_id)?;
        let owner = self
            .db
            .get_user(owner_id)?
            .ok_or_else(|| not_found("owner", owner_id))?;
        if !owner.role.can_own_animals() {
            return Err(ServiceError::Validation(format!(
                "{} cannot own animals",
                owner.role
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Drugs
    // =========================================================================

    /// Add a drug to the catalog.
    pub fn add_drug(
        &self,
        name: &str,
        milk_withdrawal_hours: u32,
        meat_withdrawal_days: u32,
    ) -> ServiceResult<Drug> {
        self.authorize(Permission::ManageDrugs)?;
        require("drug name", name)?;
        let drug = self.db.create_drug(
            name.trim().to_string(),
            milk_withdrawal_hours,
            meat_withdrawal_days,
        )?;
        tracing::info!(drug = %drug.id, name = %drug.name, "Drug added");
        Ok(drug)
    }

    /// Edit a drug. Already-recorded treatments keep their windows.
    pub fn update_drug(&self, id: &str, patch: DrugPatch) -> ServiceResult<Drug> {
        self.authorize(Permission::ManageDrugs)?;
        if let Some(name) = &patch.name {
            require("drug name", name)?;
        }
        let drug = self
            .db
            .update_drug(id, patch)?
            .ok_or_else(|| not_found("drug", id))?;
        tracing::info!(drug = %drug.id, "Drug updated");
        Ok(drug)
    }

    /// Remove a drug.
    pub fn delete_drug(&self, id: &str) -> ServiceResult<Drug> {
        self.authorize(Permission::ManageDrugs)?;
        let drug = self
            .db
            .delete_drug(id)?
            .ok_or_else(|| not_found("drug", id))?;
        tracing::info!(drug = %drug.id, "Drug deleted");
        Ok(drug)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// All accounts, for administration.
    pub fn users(&self) -> ServiceResult<Vec<User>> {
        self.authorize(Permission::ManageUsers)?;
        Ok(self.db.list_users()?)
    }

    /// Create an account.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ServiceResult<User> {
        self.authorize(Permission::ManageUsers)?;
        require("name", name)?;
        require("email", email)?;
        if password.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Password is required for new users".into(),
            ));
        }
        if self.db.get_user_by_email(email)?.is_some() {
            return Err(ServiceError::Validation(format!(
                "Email {} is already registered",
                email
            )));
        }

        let user = self
            .db
            .create_user(name.into(), email.into(), password.into(), role)?;
        tracing::info!(user = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Edit an account. A blank password leaves the current one in place.
    pub fn update_user(&self, id: &str, mut patch: UserPatch) -> ServiceResult<User> {
        self.authorize(Permission::ManageUsers)?;
        if let Some(name) = &patch.name {
            require("name", name)?;
        }
        if let Some(email) = &patch.email {
            require("email", email)?;
            if let Some(other) = self.db.get_user_by_email(email)? {
                if other.id != id {
                    return Err(ServiceError::Validation(format!(
                        "Email {} is already registered",
                        email
                    )));
                }
            }
        }
        if patch.password.as_deref().is_some_and(|p| p.trim().is_empty()) {
            patch.password = None;
        }

        let user = self
            .db
            .update_user(id, patch)?
            .ok_or_else(|| not_found("user", id))?;
        tracing::info!(user = %user.id, "User updated");
        Ok(user)
    }

    /// Remove an account. Users cannot remove themselves.
    pub fn delete_user(&self, id: &str) -> ServiceResult<User> {
        self.authorize(Permission::ManageUsers)?;
        if id == self.actor.id {
            return Err(ServiceError::AccessDenied(
                "You cannot delete your own account.".into(),
            ));
        }
        let user = self
            .db
            .delete_user(id)?
            .ok_or_else(|| not_found("user", id))?;
        tracing::info!(user = %user.id, "User deleted");
        Ok(user)
    }

    // =========================================================================
    // Reports and treatments
    // =========================================================================

    /// File an open symptom report as the acting user.
    pub fn file_report(&self, animal_id: &str, description: &str) -> ServiceResult<SymptomReport> {
        self.authorize(Permission::FileReports)?;
        require("animal", animal_id)?;
        require("description", description)?;
        self.db
            .get_animal(animal_id)?
            .ok_or_else(|| not_found("animal", animal_id))?;

        let report = self.db.create_report(
            animal_id.into(),
            self.actor.id.clone(),
            description.into(),
        )?;
        tracing::info!(report = %report.id, animal = %animal_id, "Symptom report filed");
        Ok(report)
    }

    /// Record a treatment administered now by the acting veterinarian.
    ///
    /// When the request links a report, the insert and the report's move to
    /// TREATED commit together or not at all.
    pub fn record_treatment(
        &self,
        request: TreatmentRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<Treatment> {
        self.authorize(Permission::RecordTreatments)?;
        require("animal", &request.animal_id)?;
        require("drug", &request.drug_id)?;
        require("diagnosis", &request.diagnosis)?;
        require("dosage", &request.dosage)?;

        self.db
            .get_animal(&request.animal_id)?
            .ok_or_else(|| not_found("animal", &request.animal_id))?;
        let drug = self
            .db
            .get_drug(&request.drug_id)?
            .ok_or_else(|| not_found("drug", &request.drug_id))?;

        let mut treatment = Treatment::administer(
            request.animal_id,
            &drug,
            self.actor.id.clone(),
            request.diagnosis,
            request.dosage,
            now,
        );
        treatment.linked_report_id = request
            .linked_report_id
            .filter(|id| !id.trim().is_empty());

        match self.db.insert_treatment_closing_report(&treatment) {
            Ok(()) => {}
            Err(DbError::NotFound(what)) => return Err(ServiceError::NotFound(what)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            treatment = %treatment.id,
            animal = %treatment.animal_id,
            drug = %drug.name,
            withdrawal_end = %treatment.withdrawal_end_date,
            "Treatment recorded"
        );
        Ok(treatment)
    }

    /// Amend diagnosis or dosage of a treatment.
    pub fn amend_treatment(&self, id: &str, patch: TreatmentPatch) -> ServiceResult<Treatment> {
        self.authorize(Permission::RecordTreatments)?;
        if let Some(diagnosis) = &patch.diagnosis {
            require("diagnosis", diagnosis)?;
        }
        if let Some(dosage) = &patch.dosage {
            require("dosage", dosage)?;
        }
        let treatment = self
            .db
            .update_treatment(id, patch)?
            .ok_or_else(|| not_found("treatment", id))?;
        tracing::info!(treatment = %treatment.id, "Treatment amended");
        Ok(treatment)
    }
}

fn require(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn not_found(kind: &str, id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{} {}", kind, id))
}
