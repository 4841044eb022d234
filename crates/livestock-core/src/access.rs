//! Role permissions.

use crate::models::Role;

/// Guarded operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Add or edit an animal
    EditAnimals,
    /// Remove an animal
    DeleteAnimals,
    /// Add, edit or remove drugs
    ManageDrugs,
    /// View and administer user accounts
    ManageUsers,
    /// File a symptom report
    FileReports,
    /// Record or amend a treatment
    RecordTreatments,
}

impl Permission {
    /// Roles holding this permission.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Permission::EditAnimals | Permission::FileReports => &[Role::Manager, Role::Staff],
            Permission::DeleteAnimals | Permission::ManageDrugs | Permission::ManageUsers => {
                &[Role::Manager]
            }
            Permission::RecordTreatments => &[Role::Veterinarian],
        }
    }

    /// Message shown when a role lacks the permission.
    pub fn denial_message(&self) -> &'static str {
        match self {
            Permission::EditAnimals => "Only managers and staff can add or edit animals.",
            Permission::DeleteAnimals => "Only managers can delete animals.",
            Permission::ManageDrugs => "Only managers can manage drugs.",
            Permission::ManageUsers => "Only managers can manage users.",
            Permission::FileReports => "Only managers and staff can file symptom reports.",
            Permission::RecordTreatments => "Only veterinarians can create treatments.",
        }
    }
}

/// Whether `role` holds `permission`.
pub fn is_permitted(role: Role, permission: Permission) -> bool {
    permission.allowed_roles().contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_permissions() {
        assert!(is_permitted(Role::Manager, Permission::DeleteAnimals));
        assert!(is_permitted(Role::Manager, Permission::ManageDrugs));
        assert!(is_permitted(Role::Manager, Permission::ManageUsers));
        assert!(is_permitted(Role::Manager, Permission::EditAnimals));
        assert!(!is_permitted(Role::Manager, Permission::RecordTreatments));
    }

    #[test]
    fn test_staff_permissions() {
        assert!(is_permitted(Role::Staff, Permission::EditAnimals));
        assert!(is_permitted(Role::Staff, Permission::FileReports));
        assert!(!is_permitted(Role::Staff, Permission::DeleteAnimals));
        assert!(!is_permitted(Role::Staff, Permission::ManageDrugs));
    }

    #[test]
    fn test_vet_permissions() {
        assert!(is_permitted(Role::Veterinarian, Permission::RecordTreatments));
        assert!(!is_permitted(Role::Veterinarian, Permission::EditAnimals));
        assert!(!is_permitted(Role::Veterinarian, Permission::FileReports));
    }
}
