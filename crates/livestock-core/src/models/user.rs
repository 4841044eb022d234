//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a user acts under. Drives every write permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Staff,
    Veterinarian,
}

impl Role {
    /// Stable string form, used for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::Staff => "Staff",
            Role::Veterinarian => "Veterinarian",
        }
    }

    /// Roles that may own animals (offered as owners on the animal form).
    pub fn can_own_animals(&self) -> bool {
        matches!(self, Role::Manager | Role::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "veterinarian" | "vet" => Ok(Role::Veterinarian),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A staff, manager or veterinarian account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email (unique)
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Role
    pub role: Role,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(name: String, email: String, password: String, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password,
            role,
        }
    }

    /// Plaintext credential check.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Merge a partial update into this user.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Partial update for a [`User`]. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}
