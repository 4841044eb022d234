//! User database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Role, User, UserPatch};

const USER_COLUMNS: &str = "id, name, email, password, role";

impl Database {
    /// Insert a user record as-is.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, name, email, password, role) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.name,
                user.email,
                user.password,
                user.role.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Create a user with a generated ID.
    pub fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> DbResult<User> {
        let user = User::new(name, email, password, role);
        self.insert_user(&user)?;
        Ok(user)
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = self.conn.query_row(&sql, [id], read_user_row).optional()?;
        row.map(User::try_from).transpose()
    }

    /// Get a user by login email (exact match).
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let row = self.conn.query_row(&sql, [email], read_user_row).optional()?;
        row.map(User::try_from).transpose()
    }

    /// List all users in insertion order.
    pub fn list_users(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY rowid", USER_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_user_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// Merge a patch into a stored user. `None` if the user does not exist.
    pub fn update_user(&self, id: &str, patch: UserPatch) -> DbResult<Option<User>> {
        let Some(mut user) = self.get_user(id)? else {
            return Ok(None);
        };
        user.apply(patch);

        self.conn.execute(
            "UPDATE users SET name = ?2, email = ?3, password = ?4, role = ?5 WHERE id = ?1",
            params![
                user.id,
                user.name,
                user.email,
                user.password,
                user.role.as_str(),
            ],
        )?;
        Ok(Some(user))
    }

    /// Delete a user, returning the removed record.
    pub fn delete_user(&self, id: &str) -> DbResult<Option<User>> {
        let Some(user) = self.get_user(id)? else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM users WHERE id = ?", [id])?;
        Ok(Some(user))
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

fn read_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        role: row.get(4)?,
    })
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role: row.role.parse().map_err(DbError::Constraint)?,
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
        let user = db
            .create_user(
                "Dr. Smith".into(),
                "vet@farm.com".into(),
                "password".into(),
                Role::Veterinarian,
            )
            .unwrap();

        let retrieved = db.get_user(&user.id).unwrap().unwrap();
        assert_eq!(retrieved, user);

        let by_email = db.get_user_by_email("vet@farm.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(db.get_user_by_email("VET@farm.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = setup_db();
        db.create_user("A".into(), "a@farm.com".into(), "p".into(), Role::Staff)
            .unwrap();
        let result = db.create_user("B".into(), "a@farm.com".into(), "p".into(), Role::Staff);
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_update_merges_patch() {
        let db = setup_db();
        let user = db
            .create_user("Jane".into(), "jane@farm.com".into(), "old".into(), Role::Staff)
            .unwrap();

        let updated = db
            .update_user(
                &user.id,
                UserPatch {
                    name: Some("Jane Doe".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.password, "old");

        let stored = db.get_user(&user.id).unwrap().unwrap();
        assert_eq!(stored.name, "Jane Doe");

        assert!(db
            .update_user("missing", UserPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_returns_removed() {
        let db = setup_db();
        let user = db
            .create_user("Mike".into(), "mike@farm.com".into(), "p".into(), Role::Staff)
            .unwrap();

        let removed = db.delete_user(&user.id).unwrap().unwrap();
        assert_eq!(removed.id, user.id);
        assert!(db.get_user(&user.id).unwrap().is_none());
        assert!(db.delete_user(&user.id).unwrap().is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let db = setup_db();
        for name in ["Zed", "Amy", "Bob"] {
            db.create_user(
                name.into(),
                format!("{}@farm.com", name.to_lowercase()),
                "p".into(),
                Role::Staff,
            )
            .unwrap();
        }
        let names: Vec<_> = db.list_users().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Bob"]);
    }
}
