//! Login sessions.
//!
//! A session is two entries in a key-value store: an opaque token and a JSON
//! snapshot of the signed-in user. Passwords are compared in plaintext.

use std::collections::HashMap;

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Role, User};

/// Storage key for the session token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key for the serialized user.
pub const USER_KEY: &str = "user_data";

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Key-value storage that outlives a session manager.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Process-local [`SessionStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Encode a user ID as a session token.
pub fn issue_token(user_id: &str) -> String {
    hex::encode(user_id.as_bytes())
}

/// Recover the user ID from a token, if it is well-formed.
pub fn token_user_id(token: &str) -> Option<String> {
    let bytes = hex::decode(token).ok()?;
    String::from_utf8(bytes).ok()
}

/// Tracks the signed-in user.
pub struct SessionManager<S: SessionStorage> {
    storage: S,
    current: Option<User>,
}

impl<S: SessionStorage> SessionManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Sign in with email and password. `false` on unknown email or wrong
    /// password.
    pub fn login(&mut self, db: &Database, email: &str, password: &str) -> SessionResult<bool> {
        match db.get_user_by_email(email)? {
            Some(user) if user.password_matches(password) => {
                self.start(user)?;
                Ok(true)
            }
            _ => {
                tracing::warn!(email, "Login rejected");
                Ok(false)
            }
        }
    }

    /// Create an account and sign in. `false` if the email is taken.
    pub fn register(
        &mut self,
        db: &Database,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> SessionResult<bool> {
        if db.get_user_by_email(email)?.is_some() {
            return Ok(false);
        }
        let user = db.create_user(name.into(), email.into(), password.into(), role)?;
        tracing::info!(user = %user.id, role = %user.role, "User registered");
        self.start(user)?;
        Ok(true)
    }

    /// Sign out and clear stored session data.
    pub fn logout(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.current = None;
    }

    /// Resume a stored session.
    ///
    /// The stored user is re-read from the store; a user that no longer
    /// exists leaves the session empty. Unreadable user data clears storage.
    pub fn restore(&mut self, db: &Database) -> SessionResult<Option<&User>> {
        let (Some(_token), Some(user_data)) =
            (self.storage.get(TOKEN_KEY), self.storage.get(USER_KEY))
        else {
            return Ok(None);
        };

        let stored: User = match serde_json::from_str(&user_data) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                self.storage.remove(TOKEN_KEY);
                self.storage.remove(USER_KEY);
                return Ok(None);
            }
        };

        self.current = db.get_user(&stored.id)?;
        Ok(self.current.as_ref())
    }

    fn start(&mut self, user: User) -> SessionResult<()> {
        self.storage.set(TOKEN_KEY, issue_token(&user.id));
        self.storage.set(USER_KEY, serde_json::to_string(&user)?);
        tracing::debug!(user = %user.id, "Session started");
        self.current = Some(user);
        Ok(())
    }
}
