//! File-backed session storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use livestock_core::SessionStorage;

/// Session entries kept in a JSON file between invocations.
///
/// Changes stay in memory until [`FileStorage::save`].
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Read the file at `path`; a missing file is an empty storage.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Unreadable session file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Write entries back, deleting the file when nothing is left.
    pub fn save(&self) -> anyhow::Result<()> {
        if self.entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e)
                    .with_context(|| format!("Failed to remove {}", self.path.display())),
                _ => Ok(()),
            };
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl SessionStorage for FileStorage {
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

#[cfg(test)]
mod tests {
    use super::*;
    use livestock_core::session::{TOKEN_KEY, USER_KEY};
    use livestock_core::{Database, SessionManager};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::load(&dir.path().join("none.json")).unwrap();
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_session_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let db = Database::open_in_memory().unwrap();
        db.seed_demo().unwrap();

        let mut session = SessionManager::new(FileStorage::load(&path).unwrap());
        assert!(session.login(&db, "vet@farm.com", "password").unwrap());
        session.storage().save().unwrap();

        let mut resumed = SessionManager::new(FileStorage::load(&path).unwrap());
        let user = resumed.restore(&db).unwrap().unwrap();
        assert_eq!(user.name, "Dr. Smith");
    }

    #[test]
    fn test_empty_storage_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = FileStorage::load(&path).unwrap();
        storage.set(USER_KEY, "{}".into());
        storage.save().unwrap();
        assert!(path.exists());

        storage.remove(USER_KEY);
        storage.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileStorage::load(&path).is_err());
    }
}
