//! Token persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use agora_types::AccessToken;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filename for the persisted session.
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Where the credential survives between runs.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<AccessToken>, SessionStoreError>;

    fn set(&self, token: &AccessToken) -> Result<(), SessionStoreError>;

    /// Remove the credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Process-lifetime store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<AccessToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self { token: Mutex::new(Some(token)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<AccessToken>, SessionStoreError> {
        Ok(self.token.lock().clone())
    }

    fn set(&self, token: &AccessToken) -> Result<(), SessionStoreError> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.token.lock().take();
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: AccessToken,
}

/// JSON file in the data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/session.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<AccessToken>, SessionStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = serde_json::from_str(&content)?;
        Ok(Some(stored.token))
    }

    fn set(&self, token: &AccessToken) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&StoredSession { token: token.clone() })?;

        // Atomic write
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_dir(tmp.path());

        assert_eq!(store.get().unwrap(), None);
        store.set(&AccessToken::new("abc")).unwrap();
        assert_eq!(store.get().unwrap(), Some(AccessToken::new("abc")));

        // A second store over the same directory sees the token, as after a restart.
        let reopened = FileSessionStore::in_dir(tmp.path());
        assert_eq!(reopened.get().unwrap(), Some(AccessToken::new("abc")));

        store.clear().unwrap();
        assert_eq!(reopened.get().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::in_dir(tmp.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.get(), Err(SessionStoreError::Corrupt(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::with_token(AccessToken::new("t"));
        assert!(store.get().unwrap().is_some());
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
