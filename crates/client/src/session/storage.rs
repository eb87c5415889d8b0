//! Durable token storage.
//!
//! The equivalent of the browser's local storage: a small JSON file holding
//! the access and refresh tokens, absent when signed out. Behind a trait so
//! tests run against an in-memory implementation.

use devconnect_core::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Tokens persisted across process restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Durable key/value storage for session tokens.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<StoredTokens>, Error>;
    fn save(&self, tokens: &StoredTokens) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// File-backed storage at a configured path.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<StoredTokens>, Error> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Storage(e.to_string())),
        };
        let tokens = serde_json::from_slice(&bytes).map_err(|e| Error::Storage(e.to_string()))?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(tokens).map_err(|e| Error::Storage(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| Error::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(e.to_string())),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    inner: Mutex<Option<StoredTokens>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<StoredTokens>, Error> {
        Ok(self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), Error> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryTokenStorage::default();
        assert_eq!(storage.load().unwrap(), None);

        let tokens = StoredTokens { access_token: "at".into(), refresh_token: Some("rt".into()) };
        storage.save(&tokens).unwrap();
        assert_eq!(storage.load().unwrap(), Some(tokens));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("devconnect-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let storage = FileTokenStorage::new(dir.join("session.json"));

        assert_eq!(storage.load().unwrap(), None);

        let tokens = StoredTokens { access_token: "at".into(), refresh_token: None };
        storage.save(&tokens).unwrap();
        assert_eq!(storage.load().unwrap(), Some(tokens));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // clearing an already-empty store is not an error
        storage.clear().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
