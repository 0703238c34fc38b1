//! Persisted login credential.
//!
//! The bearer token issued at sign-in is kept under the fixed key
//! [`CREDENTIAL_KEY`] so a later run starts signed in. The token is opaque to
//! the storefront: it is stored and sent as-is, never inspected or logged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Key the token is stored under.
pub const CREDENTIAL_KEY: &str = "jwt";

/// Errors that can occur while reading or writing the credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Credential file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credential file is not valid JSON.
    #[error("Malformed credential file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage for the login token.
pub trait CredentialStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the backing storage cannot be read.
    fn load(&self) -> Result<Option<SecretString>, CredentialError>;

    /// Store the token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> Result<(), CredentialError>;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the backing storage cannot be written.
    fn clear(&self) -> Result<(), CredentialError>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// Credential store backed by a small JSON object on disk.
///
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| CredentialError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(map).map_err(|source| {
            CredentialError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, CredentialError> {
        let mut map = self.read_map()?;
        Ok(map.remove(CREDENTIAL_KEY).map(SecretString::from))
    }

    fn save(&self, token: &SecretString) -> Result<(), CredentialError> {
        let mut map = self.read_map()?;
        map.insert(
            CREDENTIAL_KEY.to_string(),
            token.expose_secret().to_string(),
        );
        self.write_map(&map)?;
        tracing::debug!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut map = self.read_map()?;
        if map.remove(CREDENTIAL_KEY).is_some() {
            self.write_map(&map)?;
            tracing::debug!(path = %self.path.display(), "Credential cleared");
        }
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, CredentialError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), CredentialError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/credentials.json"));

        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("token-123")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "token-123");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map.get("jwt").map(String::as_str), Some("token-123"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.save(&SecretString::from("abc")).unwrap();
        store.clear().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains("abc"));
    }

    #[test]
    fn test_file_store_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(CredentialError::Malformed { .. })
        ));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&SecretString::from("t")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "t");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
