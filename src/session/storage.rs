//! Session Persistence
//!
//! Exactly one record survives restarts: the auth token and the superuser
//! flag. The user profile is never written.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// The persisted session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl PersistedSession {
    /// A stored token that could authenticate a request
    pub fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Load/save boundary for the session record
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<PersistedSession, StorageError>;
    fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON file on disk
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<PersistedSession, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = ?self.path, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process storage, for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    record: Mutex<Option<PersistedSession>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: PersistedSession) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    /// What is currently stored, if anything
    pub fn peek(&self) -> Option<PersistedSession> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<PersistedSession, StorageError> {
        Ok(self.peek().unwrap_or_default())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
