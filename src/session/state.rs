//! Shared Session State
//!
//! The in-memory half of the session, shared by the HTTP layer (which reads
//! the token and clears it on 401) and the session store.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::storage::{PersistedSession, SessionStorage, StorageError};
use super::SUPERUSER_TOKEN;
use crate::models::User;

/// Snapshot of the session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_superuser: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    fn persisted(&self) -> PersistedSession {
        PersistedSession {
            token: self.token.clone(),
            is_superuser: self.is_superuser,
        }
    }
}

/// Cloneable handle on the session state and its storage
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            storage,
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_superuser(&self) -> bool {
        self.state.read().await.is_superuser
    }

    /// Whether the session runs on the locally fabricated superuser token
    pub async fn is_fabricated(&self) -> bool {
        self.state.read().await.token.as_deref() == Some(SUPERUSER_TOKEN)
    }

    /// Load the persisted record into memory
    pub async fn restore(&self) -> Result<PersistedSession, StorageError> {
        let record = self.storage.load()?;
        let mut state = self.state.write().await;
        state.token = record.usable_token().map(str::to_string);
        state.is_superuser = record.is_superuser;
        state.user = None;
        Ok(record)
    }

    /// Write the current token and flag
    pub async fn save(&self) -> Result<(), StorageError> {
        let record = self.state.read().await.persisted();
        self.storage.save(&record)
    }

    pub async fn set_token(&self, token: Option<String>) -> Result<(), StorageError> {
        let record = {
            let mut state = self.state.write().await;
            state.token = token;
            state.persisted()
        };
        self.storage.save(&record)
    }

    /// Drop the token (memory and storage); the superuser flag survives
    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.set_token(None).await
    }

    pub async fn set_superuser(&self, enabled: bool) -> Result<(), StorageError> {
        let record = {
            let mut state = self.state.write().await;
            state.is_superuser = enabled;
            state.persisted()
        };
        self.storage.save(&record)
    }

    pub async fn set_user(&self, user: Option<User>) {
        self.state.write().await.user = user;
    }

    pub async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }

    pub async fn set_error(&self, error: Option<String>) {
        self.state.write().await.error = error;
    }

    /// Apply several in-memory changes under one lock
    pub(crate) async fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.write().await;
        f(&mut state)
    }

    /// Forget everything, in memory and on disk
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        {
            let mut state = self.state.write().await;
            state.token = None;
            state.user = None;
            state.is_superuser = false;
            state.error = None;
        }
        self.storage.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;

    #[tokio::test]
    async fn test_set_token_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let handle = SessionHandle::new(storage.clone());

        handle.set_token(Some("tok".into())).await.unwrap();
        assert_eq!(handle.token().await.as_deref(), Some("tok"));
        assert_eq!(storage.peek().unwrap().token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_clear_token_keeps_superuser_flag() {
        let storage = Arc::new(MemoryStorage::new());
        let handle = SessionHandle::new(storage.clone());
        handle.set_superuser(true).await.unwrap();
        handle.set_token(Some("tok".into())).await.unwrap();

        handle.clear_token().await.unwrap();

        let stored = storage.peek().unwrap();
        assert!(stored.token.is_none());
        assert!(stored.is_superuser);
        assert!(handle.is_superuser().await);
    }

    #[tokio::test]
    async fn test_restore_ignores_empty_token() {
        let storage = Arc::new(MemoryStorage::with_record(PersistedSession {
            token: Some(String::new()),
            is_superuser: false,
        }));
        let handle = SessionHandle::new(storage);
        handle.restore().await.unwrap();
        assert!(handle.token().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let storage = Arc::new(MemoryStorage::new());
        let handle = SessionHandle::new(storage.clone());
        handle.set_token(Some("tok".into())).await.unwrap();
        handle.set_superuser(true).await.unwrap();

        handle.clear_all().await.unwrap();

        let state = handle.snapshot().await;
        assert!(state.token.is_none());
        assert!(!state.is_superuser);
        assert!(storage.peek().is_none());
    }
}
