//! Session Store
//!
//! Auth operations on top of the shared session state. Every operation
//! toggles `is_loading` around its work and records a user-facing `error`
//! when it fails.

use thiserror::Error;

use super::state::{SessionHandle, SessionState};
use super::storage::StorageError;
use super::{superuser_profile, SUPERUSER_TOKEN};
use crate::api::{ApiClient, ApiError};
use crate::models::{Registration, User};

#[derive(Error, Debug)]
pub enum SessionError {
    /// A backend call failed; `message` is what the user sees
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Superuser mode is disabled in this build's configuration")]
    SuperuserDisabled,

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    fn api(source: ApiError, fallback: &str) -> Self {
        SessionError::Api {
            message: source.user_message(fallback),
            source,
        }
    }
}

/// Auth and session operations
#[derive(Clone)]
pub struct SessionStore {
    session: SessionHandle,
    api: ApiClient,
    allow_superuser: bool,
}

impl SessionStore {
    pub fn new(session: SessionHandle, api: ApiClient, allow_superuser: bool) -> Self {
        Self {
            session,
            api,
            allow_superuser,
        }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.session
    }

    pub fn superuser_allowed(&self) -> bool {
        self.allow_superuser
    }

    pub async fn snapshot(&self) -> SessionState {
        self.session.snapshot().await
    }

    pub async fn user(&self) -> Option<User> {
        self.session.user().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.snapshot().await.is_authenticated()
    }

    /// Exchange credentials for a token, persist it, then load the profile
    ///
    /// The superuser flag is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.begin().await;
        let result = self.login_inner(email, password).await;
        self.finish(&result).await;
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let token = self
            .api
            .login(email, password)
            .await
            .map_err(|e| SessionError::api(e, "Login failed"))?;

        self.session
            .update(|state| {
                state.token = Some(token.access_token);
                state.user = None;
            })
            .await;
        self.session.save().await?;

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Logged in");
                self.session.set_user(Some(user)).await;
                Ok(())
            }
            Err(e) => {
                // A token without a profile is not a usable session
                self.session.clear_token().await?;
                Err(SessionError::api(e, "Failed to fetch user data"))
            }
        }
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, registration: &Registration) -> Result<User, SessionError> {
        self.begin().await;
        let result = self
            .api
            .register(registration)
            .await
            .map_err(|e| SessionError::api(e, "Registration failed"));
        self.finish(&result).await;
        if let Ok(user) = &result {
            tracing::info!(user_id = %user.id, "Registered");
        }
        result
    }

    /// Forget token, user and superuser flag, in memory and on disk
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.session.clear_all().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Reload the profile from `/users/me`
    ///
    /// Does nothing without a token, or on the fabricated superuser token
    /// whose profile only exists locally.
    pub async fn fetch_user(&self) -> Result<(), SessionError> {
        if self.session.token().await.is_none() || self.session.is_fabricated().await {
            return Ok(());
        }

        self.begin().await;
        let result = match self.api.current_user().await {
            Ok(user) => {
                self.session.set_user(Some(user)).await;
                Ok(())
            }
            Err(e) => Err(SessionError::api(e, "Failed to fetch user data")),
        };
        self.finish(&result).await;
        result
    }

    /// Sign in as the local superuser without contacting the backend
    pub async fn login_as_superuser(&self) -> Result<(), SessionError> {
        if !self.allow_superuser {
            self.session
                .set_error(Some(SessionError::SuperuserDisabled.to_string()))
                .await;
            return Err(SessionError::SuperuserDisabled);
        }

        self.session
            .update(|state| {
                state.token = Some(SUPERUSER_TOKEN.to_string());
                state.user = Some(superuser_profile());
                state.is_superuser = true;
                state.error = None;
            })
            .await;
        self.session.save().await?;
        tracing::info!("Superuser mode enabled via login");
        Ok(())
    }

    /// Turn on response substitution for the current session
    pub async fn enable_superuser(&self) -> Result<(), SessionError> {
        if !self.allow_superuser {
            return Err(SessionError::SuperuserDisabled);
        }
        self.session.set_superuser(true).await?;
        tracing::info!("Superuser mode enabled");
        Ok(())
    }

    /// Turn off response substitution; a fabricated superuser session ends
    pub async fn disable_superuser(&self) -> Result<(), SessionError> {
        let fabricated = self.session.token().await.as_deref() == Some(SUPERUSER_TOKEN);
        if fabricated {
            self.session
                .update(|state| {
                    state.token = None;
                    state.user = None;
                })
                .await;
        }
        self.session.set_superuser(false).await?;
        tracing::info!(signed_out = fabricated, "Superuser mode disabled");
        Ok(())
    }

    /// Load the persisted record at startup
    ///
    /// A superuser flag is dropped when the configuration forbids it. When
    /// allowed, the superuser profile is regenerated locally for the
    /// fabricated token only; a real token keeps its backend identity.
    pub async fn restore(&self) -> Result<(), SessionError> {
        let record = self.session.restore().await?;

        if record.is_superuser {
            if self.allow_superuser {
                if record.usable_token() == Some(SUPERUSER_TOKEN) {
                    self.session.set_user(Some(superuser_profile())).await;
                }
            } else {
                tracing::warn!("Persisted superuser flag ignored: superuser mode is disabled");
                let fabricated = record.usable_token() == Some(SUPERUSER_TOKEN);
                if fabricated {
                    self.session.update(|state| state.token = None).await;
                }
                self.session.set_superuser(false).await?;
            }
        }

        tracing::debug!(
            has_token = self.session.token().await.is_some(),
            is_superuser = self.session.is_superuser().await,
            "Session restored"
        );
        Ok(())
    }

    /// Write the record at shutdown
    pub async fn save(&self) -> Result<(), SessionError> {
        self.session.save().await?;
        Ok(())
    }

    async fn begin(&self) {
        self.session
            .update(|state| {
                state.is_loading = true;
                state.error = None;
            })
            .await;
    }

    async fn finish<T>(&self, result: &Result<T, SessionError>) {
        let error = result.as_ref().err().map(|e| e.to_string());
        if let Some(message) = &error {
            tracing::warn!(error = %message, "Session operation failed");
        }
        self.session
            .update(|state| {
                state.is_loading = false;
                state.error = error;
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::navigation::Navigator;
    use crate::session::{MemoryStorage, PersistedSession, SessionStorage, SUPERUSER_ID};
    use std::sync::Arc;

    fn store_with(storage: Arc<MemoryStorage>, allow_superuser: bool) -> SessionStore {
        let session = SessionHandle::new(storage);
        let config = ApiConfig {
            // Nothing listens here; these tests never reach the network
            base_url: "http://127.0.0.1:9".to_string(),
            ..ApiConfig::default()
        };
        let api = ApiClient::new(&config, session.clone(), Navigator::default()).unwrap();
        SessionStore::new(session, api, allow_superuser)
    }

    #[tokio::test]
    async fn test_superuser_login_is_local() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone(), true);

        store.login_as_superuser().await.unwrap();

        let state = store.snapshot().await;
        assert!(state.is_authenticated());
        assert!(state.is_superuser);
        assert_eq!(state.user.unwrap().id, SUPERUSER_ID);

        let persisted = storage.peek().unwrap();
        assert_eq!(persisted.token.as_deref(), Some(SUPERUSER_TOKEN));
        assert!(persisted.is_superuser);
    }

    #[tokio::test]
    async fn test_superuser_refused_when_disabled() {
        let store = store_with(Arc::new(MemoryStorage::new()), false);
        let err = store.login_as_superuser().await.unwrap_err();
        assert!(matches!(err, SessionError::SuperuserDisabled));
        assert!(store.snapshot().await.error.is_some());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone(), true);
        store.login_as_superuser().await.unwrap();

        store.logout().await.unwrap();

        let state = store.snapshot().await;
        assert!(state.token.is_none());
        assert!(state.user.is_none());
        assert!(!state.is_superuser);
        assert!(storage.load().unwrap().usable_token().is_none());
    }

    #[tokio::test]
    async fn test_fetch_user_without_token_is_noop() {
        let store = store_with(Arc::new(MemoryStorage::new()), false);
        store.fetch_user().await.unwrap();
        assert!(store.user().await.is_none());
        assert!(!store.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn test_restore_drops_forbidden_superuser_flag() {
        let storage = Arc::new(MemoryStorage::with_record(PersistedSession {
            token: Some(SUPERUSER_TOKEN.to_string()),
            is_superuser: true,
        }));
        let store = store_with(storage.clone(), false);

        store.restore().await.unwrap();

        let state = store.snapshot().await;
        assert!(!state.is_superuser);
        assert!(state.token.is_none());
        assert!(!storage.peek().unwrap().is_superuser);
    }

    #[tokio::test]
    async fn test_restore_regenerates_superuser_profile() {
        let storage = Arc::new(MemoryStorage::with_record(PersistedSession {
            token: Some(SUPERUSER_TOKEN.to_string()),
            is_superuser: true,
        }));
        let store = store_with(storage, true);

        store.restore().await.unwrap();

        let state = store.snapshot().await;
        assert!(state.is_authenticated());
        assert_eq!(state.user.unwrap().username, "superadmin");
    }

    #[tokio::test]
    async fn test_restore_keeps_real_identity_with_superuser_flag() {
        let storage = Arc::new(MemoryStorage::with_record(PersistedSession {
            token: Some("real-jwt-for-u1".to_string()),
            is_superuser: true,
        }));
        let store = store_with(storage, true);

        store.restore().await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(state.token.as_deref(), Some("real-jwt-for-u1"));
        assert!(state.is_superuser);
        assert!(state.user.is_none());
        assert!(!store.handle().is_fabricated().await);
    }

    #[tokio::test]
    async fn test_fetch_user_on_fabricated_token_is_noop() {
        let store = store_with(Arc::new(MemoryStorage::new()), true);
        store.login_as_superuser().await.unwrap();

        // The backend is unreachable, so any request would fail
        store.fetch_user().await.unwrap();

        assert_eq!(store.user().await.unwrap().id, SUPERUSER_ID);
        assert!(store.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_disable_superuser_ends_fabricated_session() {
        let store = store_with(Arc::new(MemoryStorage::new()), true);
        store.login_as_superuser().await.unwrap();

        store.disable_superuser().await.unwrap();

        let state = store.snapshot().await;
        assert!(!state.is_superuser);
        assert!(state.token.is_none());
        assert!(state.user.is_none());
    }
}
