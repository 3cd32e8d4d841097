//! Application Context
//!
//! Everything a page needs, built once at startup and passed explicitly:
//! configuration, session store, API client, navigator and toasts.
//!
//! Persistence happens at two points only: [`AppContext::start`] loads the
//! session record and [`AppContext::shutdown`] writes it back.

use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::fixtures::{responder_from_config, FixtureError};
use crate::models::User;
use crate::navigation::{Navigator, Route};
use crate::session::{
    FileStorage, SessionError, SessionHandle, SessionStorage, SessionStore, StorageError,
};
use crate::stream::StreamError;
use crate::toast::Toasts;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Fixture setup failed: {0}")]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Not signed in")]
    NotAuthenticated,
}

pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,
    pub navigator: Navigator,
    pub toasts: Toasts,
}

impl AppContext {
    /// Build a context over an explicit storage backend
    pub fn new(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self, AppError> {
        let handle = SessionHandle::new(storage);
        let navigator = Navigator::default();

        let mut api = ApiClient::new(&config.api, handle.clone(), navigator.clone())?;
        let allow_superuser = config.fixtures.allow_superuser;
        if allow_superuser {
            let responder = responder_from_config(&config.fixtures)?;
            tracing::debug!(source = responder.source_name(), "Superuser substitution available");
            api = api.with_mock(Arc::new(responder));
        }

        let session = SessionStore::new(handle, api.clone(), allow_superuser);

        Ok(Self {
            config,
            session,
            api,
            navigator,
            toasts: Toasts::new(),
        })
    }

    /// Build a context persisting to the configured session file
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let storage = Arc::new(FileStorage::new(config.storage_path()));
        Self::new(config, storage)
    }

    /// Restore the persisted session and pick the landing route
    pub async fn start(&self) -> Route {
        match self.session.restore().await {
            Ok(()) => {}
            Err(SessionError::Storage(StorageError::Corrupt(e))) => {
                tracing::warn!(error = %e, "Session file unreadable, starting signed out");
                if let Err(e) = self.session.logout().await {
                    tracing::error!(error = %e, "Failed to reset session file");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore session");
            }
        }

        if self.session.user().await.is_none() {
            if let Err(e) = self.session.fetch_user().await {
                tracing::info!(error = %e, "Stored session could not be resumed");
            }
        }

        let route = if self.session.is_authenticated().await {
            Route::Discover
        } else {
            Route::Login
        };
        self.navigator.navigate(route);
        route
    }

    /// Write the session record back
    pub async fn shutdown(&self) {
        if let Err(e) = self.session.save().await {
            tracing::error!(error = %e, "Failed to save session");
        }
    }

    /// The signed-in user, or a redirect to the login screen
    pub async fn require_user(&self) -> Result<User, AppError> {
        let state = self.session.snapshot().await;
        match (state.token, state.user) {
            (Some(_), Some(user)) => Ok(user),
            _ => {
                self.navigator.navigate(Route::Login);
                Err(AppError::NotAuthenticated)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.logout().await?;
        self.navigator.navigate(Route::Login);
        self.toasts.info("Logged out");
        Ok(())
    }
}
