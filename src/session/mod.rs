//! Session
//!
//! - `storage`: the persisted `{token, is_superuser}` record
//! - `state`: shared in-memory session state
//! - `store`: login/logout/register and the superuser bypass

mod state;
mod storage;
mod store;

pub use state::{SessionHandle, SessionState};
pub use storage::{FileStorage, MemoryStorage, PersistedSession, SessionStorage, StorageError};
pub use store::{SessionError, SessionStore};

use crate::models::{Gender, User};

/// Id of the locally fabricated superuser
pub const SUPERUSER_ID: &str = "super-admin";

/// Token stored for superuser sessions; the backend never accepts it
pub const SUPERUSER_TOKEN: &str = "super-admin-token";

/// The profile shown while in superuser mode. Never persisted.
pub fn superuser_profile() -> User {
    User {
        id: SUPERUSER_ID.to_string(),
        email: "superuser@sammyswipe.com".to_string(),
        username: "superadmin".to_string(),
        full_name: "Super Admin".to_string(),
        gender: Some(Gender::Other),
        birth_date: Some("1990-01-01".to_string()),
        bio: Some("System administrator with full access".to_string()),
        interests: vec!["system administration".to_string(), "security".to_string()],
        location: Some("System".to_string()),
        profile_photo: Some("/images/admin.png".to_string()),
        twitter_handle: None,
        instagram_handle: None,
        facebook_handle: None,
        match_score: None,
    }
}
