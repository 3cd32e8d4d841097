//! View Models
//!
//! Client-side shapes mirroring the SammySwipe API payloads.
//!
//! - [`user`]: the signed-in user, registration and profile payloads
//! - [`matching`]: recommendation candidates, matched users, preferences
//! - [`chat`]: messages and outgoing stream frames
//! - [`format`]: small display helpers (age, initials, truncation)

pub mod chat;
pub mod format;
pub mod matching;
pub mod user;

pub use chat::{Message, OutgoingFrame};
pub use format::{calculate_age, format_date, initials, parse_birth_date, truncate};
pub use matching::{Candidate, MatchedUser, Preferences};
pub use user::{Gender, ProfileUpdate, Registration, SocialHandles, Token, User};

/// Generic acknowledgement body returned by write endpoints
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}
