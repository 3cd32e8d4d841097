//! Pages
//!
//! Each page is a view model with the same cycle: mount (fetch what it
//! shows), act (issue writes through the API client or session store), and
//! render to text. Failures surface as toasts and leave the view empty.

mod chat;
mod discover;
mod login;
mod matches;
mod profile;
mod register;
mod video;

pub use chat::ChatPage;
pub use discover::DiscoverPage;
pub use login::LoginPage;
pub use matches::MatchesPage;
pub use profile::{ProfileForm, ProfilePage};
pub use register::RegisterPage;
pub use video::VideoPage;

use crate::navigation::Route;

/// A renderable screen
pub trait Page {
    fn route(&self) -> Route;

    fn render(&self) -> String;
}

pub(crate) fn age_label(age: Option<i32>) -> String {
    age.map(|a| format!(", {}", a)).unwrap_or_default()
}
