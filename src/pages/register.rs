//! Registration screen

use super::Page;
use crate::app::AppContext;
use crate::models::{Gender, Registration};
use crate::navigation::Route;

#[derive(Debug, Clone)]
pub struct RegisterPage {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub gender: Gender,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub bio: String,
    /// Comma-separated
    pub interests: String,
    pub location: String,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self {
            email: String::new(),
            username: String::new(),
            full_name: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            gender: Gender::Other,
            birth_date: String::new(),
            bio: String::new(),
            interests: String::new(),
            location: String::new(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(&self) -> Registration {
        Registration {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            password: self.password.clone(),
            gender: self.gender,
            birth_date: self.birth_date.trim().to_string(),
            bio: non_empty(&self.bio),
            interests: self
                .interests
                .split(',')
                .filter_map(non_empty)
                .collect(),
            location: non_empty(&self.location),
            profile_photo: None,
        }
    }

    /// Create the account, then send the user to the login screen
    pub async fn submit(&mut self, ctx: &AppContext) -> bool {
        if self.password != self.confirm_password {
            ctx.toasts.error("Passwords do not match");
            return false;
        }

        match ctx.session.register(&self.registration()).await {
            Ok(_) => {
                ctx.toasts.success("Registration successful! Please log in.");
                ctx.navigator.navigate(Route::Login);
                true
            }
            Err(e) => {
                ctx.toasts.error(e.to_string());
                false
            }
        }
    }
}

impl Page for RegisterPage {
    fn route(&self) -> Route {
        Route::Register
    }

    fn render(&self) -> String {
        format!(
            "Create your account\nEmail: {}\nUsername: {}\nName: {}\nGender: {}\nBirth date: {}\nInterests: {}",
            self.email,
            self.username,
            self.full_name,
            self.gender.as_str(),
            self.birth_date,
            self.interests
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_from_form() {
        let page = RegisterPage {
            email: " ana@example.com ".into(),
            username: "ana".into(),
            full_name: "Ana Lima".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            gender: Gender::Female,
            birth_date: "1995-04-02".into(),
            bio: "  ".into(),
            interests: "Music, ,Travel ".into(),
            location: "Lisbon".into(),
        };

        let reg = page.registration();
        assert_eq!(reg.email, "ana@example.com");
        assert_eq!(reg.interests, vec!["Music", "Travel"]);
        assert!(reg.bio.is_none());
        assert_eq!(reg.location.as_deref(), Some("Lisbon"));
        assert!(reg.validate().is_ok());
    }
}
