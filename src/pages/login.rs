//! Login screen

use super::Page;
use crate::app::AppContext;
use crate::navigation::Route;

#[derive(Debug, Default, Clone)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    is_loading: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_loading: false,
        }
    }

    pub fn mark_loading(&mut self) {
        self.is_loading = true;
    }

    /// Sign in; lands on Discover when it works
    pub async fn submit(&mut self, ctx: &AppContext) -> bool {
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            self.is_loading = false;
            ctx.toasts.error("Email and password are required");
            return false;
        }

        self.is_loading = true;
        let result = ctx.session.login(&email, &self.password).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.password.clear();
                ctx.toasts.success("Welcome back!");
                ctx.navigator.navigate(Route::Discover);
                true
            }
            Err(e) => {
                ctx.toasts.error(e.to_string());
                false
            }
        }
    }

    /// Enter superuser mode without credentials
    pub async fn enter_superuser(&mut self, ctx: &AppContext) -> bool {
        match ctx.session.login_as_superuser().await {
            Ok(()) => {
                ctx.toasts.success("Superuser mode enabled");
                ctx.navigator.navigate(Route::Discover);
                true
            }
            Err(e) => {
                ctx.toasts.error(e.to_string());
                false
            }
        }
    }
}

impl Page for LoginPage {
    fn route(&self) -> Route {
        Route::Login
    }

    fn render(&self) -> String {
        if self.is_loading {
            return "Signing in...".to_string();
        }
        format!(
            "Welcome to SammySwipe\nEmail: {}\nPassword: {}",
            self.email,
            "*".repeat(self.password.chars().count())
        )
    }
}
