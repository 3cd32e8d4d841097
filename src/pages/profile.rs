//! Profile screen

use std::path::Path;

use super::Page;
use crate::app::{AppContext, AppError};
use crate::models::{format_date, Preferences, ProfileUpdate, SocialHandles, User};
use crate::navigation::Route;

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub bio: String,
    pub profile_photo: String,
    pub twitter: String,
    pub instagram: String,
    pub facebook: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        let handles = user.social_handles();
        Self {
            full_name: user.full_name.clone(),
            bio: user.bio.clone().unwrap_or_default(),
            profile_photo: user.profile_photo.clone().unwrap_or_default(),
            twitter: handles.twitter,
            instagram: handles.instagram,
            facebook: handles.facebook,
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            bio: self.bio.trim().to_string(),
            profile_photo: self.profile_photo.trim().to_string(),
            social_handles: SocialHandles {
                twitter: self.twitter.trim().to_string(),
                instagram: self.instagram.trim().to_string(),
                facebook: self.facebook.trim().to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfilePage {
    pub form: ProfileForm,
    user: Option<User>,
    is_saving: bool,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Show the saving state until the next `submit` finishes
    pub fn mark_saving(&mut self) {
        self.is_saving = true;
    }

    /// Seed the form from the session user
    pub async fn mount(&mut self, ctx: &AppContext) -> Result<(), AppError> {
        let user = ctx.require_user().await?;
        self.form = ProfileForm::from_user(&user);
        self.user = Some(user);
        Ok(())
    }

    /// Save the form, then reload the profile
    pub async fn submit(&mut self, ctx: &AppContext) -> bool {
        self.is_saving = true;
        let result = ctx.api.update_profile(&self.form.to_update()).await;
        self.is_saving = false;

        let updated = match result {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(error = %e, "Profile update failed");
                ctx.toasts.error("Failed to update profile. Please try again.");
                return false;
            }
        };

        if ctx.session.handle().is_fabricated().await {
            // The fabricated superuser profile only exists locally
            ctx.session.handle().set_user(Some(updated)).await;
        } else if let Err(e) = ctx.session.fetch_user().await {
            tracing::warn!(error = %e, "Profile saved but reload failed");
        }

        self.reseed(ctx).await;
        ctx.toasts.success("Profile updated successfully!");
        true
    }

    pub async fn upload_photo(&mut self, ctx: &AppContext, path: &Path) -> bool {
        match ctx.api.upload_photo(path).await {
            Ok(_) => {
                if let Err(e) = ctx.session.fetch_user().await {
                    tracing::warn!(error = %e, "Photo uploaded but reload failed");
                }
                self.reseed(ctx).await;
                ctx.toasts.success("Profile photo updated successfully");
                true
            }
            Err(e) => {
                ctx.toasts.error(e.user_message("Failed to upload photo"));
                false
            }
        }
    }

    pub async fn update_preferences(&mut self, ctx: &AppContext, preferences: &Preferences) -> bool {
        match ctx.api.update_preferences(preferences).await {
            Ok(_) => {
                ctx.toasts.success("Preferences updated successfully");
                true
            }
            Err(e) => {
                ctx.toasts.error(e.user_message("Failed to update preferences"));
                false
            }
        }
    }

    async fn reseed(&mut self, ctx: &AppContext) {
        if let Some(user) = ctx.session.user().await {
            self.form = ProfileForm::from_user(&user);
            self.user = Some(user);
        }
    }
}

impl Page for ProfilePage {
    fn route(&self) -> Route {
        Route::Profile
    }

    fn render(&self) -> String {
        if self.is_saving {
            return "Saving...".to_string();
        }
        let Some(user) = &self.user else {
            return "Not signed in".to_string();
        };

        let mut lines = vec![
            format!("{} (@{})", self.form.full_name, user.username),
            user.email.clone(),
        ];
        if let Some(birth_date) = &user.birth_date {
            lines.push(format!("Born {}", format_date(birth_date)));
        }
        if let Some(location) = &user.location {
            lines.push(location.clone());
        }
        if !self.form.bio.is_empty() {
            lines.push(self.form.bio.clone());
        }
        if !user.interests.is_empty() {
            lines.push(format!("Interests: {}", user.interests.join(", ")));
        }
        for (label, handle) in [
            ("Twitter", &self.form.twitter),
            ("Instagram", &self.form.instagram),
            ("Facebook", &self.form.facebook),
        ] {
            if !handle.is_empty() {
                lines.push(format!("{}: {}", label, handle));
            }
        }
        lines.join("\n")
    }
}
