//! Current-user endpoints

use std::path::Path;

use super::client::{ApiClient, Body};
use super::endpoint::Endpoint;
use super::error::{ApiError, ApiResult};
use crate::models::{Ack, Preferences, ProfileUpdate, User};

impl ApiClient {
    pub async fn current_user(&self) -> ApiResult<User> {
        self.call(Endpoint::CurrentUser, Body::Empty).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.call(Endpoint::UpdateProfile, Body::Json(body)).await
    }

    pub async fn update_preferences(&self, preferences: &Preferences) -> ApiResult<Ack> {
        preferences.validate().map_err(ApiError::Validation)?;
        let body = serde_json::to_value(preferences).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.call(Endpoint::UpdatePreferences, Body::Json(body)).await
    }

    /// Upload a profile photo from disk as multipart `file`
    pub async fn upload_photo(&self, path: &Path) -> ApiResult<Ack> {
        let mime = image_mime(path).ok_or_else(|| {
            ApiError::Validation(format!("Unsupported photo type: {}", path.display()))
        })?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        self.call(
            Endpoint::UploadPhoto,
            Body::File {
                field: "file",
                file_name,
                mime: mime.to_string(),
                bytes,
            },
        )
        .await
    }
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
