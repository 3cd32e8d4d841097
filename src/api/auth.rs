//! Auth endpoints

use super::client::{ApiClient, Body};
use super::endpoint::Endpoint;
use super::error::{ApiError, ApiResult};
use crate::models::{Registration, Token, User};

impl ApiClient {
    /// Exchange credentials for a bearer token (OAuth2 password form)
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Token> {
        let form = vec![
            ("username", email.to_string()),
            ("password", password.to_string()),
        ];
        self.call(Endpoint::Login, Body::Form(form)).await
    }

    /// Create an account; the new user still has to log in
    pub async fn register(&self, registration: &Registration) -> ApiResult<User> {
        registration.validate().map_err(ApiError::Validation)?;
        let body = serde_json::to_value(registration).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.call(Endpoint::Register, Body::Json(body)).await
    }

    /// Backend liveness
    pub async fn health(&self) -> ApiResult<serde_json::Value> {
        self.call(Endpoint::Health, Body::Empty).await
    }
}
