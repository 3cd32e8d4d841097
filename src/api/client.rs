//! HTTP Client Wrapper
//!
//! One place where requests are built and responses are intercepted:
//! - the bearer token is attached whenever the session holds one
//! - a 401 clears the token and forces the login screen, unless the session is
//!   in superuser mode, in which case a synthesized payload is returned instead

use reqwest::{multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::endpoint::Endpoint;
use super::error::{extract_detail, ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::fixtures::MockResponder;
use crate::navigation::{Navigator, Route};
use crate::session::SessionHandle;

/// Request body variants the backend accepts
pub(crate) enum Body {
    Empty,
    Json(Value),
    Form(Vec<(&'static str, String)>),
    File {
        field: &'static str,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Client for the SammySwipe REST API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    /// Path component of `base_url`, stripped before classifying a response
    base_path: String,
    session: SessionHandle,
    navigator: Navigator,
    mock: Option<Arc<MockResponder>>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        session: SessionHandle,
        navigator: Navigator,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("sammyswipe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base_path = reqwest::Url::parse(&base_url)
            .map(|url| url.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        Ok(Self {
            http,
            base_url,
            base_path,
            session,
            navigator,
            mock: None,
        })
    }

    /// Enable synthesized responses for superuser sessions
    pub fn with_mock(mut self, mock: Arc<MockResponder>) -> Self {
        self.mock = Some(mock);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn has_mock(&self) -> bool {
        self.mock.is_some()
    }

    /// Send a request and decode the JSON response
    pub(crate) async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint, body: Body) -> ApiResult<T> {
        let method = endpoint.method();
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }

        let mut request_json = None;
        request = match body {
            Body::Empty => request,
            Body::Json(value) => {
                let request = request.json(&value);
                request_json = Some(value);
                request
            }
            Body::Form(fields) => request.form(&fields),
            Body::File {
                field,
                file_name,
                mime,
                bytes,
            } => {
                let part = multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)?;
                request.multipart(multipart::Form::new().part(field, part))
            }
        };

        tracing::debug!(method = %method, url = %url, "API request");

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return self
                .intercept_unauthorized(&endpoint, request_json.as_ref(), response)
                .await;
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = extract_detail(&text);
            tracing::warn!(
                status = status.as_u16(),
                endpoint = ?endpoint,
                detail = %detail,
                "API call failed"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        decode_body(&bytes)
    }

    async fn intercept_unauthorized<T: DeserializeOwned>(
        &self,
        requested: &Endpoint,
        request_json: Option<&Value>,
        response: Response,
    ) -> ApiResult<T> {
        let endpoint = self.rejected_endpoint(requested, response.url().path());

        if endpoint.is_authenticated() && self.session.is_superuser().await {
            if let Some(mock) = &self.mock {
                tracing::info!(endpoint = ?endpoint, "Superuser mode: substituting rejected call");
                let fabricated = self.session.is_fabricated().await;
                let value = mock.respond(&endpoint, request_json, fabricated).await?;
                return serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()));
            }
        }

        let detail = extract_detail(&response.text().await.unwrap_or_default());
        tracing::warn!(endpoint = ?endpoint, detail = %detail, "Session rejected, signing out");

        if let Err(e) = self.session.clear_token().await {
            tracing::error!("Failed to clear persisted token: {}", e);
        }
        self.navigator.navigate(Route::Login);

        Err(ApiError::Unauthorized { detail })
    }
}

impl ApiClient {
    /// Classify the rejected request from the path that answered
    ///
    /// Falls back to the endpoint that was requested when the path is not
    /// recognized, e.g. after a redirect or outside the base path.
    fn rejected_endpoint(&self, requested: &Endpoint, response_path: &str) -> Endpoint {
        let relative = response_path
            .strip_prefix(self.base_path.as_str())
            .unwrap_or(response_path);
        match Endpoint::classify(&requested.method(), relative) {
            Endpoint::Other => requested.clone(),
            classified => classified,
        }
    }
}

/// Decode a success body; empty bodies decode as JSON `null`
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null).map_err(|e| ApiError::Parse(e.to_string()));
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::Parse(e.to_string()))
}
