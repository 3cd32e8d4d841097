//! API Error Types

use thiserror::Error;

use crate::fixtures::FixtureError;

/// Errors from calls to the SammySwipe backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend rejected the session (HTTP 401)
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },

    /// Any other non-success status
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Parse(String),

    /// Input rejected before sending
    #[error("Validation error: {0}")]
    Validation(String),

    /// Synthesized superuser response could not be produced
    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Classify a transport failure the way the rest of the client reports it
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(e)
        }
    }

    /// The backend's human-readable `detail`, when it sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Api { detail, .. } if !detail.is_empty() => {
                Some(detail.as_str())
            }
            ApiError::Validation(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// `detail` when present, otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Extract `detail` from a FastAPI-style error body
///
/// `detail` is either a string or, for request validation failures, a list of
/// `{loc, msg, type}` objects.
pub(crate) fn extract_detail(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };

    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => body.trim().to_string(),
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
