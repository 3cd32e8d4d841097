//! Endpoint Catalogue
//!
//! Every REST call the client makes, with its method and path. The same table
//! runs backwards: [`Endpoint::classify`] recovers the endpoint from a method
//! and path, which is how a rejected request is matched to a synthesized
//! response in superuser mode.

use regex::Regex;
use reqwest::Method;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    CurrentUser,
    UpdateProfile,
    UploadPhoto,
    UpdatePreferences,
    Recommendations,
    MyMatches,
    Like { user_id: String },
    Reject { user_id: String },
    Accept { user_id: String },
    ChatHistory { user_id: String },
    SendMessage { user_id: String },
    MarkRead { user_id: String },
    Health,
    Other,
}

struct Patterns {
    match_action: Regex,
    match_target: Regex,
    chat_action: Regex,
    chat_target: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                match_action: Regex::new(r"^/matches/([^/]+)/(reject|accept)$").ok()?,
                match_target: Regex::new(r"^/matches/([^/]+)$").ok()?,
                chat_action: Regex::new(r"^/chat/([^/]+)/(history|mark-read)$").ok()?,
                chat_target: Regex::new(r"^/chat/([^/]+)$").ok()?,
            })
        })
        .as_ref()
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CurrentUser
            | Endpoint::Recommendations
            | Endpoint::MyMatches
            | Endpoint::ChatHistory { .. }
            | Endpoint::Health
            | Endpoint::Other => Method::GET,
            Endpoint::Login
            | Endpoint::Register
            | Endpoint::UploadPhoto
            | Endpoint::Like { .. }
            | Endpoint::SendMessage { .. } => Method::POST,
            Endpoint::UpdateProfile
            | Endpoint::UpdatePreferences
            | Endpoint::Reject { .. }
            | Endpoint::Accept { .. }
            | Endpoint::MarkRead { .. } => Method::PUT,
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/auth/token".to_string(),
            Endpoint::Register => "/auth/register".to_string(),
            Endpoint::CurrentUser | Endpoint::UpdateProfile => "/users/me".to_string(),
            Endpoint::UploadPhoto => "/users/me/photo".to_string(),
            Endpoint::UpdatePreferences => "/users/me/preferences".to_string(),
            Endpoint::Recommendations => "/matches/recommendations".to_string(),
            Endpoint::MyMatches => "/matches/my-matches".to_string(),
            Endpoint::Like { user_id } => format!("/matches/{}", encode(user_id)),
            Endpoint::Reject { user_id } => format!("/matches/{}/reject", encode(user_id)),
            Endpoint::Accept { user_id } => format!("/matches/{}/accept", encode(user_id)),
            Endpoint::ChatHistory { user_id } => format!("/chat/{}/history", encode(user_id)),
            Endpoint::SendMessage { user_id } => format!("/chat/{}", encode(user_id)),
            Endpoint::MarkRead { user_id } => format!("/chat/{}/mark-read", encode(user_id)),
            Endpoint::Health => "/health".to_string(),
            Endpoint::Other => "/".to_string(),
        }
    }

    /// Calls that run under the user's token; only these are ever substituted
    pub fn is_authenticated(&self) -> bool {
        !matches!(
            self,
            Endpoint::Login | Endpoint::Register | Endpoint::Health | Endpoint::Other
        )
    }

    /// Recover the endpoint from a method and a path (query string ignored)
    pub fn classify(method: &Method, path: &str) -> Self {
        let path = path.split('?').next().unwrap_or(path);
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match (method.as_str(), path) {
            ("POST", "/auth/token") => return Endpoint::Login,
            ("POST", "/auth/register") => return Endpoint::Register,
            ("GET", "/users/me") => return Endpoint::CurrentUser,
            ("PUT", "/users/me") => return Endpoint::UpdateProfile,
            ("POST", "/users/me/photo") => return Endpoint::UploadPhoto,
            ("PUT", "/users/me/preferences") => return Endpoint::UpdatePreferences,
            ("GET", "/matches/recommendations") => return Endpoint::Recommendations,
            ("GET", "/matches/my-matches") => return Endpoint::MyMatches,
            ("GET", "/health") => return Endpoint::Health,
            _ => {}
        }

        let Some(p) = patterns() else {
            return Endpoint::Other;
        };

        if let Some(caps) = p.match_action.captures(path) {
            let user_id = decode(&caps[1]);
            return match (method.as_str(), &caps[2]) {
                ("PUT", "reject") => Endpoint::Reject { user_id },
                ("PUT", "accept") => Endpoint::Accept { user_id },
                _ => Endpoint::Other,
            };
        }
        if let Some(caps) = p.chat_action.captures(path) {
            let user_id = decode(&caps[1]);
            return match (method.as_str(), &caps[2]) {
                ("GET", "history") => Endpoint::ChatHistory { user_id },
                ("PUT", "mark-read") => Endpoint::MarkRead { user_id },
                _ => Endpoint::Other,
            };
        }
        if method == Method::POST {
            if let Some(caps) = p.match_target.captures(path) {
                return Endpoint::Like {
                    user_id: decode(&caps[1]),
                };
            }
            if let Some(caps) = p.chat_target.captures(path) {
                return Endpoint::SendMessage {
                    user_id: decode(&caps[1]),
                };
            }
        }

        Endpoint::Other
    }
}
