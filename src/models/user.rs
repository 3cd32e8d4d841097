//! User Models

use serde::{Deserialize, Serialize};

/// Gender values accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non_binary",
            Gender::Other => "other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "non_binary" | "non-binary" | "nonbinary" => Ok(Gender::NonBinary),
            "other" => Ok(Gender::Other),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// The signed-in user's profile, as returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// ISO 8601 date or datetime; see [`super::parse_birth_date`]
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub twitter_handle: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub facebook_handle: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
}

impl User {
    /// Age in whole years, when the birth date parses
    pub fn age(&self) -> Option<i32> {
        self.birth_date
            .as_deref()
            .and_then(super::parse_birth_date)
            .map(super::calculate_age)
    }

    pub fn social_handles(&self) -> SocialHandles {
        SocialHandles {
            twitter: self.twitter_handle.clone().unwrap_or_default(),
            instagram: self.instagram_handle.clone().unwrap_or_default(),
            facebook: self.facebook_handle.clone().unwrap_or_default(),
        }
    }
}

/// Access token returned by `POST /auth/token`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Registration payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub gender: Gender,
    pub birth_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl Registration {
    /// Client-side checks run before the payload is sent
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("A valid email address is required".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        if super::parse_birth_date(&self.birth_date).is_none() {
            return Err(format!("Invalid birth date: {}", self.birth_date));
        }
        Ok(())
    }
}

/// Social network handles edited on the profile page
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SocialHandles {
    pub twitter: String,
    pub instagram: String,
    pub facebook: String,
}

/// Body of `PUT /users/me`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub bio: String,
    pub profile_photo: String,
    pub social_handles: SocialHandles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_minimal_payload() {
        let json = r#"{
            "id": "u1",
            "email": "ana@example.com",
            "username": "ana",
            "full_name": "Ana Lima",
            "gender": "female",
            "birth_date": "1995-04-02T00:00:00"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.gender, Some(Gender::Female));
        assert!(user.interests.is_empty());
        assert!(user.age().is_some());
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("non-binary".parse::<Gender>().unwrap(), Gender::NonBinary);
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn test_registration_validation() {
        let mut reg = Registration {
            email: "bob@example.com".into(),
            username: "bob".into(),
            full_name: "Bob Stone".into(),
            password: "hunter2".into(),
            gender: Gender::Male,
            birth_date: "1990-01-15".into(),
            bio: None,
            interests: vec![],
            location: None,
            profile_photo: None,
        };
        assert!(reg.validate().is_ok());

        reg.email = "not-an-email".into();
        assert!(reg.validate().is_err());
    }
}
