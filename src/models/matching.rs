//! Matching Models
//!
//! Candidates surfaced by the recommendation endpoint, counterparts the user
//! has matched with, and the preferences that drive recommendations.

use serde::{Deserialize, Serialize};

use super::chat::Message;
use super::user::Gender;

/// A prospective match from `GET /matches/recommendations`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Candidate {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Compatibility in [0, 1]
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub common_topics: Vec<String>,
}

impl Candidate {
    /// Score rendered as a whole percentage
    pub fn score_percent(&self) -> u32 {
        (self.match_score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// A matched counterpart from `GET /matches/my-matches`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchedUser {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub last_message: Option<Message>,
}

impl MatchedUser {
    pub fn age(&self) -> Option<i32> {
        self.birth_date
            .as_deref()
            .and_then(super::parse_birth_date)
            .map(super::calculate_age)
    }
}

/// Matching preferences for `PUT /users/me/preferences`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Preferences {
    pub min_age: u8,
    pub max_age: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<Vec<Gender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<u16>,
    #[serde(default = "default_interests_weight")]
    pub interests_weight: f64,
}

fn default_interests_weight() -> f64 {
    0.5
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 100,
            preferred_gender: None,
            max_distance: None,
            interests_weight: default_interests_weight(),
        }
    }
}

impl Preferences {
    /// Mirrors the backend's field constraints so bad input never leaves the client
    pub fn validate(&self) -> Result<(), String> {
        for (name, age) in [("min_age", self.min_age), ("max_age", self.max_age)] {
            if !(18..=100).contains(&age) {
                return Err(format!("{} must be between 18 and 100, got {}", name, age));
            }
        }
        if self.min_age > self.max_age {
            return Err("min_age cannot exceed max_age".to_string());
        }
        if let Some(distance) = self.max_distance {
            if !(1..=1000).contains(&distance) {
                return Err(format!(
                    "max_distance must be between 1 and 1000, got {}",
                    distance
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.interests_weight) {
            return Err(format!(
                "interests_weight must be between 0 and 1, got {}",
                self.interests_weight
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_score_percent() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"id": "c1", "full_name": "Rae", "match_score": 0.876}"#,
        )
        .unwrap();
        assert_eq!(candidate.score_percent(), 88);
        assert!(candidate.common_topics.is_empty());
    }

    #[test]
    fn test_preferences_bounds() {
        assert!(Preferences::default().validate().is_ok());

        let prefs = Preferences {
            min_age: 40,
            max_age: 30,
            ..Default::default()
        };
        assert_eq!(
            prefs.validate().unwrap_err(),
            "min_age cannot exceed max_age"
        );

        let prefs = Preferences {
            max_distance: Some(0),
            ..Default::default()
        };
        assert!(prefs.validate().is_err());

        let prefs = Preferences {
            interests_weight: 1.5,
            ..Default::default()
        };
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_preferences_skip_unset_fields() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert!(json.get("preferred_gender").is_none());
        assert_eq!(json["interests_weight"], 0.5);
    }
}
