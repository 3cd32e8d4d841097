//! Synthesized responses for superuser mode

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{FixtureError, FixtureSource, LocalSource};
use crate::api::Endpoint;
use crate::models::{Candidate, MatchedUser, Message, User};
use crate::session::{superuser_profile, SUPERUSER_ID};

const CHAT_LINES: [&str; 6] = [
    "Hey! I saw we matched, how's your week going?",
    "Pretty good, thanks! Just got back from a hike.",
    "Nice, where did you go?",
    "A trail just outside the city. You should come next time!",
    "I'd love that. Coffee first?",
    "Sounds like a plan.",
];

/// Builds endpoint-shaped payloads from a fixture source
pub struct MockResponder {
    primary: Arc<dyn FixtureSource>,
    fallback: LocalSource,
    count: usize,
}

impl MockResponder {
    pub fn new(primary: Arc<dyn FixtureSource>, count: usize) -> Self {
        Self {
            primary,
            fallback: LocalSource::new(),
            count: count.max(1),
        }
    }

    pub fn source_name(&self) -> &str {
        self.primary.name()
    }

    /// Payload standing in for a rejected call to `endpoint`
    ///
    /// `fabricated` is set when the session runs on the local superuser
    /// token; profile calls then answer with the superuser profile instead of
    /// a generated identity.
    pub async fn respond(
        &self,
        endpoint: &Endpoint,
        request: Option<&Value>,
        fabricated: bool,
    ) -> Result<Value, FixtureError> {
        match endpoint {
            Endpoint::CurrentUser => to_json(&self.profile(fabricated).await?),
            Endpoint::UpdateProfile => {
                let user = self.profile(fabricated).await?;
                to_json(&apply_update(user, request))
            }
            Endpoint::Recommendations => {
                let users = self.identities(self.count).await?;
                let mut rng = fastrand::Rng::new();
                let candidates: Vec<Candidate> = users
                    .into_iter()
                    .map(|user| to_candidate(user, &mut rng))
                    .collect();
                to_json(&candidates)
            }
            Endpoint::MyMatches => {
                let users = self.identities(self.count.div_ceil(2)).await?;
                let mut rng = fastrand::Rng::new();
                let matches: Vec<MatchedUser> = users
                    .into_iter()
                    .map(|user| to_match(user, &mut rng))
                    .collect();
                to_json(&matches)
            }
            Endpoint::ChatHistory { user_id } => {
                let counterpart = self.identities(1).await?.into_iter().next();
                to_json(&conversation(user_id, counterpart.as_ref()))
            }
            Endpoint::SendMessage { user_id } => {
                let content = request
                    .and_then(|body| body.get("content"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                to_json(&Message {
                    id: Some(uuid::Uuid::new_v4().to_string()),
                    sender_id: SUPERUSER_ID.to_string(),
                    receiver_id: Some(user_id.clone()),
                    content: content.to_string(),
                    timestamp: Some(Utc::now().to_rfc3339()),
                    is_read: false,
                })
            }
            Endpoint::MarkRead { .. } => Ok(json!({ "messages_marked_read": 0 })),
            _ => Ok(json!({ "message": "ok" })),
        }
    }

    async fn profile(&self, fabricated: bool) -> Result<User, FixtureError> {
        if fabricated {
            return Ok(superuser_profile());
        }
        self.identities(1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FixtureError::Parse("no identity generated".to_string()))
    }

    async fn identities(&self, count: usize) -> Result<Vec<User>, FixtureError> {
        match self.primary.identities(count).await {
            Ok(users) if !users.is_empty() => Ok(users),
            Ok(_) => {
                tracing::warn!(source = self.primary.name(), "Fixture source returned nothing, using local identities");
                self.fallback.identities(count).await
            }
            Err(e) => {
                tracing::warn!(source = self.primary.name(), error = %e, "Fixture source failed, using local identities");
                self.fallback.identities(count).await
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, FixtureError> {
    serde_json::to_value(value).map_err(|e| FixtureError::Parse(e.to_string()))
}

fn score(rng: &mut fastrand::Rng) -> f64 {
    (rng.f64() * 100.0).round() / 100.0
}

fn to_candidate(user: User, rng: &mut fastrand::Rng) -> Candidate {
    let common_topics = user
        .interests
        .iter()
        .filter(|_| rng.bool())
        .cloned()
        .collect();
    Candidate {
        id: user.id,
        full_name: user.full_name,
        profile_photo: user.profile_photo,
        bio: user.bio,
        interests: user.interests,
        birth_date: user.birth_date,
        location: user.location,
        match_score: score(rng),
        common_topics,
    }
}

fn to_match(user: User, rng: &mut fastrand::Rng) -> MatchedUser {
    let last_message = Message {
        id: Some(uuid::Uuid::new_v4().to_string()),
        sender_id: user.id.clone(),
        receiver_id: Some(SUPERUSER_ID.to_string()),
        content: CHAT_LINES[rng.usize(..CHAT_LINES.len())].to_string(),
        timestamp: Some((Utc::now() - Duration::minutes(rng.i64(1..600))).to_rfc3339()),
        is_read: rng.bool(),
    };
    MatchedUser {
        id: user.id,
        full_name: user.full_name,
        profile_photo: user.profile_photo,
        bio: user.bio,
        interests: user.interests,
        birth_date: user.birth_date,
        match_score: Some(score(rng)),
        last_message: Some(last_message),
    }
}

/// A short exchange alternating between the counterpart and the superuser
///
/// Lines mention the counterpart's name, interests and location when an
/// identity is available.
fn conversation(user_id: &str, counterpart: Option<&User>) -> Vec<Message> {
    let name = counterpart
        .and_then(|u| u.full_name.split_whitespace().next())
        .unwrap_or("there");
    let hobbies = counterpart
        .map(|u| {
            u.interests
                .iter()
                .take(2)
                .map(|i| i.to_lowercase())
                .collect::<Vec<_>>()
                .join(" and ")
        })
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "getting outside".to_string());
    let place = counterpart
        .and_then(|u| u.location.as_deref())
        .and_then(|l| l.split(',').next())
        .unwrap_or("town");

    let lines = [
        format!("Hey! I'm {}. I saw we matched, how's your week going?", name),
        "Pretty good, thanks! What do you do for fun?".to_string(),
        format!("Mostly {}. You?", hobbies),
        "Same, honestly. I've been meaning to do more of that.".to_string(),
        format!("Let's do it together sometime. I'm around {} most weekends.", place.trim()),
        "Sounds like a plan.".to_string(),
    ];

    let now = Utc::now();
    let total = lines.len() as i64;
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let (sender, receiver) = if i % 2 == 0 {
                (user_id, SUPERUSER_ID)
            } else {
                (SUPERUSER_ID, user_id)
            };
            Message {
                id: Some(format!("mock-{}", i + 1)),
                sender_id: sender.to_string(),
                receiver_id: Some(receiver.to_string()),
                content: line,
                timestamp: Some((now - Duration::minutes((total - i as i64) * 3)).to_rfc3339()),
                is_read: true,
            }
        })
        .collect()
}

fn apply_update(mut user: User, request: Option<&Value>) -> User {
    let Some(body) = request else {
        return user;
    };
    let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);

    if let Some(name) = text(body.get("full_name")).filter(|n| !n.trim().is_empty()) {
        user.full_name = name;
    }
    if let Some(bio) = text(body.get("bio")) {
        user.bio = Some(bio);
    }
    if let Some(photo) = text(body.get("profile_photo")).filter(|p| !p.is_empty()) {
        user.profile_photo = Some(photo);
    }
    if let Some(handles) = body.get("social_handles") {
        let handle = |key: &str| text(handles.get(key)).filter(|h| !h.is_empty());
        user.twitter_handle = handle("twitter");
        user.instagram_handle = handle("instagram");
        user.facebook_handle = handle("facebook");
    }
    user
}
