//! Offline identity generator

use async_trait::async_trait;
use std::sync::Mutex;

use super::{random_interests, FixtureError, FixtureSource};
use crate::models::{Gender, User};

const FIRST_NAMES: [(&str, Gender); 12] = [
    ("Emma", Gender::Female),
    ("Liam", Gender::Male),
    ("Sofia", Gender::Female),
    ("Noah", Gender::Male),
    ("Mia", Gender::Female),
    ("Lucas", Gender::Male),
    ("Chloe", Gender::Female),
    ("Oliver", Gender::Male),
    ("Amelie", Gender::Female),
    ("Felix", Gender::Male),
    ("Isla", Gender::Female),
    ("Jack", Gender::Male),
];

const LAST_NAMES: [&str; 10] = [
    "Smith", "Brown", "Martin", "Wilson", "Taylor", "Dubois", "Schmidt", "Campbell", "Moore",
    "Clarke",
];

const PLACES: [(&str, &str); 8] = [
    ("Toronto", "Canada"),
    ("Manchester", "United Kingdom"),
    ("Austin", "United States"),
    ("Melbourne", "Australia"),
    ("Lyon", "France"),
    ("Hamburg", "Germany"),
    ("Vancouver", "Canada"),
    ("Brighton", "United Kingdom"),
];

/// Deterministic identities when seeded; no network access
pub struct LocalSource {
    rng: Mutex<fastrand::Rng>,
}

impl LocalSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    fn identity(rng: &mut fastrand::Rng) -> User {
        let (first, gender) = FIRST_NAMES[rng.usize(..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.usize(..LAST_NAMES.len())];
        let (city, country) = PLACES[rng.usize(..PLACES.len())];
        let username = format!("{}{}", first.to_lowercase(), rng.u16(10..1000));

        let year = rng.i32(1975..=2003);
        let month = rng.u8(1..=12);
        let day = rng.u8(1..=28);
        let portrait = match gender {
            Gender::Female => "women",
            _ => "men",
        };

        User {
            id: uuid::Uuid::from_u128(rng.u128(..)).to_string(),
            email: format!("{}@example.com", username),
            username,
            full_name: format!("{} {}", first, last),
            gender: Some(gender),
            birth_date: Some(format!("{:04}-{:02}-{:02}", year, month, day)),
            bio: Some(format!(
                "Hi, I'm {}! I'm from {} and enjoy meeting new people.",
                first, city
            )),
            interests: random_interests(rng),
            location: Some(format!("{}, {}", city, country)),
            profile_photo: Some(format!(
                "https://randomuser.me/api/portraits/{}/{}.jpg",
                portrait,
                rng.u8(0..100)
            )),
            twitter_handle: None,
            instagram_handle: None,
            facebook_handle: None,
            match_score: None,
        }
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FixtureSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn identities(&self, count: usize) -> Result<Vec<User>, FixtureError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| FixtureError::Parse("fixture generator poisoned".to_string()))?;
        Ok((0..count).map(|_| Self::identity(&mut rng)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_source_is_deterministic() {
        let a = LocalSource::with_seed(42).identities(3).await.unwrap();
        let b = LocalSource::with_seed(42).identities(3).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[tokio::test]
    async fn test_identities_are_complete() {
        let users = LocalSource::with_seed(9).identities(10).await.unwrap();
        for user in users {
            assert!(!user.id.is_empty());
            assert!(user.email.ends_with("@example.com"));
            assert!(user.age().is_some());
            assert!((3..=7).contains(&user.interests.len()));
        }
    }
}
