//! Fixture Data
//!
//! Random identities used to fabricate endpoint-shaped payloads when the
//! session runs in superuser mode. Two sources are available:
//! - `randomuser`: the public randomuser.me generator
//! - `local`: a deterministic offline generator

mod local;
mod random_user;
mod responder;

pub use local::LocalSource;
pub use random_user::RandomUserSource;
pub use responder::MockResponder;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{FixtureSourceKind, FixturesConfig};
use crate::models::User;

/// Interests assigned to fabricated identities
pub const INTERESTS: [&str; 25] = [
    "Travel",
    "Photography",
    "Cooking",
    "Fitness",
    "Reading",
    "Art",
    "Music",
    "Movies",
    "Gaming",
    "Technology",
    "Fashion",
    "Hiking",
    "Yoga",
    "Dancing",
    "Writing",
    "Swimming",
    "Running",
    "Cycling",
    "Skiing",
    "Climbing",
    "Food",
    "Coffee",
    "Wine",
    "Beer",
    "Cocktails",
];

pub const MIN_INTERESTS: usize = 3;
pub const MAX_INTERESTS: usize = 7;

/// A source of random user identities
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce `count` identities
    async fn identities(&self, count: usize) -> Result<Vec<User>, FixtureError>;
}

/// Errors raised while producing fixture data
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Fixture source unavailable")]
    Unavailable,

    #[error("Fixture request timed out")]
    Timeout,

    #[error("Fixture request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Fixture source returned status {0}")]
    Status(u16),

    #[error("Invalid fixture payload: {0}")]
    Parse(String),
}

/// Pick between 3 and 7 distinct interests
pub fn random_interests(rng: &mut fastrand::Rng) -> Vec<String> {
    let mut pool: Vec<&str> = INTERESTS.to_vec();
    rng.shuffle(&mut pool);
    let count = rng.usize(MIN_INTERESTS..=MAX_INTERESTS);
    pool.into_iter().take(count).map(str::to_string).collect()
}

/// Build the responder configured for this run
pub fn responder_from_config(config: &FixturesConfig) -> Result<MockResponder, FixtureError> {
    let primary: Arc<dyn FixtureSource> = match config.source {
        FixtureSourceKind::RandomUser => Arc::new(RandomUserSource::new(
            &config.random_user_url,
            config.nationalities.clone(),
        )?),
        FixtureSourceKind::Local => Arc::new(LocalSource::new()),
    };
    tracing::debug!(source = primary.name(), count = config.count, "Fixture source ready");
    Ok(MockResponder::new(primary, config.count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_interests_bounds() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let interests = random_interests(&mut rng);
            assert!((MIN_INTERESTS..=MAX_INTERESTS).contains(&interests.len()));

            let mut unique = interests.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), interests.len());
            assert!(interests.iter().all(|i| INTERESTS.contains(&i.as_str())));
        }
    }

    #[test]
    fn test_local_source_from_config() {
        let config = FixturesConfig {
            source: FixtureSourceKind::Local,
            ..FixturesConfig::default()
        };
        let responder = responder_from_config(&config).unwrap();
        assert_eq!(responder.source_name(), "local");
    }
}
