//! randomuser.me source

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{random_interests, FixtureError, FixtureSource};
use crate::models::{Gender, User};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Identities fetched from the randomuser.me generator
pub struct RandomUserSource {
    client: Client,
    url: String,
    nationalities: Vec<String>,
}

impl RandomUserSource {
    pub fn new(url: &str, nationalities: Vec<String>) -> Result<Self, FixtureError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            nationalities,
        })
    }

    fn request_url(&self, count: usize) -> String {
        let mut url = format!("{}?results={}", self.url, count);
        if !self.nationalities.is_empty() {
            url.push_str("&nat=");
            url.push_str(&self.nationalities.join(","));
        }
        url
    }
}

#[async_trait]
impl FixtureSource for RandomUserSource {
    fn name(&self) -> &str {
        "randomuser"
    }

    async fn identities(&self, count: usize) -> Result<Vec<User>, FixtureError> {
        let url = self.request_url(count);
        tracing::debug!(url = %url, "Fetching random identities");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FixtureError::Timeout
            } else if e.is_connect() {
                FixtureError::Unavailable
            } else {
                FixtureError::Request(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(FixtureError::Status(response.status().as_u16()));
        }

        let page: RandomUserPage = response
            .json()
            .await
            .map_err(|e| FixtureError::Parse(e.to_string()))?;

        let mut rng = fastrand::Rng::new();
        Ok(page
            .results
            .into_iter()
            .map(|person| reshape(person, &mut rng))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RandomUserPage {
    results: Vec<RandomPerson>,
}

#[derive(Debug, Deserialize)]
struct RandomPerson {
    login: Login,
    name: Name,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    email: String,
    dob: Dob,
    location: Location,
    picture: Picture,
}

#[derive(Debug, Deserialize)]
struct Login {
    uuid: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct Name {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct Dob {
    date: String,
}

#[derive(Debug, Deserialize)]
struct Location {
    city: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct Picture {
    large: String,
}

fn reshape(person: RandomPerson, rng: &mut fastrand::Rng) -> User {
    let bio = format!(
        "Hi, I'm {}! I'm from {} and enjoy meeting new people.",
        person.name.first, person.location.city
    );

    User {
        id: person.login.uuid,
        email: person.email,
        username: person.login.username,
        full_name: format!("{} {}", person.name.first, person.name.last),
        gender: person.gender.parse::<Gender>().ok(),
        birth_date: Some(person.dob.date),
        bio: Some(bio),
        interests: random_interests(rng),
        location: Some(format!("{}, {}", person.location.city, person.location.country)),
        profile_photo: Some(person.picture.large),
        twitter_handle: None,
        instagram_handle: None,
        facebook_handle: None,
        match_score: None,
    }
}
