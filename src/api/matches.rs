//! Matching endpoints

use super::client::{ApiClient, Body};
use super::endpoint::Endpoint;
use super::error::ApiResult;
use crate::models::{Ack, Candidate, MatchedUser};

impl ApiClient {
    pub async fn recommendations(&self) -> ApiResult<Vec<Candidate>> {
        self.call(Endpoint::Recommendations, Body::Empty).await
    }

    pub async fn my_matches(&self) -> ApiResult<Vec<MatchedUser>> {
        self.call(Endpoint::MyMatches, Body::Empty).await
    }

    pub async fn like(&self, user_id: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::Like {
            user_id: user_id.to_string(),
        };
        self.call(endpoint, Body::Empty).await
    }

    pub async fn reject(&self, user_id: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::Reject {
            user_id: user_id.to_string(),
        };
        self.call(endpoint, Body::Empty).await
    }

    pub async fn accept(&self, user_id: &str) -> ApiResult<Ack> {
        let endpoint = Endpoint::Accept {
            user_id: user_id.to_string(),
        };
        self.call(endpoint, Body::Empty).await
    }
}
