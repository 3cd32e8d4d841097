//! Chat endpoints

use super::client::{ApiClient, Body};
use super::endpoint::Endpoint;
use super::error::{ApiError, ApiResult};
use crate::models::chat::{MarkReadResponse, SendMessageRequest};
use crate::models::Message;

impl ApiClient {
    pub async fn chat_history(&self, user_id: &str) -> ApiResult<Vec<Message>> {
        let endpoint = Endpoint::ChatHistory {
            user_id: user_id.to_string(),
        };
        self.call(endpoint, Body::Empty).await
    }

    pub async fn send_message(&self, user_id: &str, content: &str) -> ApiResult<Message> {
        let body = serde_json::to_value(SendMessageRequest { content })
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let endpoint = Endpoint::SendMessage {
            user_id: user_id.to_string(),
        };
        self.call(endpoint, Body::Json(body)).await
    }

    /// Mark everything `user_id` sent to the current user as read
    pub async fn mark_read(&self, user_id: &str) -> ApiResult<u64> {
        let endpoint = Endpoint::MarkRead {
            user_id: user_id.to_string(),
        };
        let response: MarkReadResponse = self.call(endpoint, Body::Empty).await?;
        Ok(response.messages_marked_read)
    }
}
