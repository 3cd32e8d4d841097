//! SammySwipe REST API Client
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/token` - Exchange credentials for a token (form-encoded)
//! - `POST /auth/register` - Create an account
//!
//! ## Users
//! - `GET /users/me` - Current profile
//! - `PUT /users/me` - Update profile
//! - `POST /users/me/photo` - Upload a photo (multipart)
//! - `PUT /users/me/preferences` - Update matching preferences
//!
//! ## Matches
//! - `GET /matches/recommendations` - Candidates
//! - `GET /matches/my-matches` - Accepted matches
//! - `POST /matches/:id` - Like
//! - `PUT /matches/:id/reject` - Reject
//! - `PUT /matches/:id/accept` - Accept
//!
//! ## Chat
//! - `GET /chat/:id/history` - Conversation history
//! - `POST /chat/:id` - Send a message
//! - `PUT /chat/:id/mark-read` - Mark received messages read
//!
//! ## Health
//! - `GET /health`

mod auth;
mod chat;
pub mod client;
pub mod endpoint;
pub mod error;
mod matches;
mod users;

pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use error::{ApiError, ApiResult};
