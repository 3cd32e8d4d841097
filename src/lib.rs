//! # SammySwipe
//!
//! Terminal client for the SammySwipe dating service: discover people, match,
//! chat, and manage a profile against the SammySwipe REST backend.
//!
//! ## Modules
//!
//! - [`api`]: REST client with bearer auth and 401 interception
//! - [`session`]: persisted token, shared session state, auth operations
//! - [`fixtures`]: random identities backing superuser mode
//! - [`stream`]: live chat over WebSocket
//! - [`pages`]: view models for each screen
//! - [`app`]: the context handed to every page
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sammyswipe::app::AppContext;
//! use sammyswipe::config::Config;
//! use sammyswipe::pages::{DiscoverPage, LoginPage, Page};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::from_config(Config::load_default())?;
//!     ctx.start().await;
//!
//!     let mut login = LoginPage::with_credentials("ana@example.com", "secret");
//!     if login.submit(&ctx).await {
//!         let mut discover = DiscoverPage::new();
//!         discover.load(&ctx).await;
//!         println!("{}", discover.render());
//!     }
//!
//!     ctx.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod stream;
pub mod toast;
