//! Chat screen
//!
//! Conversations are the user's matches. Selecting one replaces the message
//! list with its history. While mounted, the page holds a live stream whose
//! inbound messages are appended in arrival order.

use super::Page;
use crate::app::{AppContext, AppError};
use crate::models::{initials, truncate, MatchedUser, Message};
use crate::navigation::Route;
use crate::stream::ChatStream;

#[derive(Default)]
pub struct ChatPage {
    me: Option<String>,
    conversations: Vec<MatchedUser>,
    selected: Option<String>,
    messages: Vec<Message>,
    pub input: String,
    is_loading: bool,
    stream: Option<ChatStream>,
}

impl ChatPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[MatchedUser] {
        &self.conversations
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(ChatStream::is_open)
    }

    /// Show the loading state until conversations arrive
    pub fn mark_loading(&mut self) {
        self.is_loading = true;
    }

    /// Open the stream for the signed-in user and load conversations
    pub async fn mount(&mut self, ctx: &AppContext) -> Result<(), AppError> {
        let user = match ctx.require_user().await {
            Ok(user) => user,
            Err(e) => {
                self.is_loading = false;
                return Err(e);
            }
        };

        match ChatStream::connect(&ctx.config.api.ws_url, &user.id).await {
            Ok(stream) => self.stream = Some(stream),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Live chat unavailable");
            }
        }
        self.me = Some(user.id);

        self.load_conversations(ctx).await;
        Ok(())
    }

    /// Close the stream
    pub fn unmount(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }

    /// Load matches as conversations; the first is selected if none is
    pub async fn load_conversations(&mut self, ctx: &AppContext) {
        self.is_loading = true;
        let result = ctx.api.my_matches().await;
        self.is_loading = false;

        match result {
            Ok(conversations) => {
                self.conversations = conversations;
                if self.selected.is_none() {
                    if let Some(first) = self.conversations.first().map(|c| c.id.clone()) {
                        self.select(ctx, &first).await;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load conversations");
                ctx.toasts.error("Failed to load conversations");
            }
        }
    }

    /// Switch to `user_id`'s conversation and mark it read
    pub async fn select(&mut self, ctx: &AppContext, user_id: &str) {
        self.selected = Some(user_id.to_string());
        self.messages.clear();

        match ctx.api.chat_history(user_id).await {
            Ok(messages) => self.messages = messages,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load chat history");
                ctx.toasts.error("Failed to load messages");
                return;
            }
        }

        match ctx.api.mark_read(user_id).await {
            Ok(count) => tracing::debug!(user_id = %user_id, count, "Marked messages read"),
            Err(e) => tracing::debug!(user_id = %user_id, error = %e, "Mark-read failed"),
        }
    }

    /// Post the input to the selected conversation
    ///
    /// Does nothing without a selection or with blank input. On success the
    /// returned message is appended and the input cleared.
    pub async fn send(&mut self, ctx: &AppContext) -> bool {
        let Some(receiver) = self.selected.clone() else {
            return false;
        };
        if self.input.trim().is_empty() {
            return false;
        }

        match ctx.api.send_message(&receiver, &self.input).await {
            Ok(message) => {
                self.messages.push(message);
                self.input.clear();
                true
            }
            Err(e) => {
                tracing::warn!(receiver_id = %receiver, error = %e, "Failed to send message");
                ctx.toasts.error(e.user_message("Failed to send message"));
                false
            }
        }
    }

    /// Append whatever the stream has buffered; returns how many arrived
    pub fn poll_stream(&mut self) -> usize {
        let Some(stream) = self.stream.as_mut() else {
            return 0;
        };
        let mut arrived = 0;
        while let Some(message) = stream.try_recv() {
            self.messages.push(message);
            arrived += 1;
        }
        arrived
    }

    /// Wait for the next streamed message and append it
    ///
    /// Pends forever when no stream is open.
    pub async fn next_inbound(&mut self) -> Option<Message> {
        let message = match self.stream.as_mut() {
            Some(stream) => stream.recv().await,
            None => std::future::pending().await,
        };
        match message {
            Some(message) => {
                self.messages.push(message.clone());
                Some(message)
            }
            None => {
                tracing::info!("Chat stream ended");
                self.stream = None;
                None
            }
        }
    }

    fn counterpart_name(&self) -> Option<&str> {
        let selected = self.selected.as_deref()?;
        self.conversations
            .iter()
            .find(|c| c.id == selected)
            .map(|c| c.full_name.as_str())
    }
}

impl Drop for ChatPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Page for ChatPage {
    fn route(&self) -> Route {
        Route::Chat
    }

    fn render(&self) -> String {
        if self.is_loading {
            return "Loading conversations...".to_string();
        }
        if self.conversations.is_empty() {
            return "No conversations yet\nStart matching with people to begin chatting!".to_string();
        }

        let mut out = String::from("Conversations:\n");
        for conv in &self.conversations {
            let marker = if self.selected.as_deref() == Some(conv.id.as_str()) {
                ">"
            } else {
                " "
            };
            out.push_str(&format!("{} [{}] {}", marker, initials(&conv.full_name), conv.full_name));
            if let Some(last) = &conv.last_message {
                out.push_str(&format!(" - {}", truncate(&last.content, 40)));
            }
            out.push('\n');
        }

        if let Some(name) = self.counterpart_name() {
            out.push_str(&format!("\n-- {} --\n", name));
            let me = self.me.as_deref().unwrap_or_default();
            for message in &self.messages {
                let who = if message.is_from(me) { "You" } else { name };
                let time = message.time_label();
                if time.is_empty() {
                    out.push_str(&format!("{}: {}\n", who, message.content));
                } else {
                    out.push_str(&format!("[{}] {}: {}\n", time, who, message.content));
                }
            }
        }
        out.trim_end().to_string()
    }
}
