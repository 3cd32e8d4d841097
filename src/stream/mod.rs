//! Chat Streaming
//!
//! One WebSocket per mounted chat page, at `{ws_url}/chat/{user_id}`.
//!
//! ## Architecture
//!
//! A spawned task owns the socket and multiplexes two directions with
//! `tokio::select!`:
//! - inbound text frames are parsed into [`Message`]s and forwarded on an
//!   unbounded channel
//! - [`OutgoingFrame`]s queued with [`ChatStream::send`] are written as JSON
//!
//! Dropping or closing the stream aborts the task.

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::models::{Message, OutgoingFrame};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("WebSocket connection failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Chat stream is closed")]
    Closed,
}

/// Inbound frame as the backend relays it
///
/// Frames are forwarded raw from the sender, so most fields may be missing.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    sender_id: String,
    #[serde(default)]
    receiver_id: Option<String>,
    content: String,
    #[serde(default, alias = "sent_at")]
    timestamp: Option<String>,
    #[serde(default, alias = "read")]
    is_read: bool,
}

impl From<InboundFrame> for Message {
    fn from(frame: InboundFrame) -> Self {
        Message {
            id: frame.id,
            sender_id: frame.sender_id,
            receiver_id: frame.receiver_id,
            content: frame.content,
            timestamp: frame.timestamp,
            is_read: frame.is_read,
        }
    }
}

/// Live chat connection for one user
pub struct ChatStream {
    user_id: String,
    outgoing: mpsc::UnboundedSender<OutgoingFrame>,
    incoming: mpsc::UnboundedReceiver<Message>,
    task: JoinHandle<()>,
}

impl ChatStream {
    pub fn url_for(ws_base: &str, user_id: &str) -> String {
        format!(
            "{}/chat/{}",
            ws_base.trim_end_matches('/'),
            urlencoding::encode(user_id)
        )
    }

    /// Open the stream for `user_id`
    pub async fn connect(ws_base: &str, user_id: &str) -> Result<Self, StreamError> {
        let url = Self::url_for(ws_base, user_id);
        let (socket, _response) = connect_async(url.as_str()).await?;
        tracing::info!(url = %url, "Chat stream connected");

        let (mut sink, mut source) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<OutgoingFrame>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<Message>();
        let owner = user_id.to_string();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    inbound = source.next() => {
                        match inbound {
                            Some(Ok(WsMessage::Text(text))) => {
                                match serde_json::from_str::<InboundFrame>(&text) {
                                    Ok(frame) => {
                                        if in_tx.send(frame.into()).is_err() {
                                            break;
                                        }
                                    }
                                    Err(e) => {
                                        tracing::debug!(error = %e, text = %text, "Ignoring malformed chat frame");
                                    }
                                }
                            }
                            Some(Ok(WsMessage::Close(_))) | None => {
                                tracing::debug!(user_id = %owner, "Chat stream closed by server");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::warn!(user_id = %owner, error = %e, "Chat stream receive error");
                                break;
                            }
                        }
                    }
                    outbound = out_rx.recv() => {
                        let Some(frame) = outbound else {
                            let _ = sink.send(WsMessage::Close(None)).await;
                            break;
                        };
                        match serde_json::to_string(&frame) {
                            Ok(text) => {
                                if let Err(e) = sink.send(WsMessage::Text(text)).await {
                                    tracing::warn!(user_id = %owner, error = %e, "Chat stream send failed");
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to serialize chat frame");
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            user_id: user_id.to_string(),
            outgoing: out_tx,
            incoming: in_rx,
            task,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Queue a frame for `receiver_id`
    ///
    /// The chat page posts messages over REST so it gets the stored message
    /// back; this is for callers that talk to the socket directly, such as a
    /// second client relaying through the backend.
    pub fn send(&self, receiver_id: &str, content: &str) -> Result<(), StreamError> {
        let frame = OutgoingFrame {
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
        };
        self.outgoing.send(frame).map_err(|_| StreamError::Closed)
    }

    /// Next buffered inbound message, without waiting
    pub fn try_recv(&mut self) -> Option<Message> {
        self.incoming.try_recv().ok()
    }

    /// Wait for the next inbound message; `None` once the stream has ended
    pub async fn recv(&mut self) -> Option<Message> {
        self.incoming.recv().await
    }

    pub fn is_open(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn close(self) {
        tracing::debug!(user_id = %self.user_id, "Closing chat stream");
        // Drop aborts the task
    }
}

impl Drop for ChatStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(
            ChatStream::url_for("ws://localhost:8000/api/v1/ws/", "u 1"),
            "ws://localhost:8000/api/v1/ws/chat/u%201"
        );
    }

    #[test]
    fn test_inbound_frame_without_sender() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"receiver_id": "me", "content": "hi"}"#).unwrap();
        let message: Message = frame.into();
        assert_eq!(message.sender_id, "");
        assert_eq!(message.content, "hi");
        assert_eq!(message.receiver_id.as_deref(), Some("me"));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let result = ChatStream::connect("ws://127.0.0.1:9", "u1").await;
        assert!(matches!(result, Err(StreamError::Connect(_))));
    }
}
