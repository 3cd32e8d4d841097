//! Video call placeholder. No media is captured or sent.

use super::Page;
use crate::navigation::Route;

#[derive(Debug, Default)]
pub struct VideoPage {
    peer: Option<String>,
    is_call_active: bool,
    is_muted: bool,
}

impl VideoPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_call_active(&self) -> bool {
        self.is_call_active
    }

    pub fn start_call(&mut self, peer: Option<String>) {
        tracing::debug!(peer = ?peer, "Video call started");
        self.peer = peer;
        self.is_call_active = true;
        self.is_muted = false;
    }

    pub fn end_call(&mut self) {
        if self.is_call_active {
            tracing::debug!("Video call ended");
        }
        self.is_call_active = false;
        self.peer = None;
    }

    /// Returns the new muted state; no-op outside a call
    pub fn toggle_mute(&mut self) -> bool {
        if self.is_call_active {
            self.is_muted = !self.is_muted;
        }
        self.is_muted
    }
}

impl Page for VideoPage {
    fn route(&self) -> Route {
        Route::Video
    }

    fn render(&self) -> String {
        if !self.is_call_active {
            return "Video chat\nStart a call to connect face to face.".to_string();
        }
        let peer = self.peer.as_deref().unwrap_or("your match");
        let mic = if self.is_muted { "muted" } else { "on" };
        format!("In a call with {} (microphone {})", peer, mic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_lifecycle() {
        let mut page = VideoPage::new();
        assert!(!page.toggle_mute());

        page.start_call(Some("Ana".into()));
        assert!(page.is_call_active());
        assert!(page.toggle_mute());
        assert!(page.render().contains("Ana"));

        page.end_call();
        assert!(!page.is_call_active());
        assert!(page.render().starts_with("Video chat"));
    }
}
