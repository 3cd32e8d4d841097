//! Matches screen

use super::{age_label, Page};
use crate::app::AppContext;
use crate::models::{truncate, MatchedUser};
use crate::navigation::Route;

#[derive(Debug, Default)]
pub struct MatchesPage {
    matches: Vec<MatchedUser>,
    is_loading: bool,
}

impl MatchesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[MatchedUser] {
        &self.matches
    }

    pub fn mark_loading(&mut self) {
        self.is_loading = true;
    }

    pub async fn load(&mut self, ctx: &AppContext) {
        self.is_loading = true;
        match ctx.api.my_matches().await {
            Ok(matches) => {
                if matches.is_empty() {
                    ctx.toasts.info(
                        "You haven't liked anyone yet or all your likes have been responded to.",
                    );
                }
                self.matches = matches;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load matches");
                self.matches.clear();
                ctx.toasts.error("Failed to load your likes");
            }
        }
        self.is_loading = false;
    }

    pub async fn refresh(&mut self, ctx: &AppContext) {
        self.load(ctx).await;
    }

    /// Accept a pending like from `user_id`
    pub async fn accept(&mut self, ctx: &AppContext, user_id: &str) -> bool {
        match ctx.api.accept(user_id).await {
            Ok(_) => {
                ctx.toasts.success("Match accepted!");
                true
            }
            Err(e) => {
                ctx.toasts.error(e.user_message("Failed to accept match"));
                false
            }
        }
    }
}

impl Page for MatchesPage {
    fn route(&self) -> Route {
        Route::Matches
    }

    fn render(&self) -> String {
        if self.is_loading {
            return "Loading your matches...".to_string();
        }
        if self.matches.is_empty() {
            return "No matches yet".to_string();
        }

        self.matches
            .iter()
            .map(|m| {
                let mut line = format!("{}{}", m.full_name, age_label(m.age()));
                if let Some(score) = m.match_score {
                    line.push_str(&format!("  [{}%]", (score.clamp(0.0, 1.0) * 100.0).round()));
                }
                if let Some(message) = &m.last_message {
                    line.push_str(&format!("\n    {}", truncate(&message.content, 60)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
