//! Discover screen: one candidate at a time

use super::{age_label, Page};
use crate::app::AppContext;
use crate::models::{parse_birth_date, calculate_age, truncate, Candidate};
use crate::navigation::Route;

#[derive(Debug, Default)]
pub struct DiscoverPage {
    candidates: Vec<Candidate>,
    is_loading: bool,
}

impl DiscoverPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn current(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Show the loading state until the next `load` finishes
    pub fn mark_loading(&mut self) {
        self.is_loading = true;
    }

    /// Fetch recommendations, replacing the list
    pub async fn load(&mut self, ctx: &AppContext) {
        self.is_loading = true;
        match ctx.api.recommendations().await {
            Ok(candidates) => {
                tracing::debug!(count = candidates.len(), "Recommendations loaded");
                self.candidates = candidates;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load recommendations");
                self.candidates.clear();
                ctx.toasts.error("Failed to load potential matches");
            }
        }
        self.is_loading = false;
    }

    pub async fn refresh(&mut self, ctx: &AppContext) {
        self.load(ctx).await;
    }

    /// Like `user_id`; it leaves the list only once the backend accepted it
    pub async fn like(&mut self, ctx: &AppContext, user_id: &str) -> bool {
        match ctx.api.like(user_id).await {
            Ok(_) => {
                self.remove(user_id);
                ctx.toasts
                    .success("You liked this person! View them in your Matches tab.");
                true
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Like failed");
                ctx.toasts.error("Failed to like this person");
                false
            }
        }
    }

    /// Pass on `user_id` without telling the backend
    pub fn skip(&mut self, user_id: &str) -> bool {
        self.remove(user_id)
    }

    pub async fn reject(&mut self, ctx: &AppContext, user_id: &str) -> bool {
        match ctx.api.reject(user_id).await {
            Ok(_) => {
                self.remove(user_id);
                true
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Reject failed");
                ctx.toasts.error("Failed to reject this person");
                false
            }
        }
    }

    /// Remove the first candidate with `user_id`, keeping the others in order
    fn remove(&mut self, user_id: &str) -> bool {
        match self.candidates.iter().position(|c| c.id == user_id) {
            Some(index) => {
                self.candidates.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Page for DiscoverPage {
    fn route(&self) -> Route {
        Route::Discover
    }

    fn render(&self) -> String {
        if self.is_loading {
            return "Finding people for you...".to_string();
        }
        let Some(candidate) = self.current() else {
            return "No more matches\nCheck back later or refresh to see new people.".to_string();
        };

        let age = candidate
            .birth_date
            .as_deref()
            .and_then(parse_birth_date)
            .map(calculate_age);

        let mut out = format!(
            "{}{}  [{}% match]\n",
            candidate.full_name,
            age_label(age),
            candidate.score_percent()
        );
        if let Some(location) = &candidate.location {
            out.push_str(&format!("{}\n", location));
        }
        if let Some(bio) = &candidate.bio {
            out.push_str(&format!("{}\n", truncate(bio, 160)));
        }
        if !candidate.interests.is_empty() {
            out.push_str(&format!("Interests: {}\n", candidate.interests.join(", ")));
        }
        if !candidate.common_topics.is_empty() {
            out.push_str(&format!("In common: {}\n", candidate.common_topics.join(", ")));
        }
        let remaining = self.candidates.len() - 1;
        if remaining > 0 {
            out.push_str(&format!("({} more)", remaining));
        }
        out.trim_end().to_string()
    }
}
