//! Toast Notifications
//!
//! Transient success, info and error messages. Errors are also logged.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SUCCESS_TTL: Duration = Duration::from_millis(3000);
const INFO_TTL: Duration = Duration::from_millis(4000);
const ERROR_TTL: Duration = Duration::from_millis(5000);
const MAX_TOASTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Info => "ℹ",
            ToastKind::Error => "✕",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    created_at: Instant,
    ttl: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.ttl
    }
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Shared toast queue
#[derive(Clone, Default)]
pub struct Toasts {
    items: Arc<Mutex<VecDeque<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into(), SUCCESS_TTL);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into(), INFO_TTL);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(toast = %message, "Error shown to user");
        self.push(ToastKind::Error, message, ERROR_TTL);
    }

    fn push(&self, kind: ToastKind, message: String, ttl: Duration) {
        let mut items = self.lock();
        if items.len() == MAX_TOASTS {
            items.pop_front();
        }
        items.push_back(Toast {
            kind,
            message,
            created_at: Instant::now(),
            ttl,
        });
    }

    /// Toasts that have not expired yet
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut items = self.lock();
        items.retain(|t| !t.is_expired(now));
        items.iter().cloned().collect()
    }

    /// Remove and return everything queued, expired or not
    pub fn drain(&self) -> Vec<Toast> {
        self.lock().drain(..).collect()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.lock().back().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Toast>> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_order_and_drain() {
        let toasts = Toasts::new();
        toasts.success("Saved");
        toasts.error("Failed to load potential matches");

        let latest = toasts.latest().unwrap();
        assert_eq!(latest.kind, ToastKind::Error);
        assert_eq!(latest.to_string(), "✕ Failed to load potential matches");

        let drained = toasts.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "Saved");
        assert!(toasts.active().is_empty());
    }

    #[test]
    fn test_expiry() {
        let toasts = Toasts::new();
        toasts.success("Saved");
        let toast = toasts.latest().unwrap();
        assert!(!toast.is_expired(Instant::now()));
        assert!(toast.is_expired(Instant::now() + SUCCESS_TTL));
    }

    #[test]
    fn test_capacity() {
        let toasts = Toasts::new();
        for i in 0..(MAX_TOASTS + 3) {
            toasts.info(format!("note {}", i));
        }
        let all = toasts.drain();
        assert_eq!(all.len(), MAX_TOASTS);
        assert_eq!(all[0].message, "note 3");
    }
}
