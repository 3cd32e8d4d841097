//! Navigation
//!
//! The active screen, shared between the pages and the HTTP layer (which forces
//! the login screen when the backend rejects the session).

use tokio::sync::watch;

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Discover,
    Matches,
    Chat,
    Profile,
    Video,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Discover => "/dashboard/discover",
            Route::Matches => "/dashboard/matches",
            Route::Chat => "/dashboard/chat",
            Route::Profile => "/dashboard/profile",
            Route::Video => "/dashboard/video",
        }
    }

    /// Screens that require a signed-in user
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// Cheap-to-clone handle on the current route
#[derive(Clone)]
pub struct Navigator {
    tx: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Route {
        *self.tx.borrow()
    }

    pub fn navigate(&self, route: Route) {
        let previous = self.tx.send_replace(route);
        if previous != route {
            tracing::debug!(from = previous.path(), to = route.path(), "Navigated");
        }
    }

    /// Receive every subsequent route change
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}
