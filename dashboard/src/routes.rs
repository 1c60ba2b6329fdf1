//! The dashboard's views and how to move between them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The root view: video, comments and notes, or the sign-in prompt.
    Dashboard,
    /// Where the OAuth provider sends the browser back to.
    Callback,
    /// The audit log.
    Events,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Callback => "/callback",
            Route::Events => "/events",
        }
    }
}

/// Switches the active view.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// A navigator that just remembers where it was sent.
#[derive(Debug, Default, Clone)]
pub struct History {
    visited: Vec<Route>,
}

impl History {
    /// The most recent navigation target, if there was one.
    pub fn current(&self) -> Option<Route> {
        self.visited.last().copied()
    }

    pub fn visited(&self) -> &[Route] {
        &self.visited
    }
}

impl Navigator for History {
    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = route.path(), "navigating");
        self.visited.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_tracks_latest_route() {
        let mut history = History::default();
        assert_eq!(history.current(), None);
        history.navigate(Route::Callback);
        history.navigate(Route::Dashboard);
        assert_eq!(history.current(), Some(Route::Dashboard));
        assert_eq!(history.visited(), [Route::Callback, Route::Dashboard]);
        assert_eq!(Route::Events.path(), "/events");
    }
}
