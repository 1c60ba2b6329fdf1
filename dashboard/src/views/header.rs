//! The bar at the top of every view, with navigation and the connection status.

use crate::notifications::Notifier;
use crate::routes::Route;
use crate::session::{Session, SessionStore};
use crate::storage::TokenStorage;

pub const TITLE: &str = "YouTube Dashboard";

const NAVIGATION: [(&str, Route); 2] = [("Dashboard", Route::Dashboard), ("Events", Route::Events)];

/// The title line, navigation and connection badge.
pub fn render(session: &Session, active: Route) -> String {
    let nav = NAVIGATION
        .iter()
        .map(|(label, route)| {
            if *route == active {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let badge = if session.is_authenticated() {
        "● Connected"
    } else {
        "○ Disconnected"
    };
    format!("{TITLE}  {nav}  {badge}")
}

/// The header's Disconnect action.
///
/// Returns whether the session is now signed out.
pub fn disconnect<S: TokenStorage>(store: &mut SessionStore<S>, notifier: &mut impl Notifier) -> bool {
    match store.logout() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("disconnect failed: {e:#}");
            notifier.error(format!("Failed to disconnect: {e}"));
            !store.is_authenticated()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AccessToken;
    use crate::notifications::CollectingNotifier;
    use crate::storage::MemoryStorage;

    #[test]
    fn badge_follows_session() {
        let mut store = SessionStore::initialize(MemoryStorage::new());
        insta::assert_snapshot!(
            render(store.session(), Route::Dashboard),
            @"YouTube Dashboard  [Dashboard]  Events   ○ Disconnected"
        );

        store.login(AccessToken::new("tok1").unwrap()).unwrap();
        insta::assert_snapshot!(
            render(store.session(), Route::Events),
            @"YouTube Dashboard   Dashboard  [Events]  ● Connected"
        );

        let mut notifier = CollectingNotifier::default();
        assert!(disconnect(&mut store, &mut notifier));
        assert!(!store.is_authenticated());
        assert!(notifier.notifications.is_empty());
    }
}
