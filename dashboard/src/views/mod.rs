//! What the user sees.
//!
//! Each view loads what it needs from the backend, renders it as text, and performs the
//! user's actions. Views never fail: every error is caught at the action that caused it,
//! logged, and turned into a single error notification, after which the view shows an
//! empty or error state.

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod events;
pub mod format;
pub mod header;
pub mod notes;
pub mod video;

use crate::api::{ApiError, Envelope};
use crate::credentials::AccessToken;
use crate::notifications::Notifier;
use crate::session::Session;

/// Shown instead of calling the backend when an action needs a signed-in user.
pub const NOT_CONNECTED_MESSAGE: &str = "Connect your YouTube account first";

/// The payload of a fetch, or `None` after notifying `failure`.
fn fetched<T, X>(
    result: Result<Envelope<T, X>, ApiError>,
    failure: &str,
    notifier: &mut impl Notifier,
) -> Option<T> {
    match result.and_then(Envelope::into_data) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(error = %e, "{failure}");
            notifier.error(failure);
            None
        }
    }
}

/// Notifies the outcome of a mutation and returns whether it succeeded.
fn completed<T, X>(
    result: Result<Envelope<T, X>, ApiError>,
    success: &str,
    failure: &str,
    notifier: &mut impl Notifier,
) -> bool {
    match result.and_then(Envelope::ensure_success) {
        Ok(_) => {
            notifier.success(success);
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "{failure}");
            notifier.error(failure);
            false
        }
    }
}

/// The session's token, or a notification saying there isn't one.
fn require_token<'s>(session: &'s Session, notifier: &mut impl Notifier) -> Option<&'s AccessToken> {
    let token = session.access_token();
    if token.is_none() {
        notifier.error(NOT_CONNECTED_MESSAGE);
    }
    token
}
