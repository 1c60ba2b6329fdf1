//! Client for the dashboard backend's REST API.
//!
//! The backend brokers everything the dashboard does with YouTube and keeps the user's
//! notes and an audit log of past actions. It exposes five resource groups:
//!
//! | Group    | Operations |
//! |----------|------------|
//! | auth     | [`ApiClient::get_auth_url`], [`ApiClient::exchange_code`] |
//! | video    | [`ApiClient::get_video`], [`ApiClient::update_video`] |
//! | comments | [`ApiClient::get_comments`], [`ApiClient::add_comment`], [`ApiClient::delete_comment`] |
//! | notes    | [`ApiClient::get_notes`], [`ApiClient::create_note`], [`ApiClient::update_note`], [`ApiClient::delete_note`] |
//! | events   | [`ApiClient::get_events`], [`ApiClient::all_events`] |
//!
//! Every response is an [`Envelope`]. A call fails with [`ApiError`] only when no
//! envelope could be obtained; `success: false` is returned as-is so that callers can
//! decide what it means for them (see [`Envelope::ensure_success`] and
//! [`Envelope::into_data`]).

pub mod auth;
pub mod client;
pub mod comments;
pub mod error;
pub mod events;
pub mod notes;
pub mod types;
pub mod videos;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiClient, CodeExchange, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorKind};
pub use types::{Envelope, NoExtra, PagedStream, Pagination};

pub use auth::{AuthUrlFields, AuthUrlResponse, TokenExchange, TokenFields};
pub use comments::{Comment, CommentSnippet, CommentThread, NewComment};
pub use events::{Event, EventFilters};
pub use notes::{Note, NoteFilters, NoteInput};
pub use videos::{Video, VideoSnippet, VideoStatistics, VideoUpdate};

/// Filter values that are missing or whitespace-only are not sent.
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
