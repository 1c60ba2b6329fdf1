//! The comments section under the video.

use super::{completed, fetched, format, require_token};
use crate::api::{ApiClient, Comment, CommentThread, NewComment};
use crate::notifications::Notifier;
use crate::session::Session;
use std::fmt::Write;

/// Longest comment the composer accepts, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch comments";
pub const ADDED_MESSAGE: &str = "Comment added successfully";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add comment";
pub const REPLIED_MESSAGE: &str = "Reply added successfully";
pub const REPLY_FAILED_MESSAGE: &str = "Failed to add reply";
pub const DELETED_MESSAGE: &str = "Comment deleted successfully";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete comment";
pub const NOT_DELETABLE_MESSAGE: &str = "You can't delete this comment";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidComment {
    #[error("Comment cannot be empty")]
    Empty,
    #[error("Comment is {chars} characters long; the limit is {MAX_COMMENT_CHARS}")]
    TooLong { chars: usize },
}

/// Checks a comment or reply before it is sent.
pub fn validate(text: &str) -> Result<(), InvalidComment> {
    if text.trim().is_empty() {
        return Err(InvalidComment::Empty);
    }
    let chars = text.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(InvalidComment::TooLong { chars });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CommentsPanel {
    video_id: String,
    threads: Vec<CommentThread>,
}

impl CommentsPanel {
    pub async fn load(api: &ApiClient, video_id: &str, notifier: &mut impl Notifier) -> Self {
        let mut panel = Self {
            video_id: video_id.to_string(),
            threads: Vec::new(),
        };
        panel.refresh(api, notifier).await;
        panel
    }

    pub fn threads(&self) -> &[CommentThread] {
        &self.threads
    }

    /// Looks up a loaded comment or reply by id.
    pub fn comment(&self, id: &str) -> Option<&Comment> {
        self.threads
            .iter()
            .flat_map(|thread| std::iter::once(thread.top_level()).chain(thread.replies()))
            .find(|comment| comment.id == id)
    }

    pub async fn refresh(&mut self, api: &ApiClient, notifier: &mut impl Notifier) {
        let result = api.get_comments(&self.video_id).await;
        self.threads = fetched(result, FETCH_FAILED_MESSAGE, notifier).unwrap_or_default();
    }

    /// Posts a new top-level comment.
    pub async fn add_comment(
        &mut self,
        api: &ApiClient,
        session: &Session,
        text: &str,
        notifier: &mut impl Notifier,
    ) -> bool {
        let comment = NewComment::top_level(text);
        self.post(api, session, comment, (ADDED_MESSAGE, ADD_FAILED_MESSAGE), notifier)
            .await
    }

    /// Replies to the top-level comment `parent_id`.
    pub async fn reply(
        &mut self,
        api: &ApiClient,
        session: &Session,
        parent_id: &str,
        text: &str,
        notifier: &mut impl Notifier,
    ) -> bool {
        let comment = NewComment::reply(parent_id, text);
        self.post(api, session, comment, (REPLIED_MESSAGE, REPLY_FAILED_MESSAGE), notifier)
            .await
    }

    async fn post(
        &mut self,
        api: &ApiClient,
        session: &Session,
        comment: NewComment,
        (success, failure): (&str, &str),
        notifier: &mut impl Notifier,
    ) -> bool {
        if let Err(e) = validate(&comment.text) {
            notifier.error(e.to_string());
            return false;
        }
        let Some(token) = require_token(session, notifier) else {
            return false;
        };
        let result = api.add_comment(&self.video_id, &comment, token).await;
        let posted = completed(result, success, failure, notifier);
        if posted {
            self.refresh(api, notifier).await;
        }
        posted
    }

    /// Deletes a loaded comment the signed-in user may moderate.
    pub async fn delete(
        &mut self,
        api: &ApiClient,
        session: &Session,
        comment_id: &str,
        notifier: &mut impl Notifier,
    ) -> bool {
        if !self.comment(comment_id).is_some_and(deletable) {
            tracing::warn!(comment_id, "refusing to delete comment");
            notifier.error(NOT_DELETABLE_MESSAGE);
            return false;
        }
        let Some(token) = require_token(session, notifier) else {
            return false;
        };
        let result = api.delete_comment(comment_id, token).await;
        let deleted = completed(result, DELETED_MESSAGE, DELETE_FAILED_MESSAGE, notifier);
        if deleted {
            self.refresh(api, notifier).await;
        }
        deleted
    }

    pub fn render(&self) -> String {
        let mut out = format!("Comments ({})\n", self.threads.len());
        if self.threads.is_empty() {
            out.push_str("\nNo Comments Yet\nBe the first to leave a comment!\n");
            return out;
        }
        for thread in &self.threads {
            out.push('\n');
            render_comment(&mut out, thread.top_level(), "", true);
            for reply in thread.replies() {
                render_comment(&mut out, reply, "  ↳ ", false);
            }
        }
        out
    }
}

fn deletable(comment: &Comment) -> bool {
    comment.snippet.can_rate
}

fn render_comment(out: &mut String, comment: &Comment, indent: &str, top_level: bool) {
    let snippet = &comment.snippet;
    let _ = write!(out, "{indent}{}", snippet.author_display_name);
    if let Some(published) = snippet.published_at {
        let _ = write!(out, " · {}", format::date_time(published));
    }
    let _ = write!(out, " · {} likes", format::comment_likes(snippet.like_count));
    if top_level {
        let _ = write!(out, "  [reply {}]", comment.id);
    }
    if deletable(comment) {
        let _ = write!(out, "  [delete {}]", comment.id);
    }
    out.push('\n');
    let pad = " ".repeat(indent.chars().count() + 2);
    for line in snippet.text_display.lines() {
        let _ = writeln!(out, "{pad}{line}");
    }
}
