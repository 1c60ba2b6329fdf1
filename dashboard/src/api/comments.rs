//! Comment thread types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A top-level comment and the replies shown beneath it.
///
/// See: <https://developers.google.com/youtube/v3/docs/commentThreads#resource>
#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub id: String,
    pub snippet: CommentThreadSnippet,
    pub replies: Option<CommentReplies>,
}

impl CommentThread {
    pub fn top_level(&self) -> &Comment {
        &self.snippet.top_level_comment
    }

    /// Replies included in the thread, oldest first as YouTube returns them.
    pub fn replies(&self) -> &[Comment] {
        self.replies
            .as_ref()
            .map(|r| r.comments.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Comment,
    #[serde(rename = "totalReplyCount", default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentReplies {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A single comment.
///
/// See: <https://developers.google.com/youtube/v3/docs/comments#resource>
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    pub author_profile_image_url: Option<String>,
    /// The comment text as YouTube renders it.
    pub text_display: String,
    #[serde(default)]
    pub like_count: u64,
    pub published_at: Option<Timestamp>,
    /// Whether the viewer may rate (and therefore moderate) this comment.
    #[serde(default)]
    pub can_rate: bool,
}

/// Body of `POST /comments/:videoId`, minus the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub text: String,
    /// Set to reply to an existing top-level comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl NewComment {
    pub fn top_level(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parent_id: None,
        }
    }

    pub fn reply(parent_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parent_id: Some(parent_id.into()),
        }
    }
}
