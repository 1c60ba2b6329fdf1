//! Personal note types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A note the user attached to a video.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub video_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Body of `POST /notes` and `PUT /notes/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub video_id: String,
}

/// Query parameters for `GET /notes`.
///
/// Blank filters are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilters {
    #[serde(skip_serializing_if = "super::is_blank")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "super::is_blank")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "super::is_blank")]
    pub tags: Option<String>,
}

impl NoteFilters {
    pub fn for_video(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    /// Whether the user narrowed the list beyond the current video.
    pub fn is_narrowed(&self) -> bool {
        !super::is_blank(&self.search) || !super::is_blank(&self.tags)
    }
}
