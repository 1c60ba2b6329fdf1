//! Audit log types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Page sizes the events log offers.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

/// Page size used until the user picks another.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One recorded backend action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    /// What happened, e.g. `video_update` or `auth_error`.
    pub action: String,
    pub video_id: Option<String>,
    /// Free-form context the backend attached to the action.
    pub details: Option<serde_json::Value>,
    pub timestamp: Timestamp,
}

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilters {
    #[serde(skip_serializing_if = "super::is_blank")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "super::is_blank")]
    pub video_id: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            action: None,
            video_id: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EventFilters {
    /// Filters by action; like every filter change, this returns to the first page.
    pub fn with_action(self, action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            page: 1,
            ..self
        }
    }

    /// Filters by video; returns to the first page.
    pub fn with_video_id(self, video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            page: 1,
            ..self
        }
    }

    /// Changes the page size; returns to the first page.
    pub fn with_limit(self, limit: u32) -> Self {
        Self {
            limit,
            page: 1,
            ..self
        }
    }

    /// Moves to `page` without touching the other filters.
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn changing_a_filter_resets_the_page() {
        let filters = EventFilters::default().with_page(4).with_action("video_update");
        assert_eq!(filters.page, 1);
        assert_eq!(filters.action.as_deref(), Some("video_update"));

        let filters = filters.with_page(3).with_limit(50);
        assert_eq!(filters.page, 1);
        assert_eq!(filters.limit, 50);

        assert_eq!(EventFilters::default().with_page(0).page, 1);
    }

    #[test]
    fn event_with_details() {
        let event: Event = serde_json::from_str(
            r#"{
                "_id": "e1",
                "action": "note_create",
                "videoId": "v1",
                "details": {"title": "x"},
                "timestamp": "2024-05-01T10:00:00.000Z"
            }"#,
        )
        .unwrap();
        assert_eq!(event.action, "note_create");
        assert_eq!(event.details.unwrap()["title"], "x");
    }
}
