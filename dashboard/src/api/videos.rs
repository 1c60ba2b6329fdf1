//! Video resource types.
//!
//! These mirror the subset of the YouTube `video` resource that the backend passes
//! through and the dashboard displays.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A YouTube video as returned by `GET /video/:id`.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

/// Basic details about the video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
}

/// Statistics about the video.
///
/// YouTube reports counts as decimal strings; use the `*_count` accessors to get numbers.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

impl VideoStatistics {
    pub fn views(&self) -> u64 {
        parse_count(self.view_count.as_deref())
    }

    pub fn likes(&self) -> u64 {
        parse_count(self.like_count.as_deref())
    }

    pub fn comments(&self) -> u64 {
        parse_count(self.comment_count.as_deref())
    }
}

// hidden or missing counts display as zero
fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// The editable fields sent with `PUT /video/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoUpdate {
    pub title: String,
    pub description: String,
}

impl VideoUpdate {
    /// Starts an edit from the video's current values.
    pub fn from_video(video: &Video) -> Self {
        Self {
            title: video.snippet.title.clone(),
            description: video.snippet.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_youtube_video() {
        let video: Video = serde_json::from_str(
            r#"{
                "kind": "youtube#video",
                "id": "8FPktSuxaIo",
                "snippet": {
                    "title": "Demo",
                    "description": "",
                    "publishedAt": "2024-03-05T17:00:00Z",
                    "channelTitle": "Chan"
                },
                "statistics": {"viewCount": "1523400", "likeCount": "8100"}
            }"#,
        )
        .unwrap();
        assert_eq!(video.statistics.views(), 1_523_400);
        assert_eq!(video.statistics.likes(), 8_100);
        assert_eq!(video.statistics.comments(), 0);
        assert_eq!(
            video.snippet.published_at.unwrap().to_string(),
            "2024-03-05T17:00:00Z"
        );
        assert_eq!(
            VideoUpdate::from_video(&video),
            VideoUpdate {
                title: "Demo".into(),
                description: String::new(),
            }
        );
    }
}
