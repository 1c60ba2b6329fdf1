//! The video details card.

use super::{completed, format, require_token};
use crate::api::{ApiClient, Video, VideoUpdate};
use crate::notifications::Notifier;
use crate::session::Session;
use std::fmt::Write;

pub const NOT_FOUND_MESSAGE: &str = "Video not found";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch video details";
pub const UPDATED_MESSAGE: &str = "Video updated successfully";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update video";

#[derive(Debug, Clone)]
pub struct VideoPanel {
    video_id: String,
    video: Option<Video>,
}

impl VideoPanel {
    pub async fn load(api: &ApiClient, video_id: &str, notifier: &mut impl Notifier) -> Self {
        let mut panel = Self {
            video_id: video_id.to_string(),
            video: None,
        };
        panel.refresh(api, notifier).await;
        panel
    }

    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    pub async fn refresh(&mut self, api: &ApiClient, notifier: &mut impl Notifier) {
        self.video = match api.get_video(&self.video_id).await {
            Ok(response) => match response.into_data() {
                Ok(video) => Some(video),
                Err(e) => {
                    tracing::warn!(video_id = %self.video_id, error = %e, "video not found");
                    notifier.error(NOT_FOUND_MESSAGE);
                    None
                }
            },
            Err(e) => {
                tracing::warn!(video_id = %self.video_id, error = %e, "could not fetch video");
                notifier.error(FETCH_FAILED_MESSAGE);
                None
            }
        };
    }

    /// Saves a new title and description, then reloads the card.
    pub async fn update(
        &mut self,
        api: &ApiClient,
        session: &Session,
        update: &VideoUpdate,
        notifier: &mut impl Notifier,
    ) -> bool {
        let Some(token) = require_token(session, notifier) else {
            return false;
        };
        let result = api.update_video(&self.video_id, update, token).await;
        let updated = completed(result, UPDATED_MESSAGE, UPDATE_FAILED_MESSAGE, notifier);
        if updated {
            self.refresh(api, notifier).await;
        }
        updated
    }

    pub fn render(&self) -> String {
        let Some(video) = &self.video else {
            return format!("Video {}: {NOT_FOUND_MESSAGE}\n", self.video_id);
        };

        let mut out = String::new();
        let snippet = &video.snippet;
        let _ = writeln!(out, "{}", snippet.title);
        if let Some(channel) = &snippet.channel_title {
            let _ = writeln!(out, "by {channel}");
        }
        let description = if snippet.description.trim().is_empty() {
            "No description available"
        } else {
            snippet.description.trim_end()
        };
        let _ = writeln!(out, "\n{description}\n");
        let stats = &video.statistics;
        let _ = write!(
            out,
            "Views: {}  Likes: {}  Comments: {}",
            format::compact_count(stats.views()),
            format::compact_count(stats.likes()),
            format::compact_count(stats.comments()),
        );
        if let Some(published) = snippet.published_at {
            let _ = write!(out, "  Published: {}", format::date(published));
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::credentials::AccessToken;
    use crate::notifications::CollectingNotifier;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn video_json(title: &str) -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "id": "vid1",
                "snippet": {
                    "title": title,
                    "description": "",
                    "publishedAt": "2024-03-05T17:00:00Z",
                    "channelTitle": "Chan"
                },
                "statistics": {"viewCount": "1523400", "likeCount": "8100", "commentCount": "12"}
            }
        })
    }

    #[tokio::test]
    async fn renders_loaded_video() {
        let backend = MockBackend::start(vec![(StatusCode::OK, video_json("Demo"))]).await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();

        let panel = VideoPanel::load(&api, "vid1", &mut notifier).await;
        assert!(notifier.notifications.is_empty());
        insta::assert_snapshot!(panel.render(), @r"
        Demo
        by Chan

        No description available

        Views: 1.5M  Likes: 8.1K  Comments: 12  Published: Mar 5, 2024
        ");
    }

    #[tokio::test]
    async fn missing_video() {
        let backend = MockBackend::start(vec![(
            StatusCode::OK,
            json!({"success": false, "error": "Video not found"}),
        )])
        .await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();

        let panel = VideoPanel::load(&api, "nope", &mut notifier).await;
        assert!(panel.video().is_none());
        assert_eq!(notifier.errors(), vec![NOT_FOUND_MESSAGE]);
        assert_eq!(panel.render(), "Video nope: Video not found\n");
    }

    #[tokio::test]
    async fn fetch_error() {
        let backend =
            MockBackend::start(vec![(StatusCode::NOT_FOUND, json!({"success": false}))]).await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();

        VideoPanel::load(&api, "vid1", &mut notifier).await;
        assert_eq!(notifier.errors(), vec![FETCH_FAILED_MESSAGE]);
    }

    #[tokio::test]
    async fn update_requires_session() {
        let backend = MockBackend::start(vec![(StatusCode::OK, video_json("Demo"))]).await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();
        let mut panel = VideoPanel::load(&api, "vid1", &mut notifier).await;

        let update = VideoUpdate {
            title: "New".into(),
            description: String::new(),
        };
        assert!(!panel.update(&api, &Session::default(), &update, &mut notifier).await);
        assert_eq!(notifier.errors(), vec![crate::views::NOT_CONNECTED_MESSAGE]);
        assert_eq!(backend.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn update_then_reload() {
        let backend = MockBackend::start(vec![
            (StatusCode::OK, video_json("Demo")),
            (StatusCode::OK, json!({"success": true, "data": {}})),
            (StatusCode::OK, video_json("New")),
        ])
        .await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();
        let mut store = SessionStore::initialize(MemoryStorage::new());
        store.login(AccessToken::new("tok1").unwrap()).unwrap();

        let mut panel = VideoPanel::load(&api, "vid1", &mut notifier).await;
        let update = VideoUpdate {
            title: "New".into(),
            description: "Fresh".into(),
        };
        assert!(panel.update(&api, store.session(), &update, &mut notifier).await);

        assert_eq!(notifier.messages(), vec![UPDATED_MESSAGE]);
        assert_eq!(panel.video().unwrap().snippet.title, "New");
        let requests = backend.requests().await;
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(
            requests[1].body,
            json!({"title": "New", "description": "Fresh", "accessToken": "tok1"})
        );
    }

    #[tokio::test]
    async fn failed_update_is_reported() {
        let backend = MockBackend::start(vec![
            (StatusCode::OK, video_json("Demo")),
            (StatusCode::OK, json!({"success": false, "error": "quota"})),
        ])
        .await;
        let api = ApiClient::new(&backend.base_url()).unwrap();
        let mut notifier = CollectingNotifier::default();
        let mut store = SessionStore::initialize(MemoryStorage::new());
        store.login(AccessToken::new("tok1").unwrap()).unwrap();

        let mut panel = VideoPanel::load(&api, "vid1", &mut notifier).await;
        let update = VideoUpdate::from_video(panel.video().unwrap());
        assert!(!panel.update(&api, store.session(), &update, &mut notifier).await);
        assert_eq!(notifier.errors(), vec![UPDATE_FAILED_MESSAGE]);
        assert_eq!(panel.video().unwrap().snippet.title, "Demo");
    }
}
