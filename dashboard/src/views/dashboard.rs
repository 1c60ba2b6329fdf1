//! The root view.

use super::comments::CommentsPanel;
use super::notes::NotesPanel;
use super::video::VideoPanel;
use crate::api::{ApiClient, NoteFilters};
use crate::notifications::Notifier;
use crate::session::Session;

/// The video the dashboard opens with until the user picks their own.
pub const DEFAULT_VIDEO_ID: &str = "8FPktSuxaIo";

pub const WELCOME: &str = "\
Welcome to YouTube Dashboard
Connect your YouTube account to manage your videos, comments, and personal notes all in one place.
Run `yt-dashboard login` to connect.
";

const SETUP_HINT: &str = "\
Setup Required
Replace the default video ID with your actual YouTube video ID (--video-id) to start managing your content.
";

/// `requested` if it has anything in it, otherwise the default video.
pub fn resolve_video_id(requested: Option<&str>) -> &str {
    requested
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_VIDEO_ID)
}

#[derive(Debug, Clone)]
pub enum Dashboard {
    /// Nobody is signed in; nothing is fetched.
    Welcome,
    Loaded {
        video_id: String,
        video: VideoPanel,
        comments: CommentsPanel,
        notes: NotesPanel,
    },
}

impl Dashboard {
    pub async fn load(
        api: &ApiClient,
        session: &Session,
        video_id: Option<&str>,
        notifier: &mut impl Notifier,
    ) -> Self {
        if !session.is_authenticated() {
            return Dashboard::Welcome;
        }

        let video_id = resolve_video_id(video_id).to_string();
        tracing::debug!(%video_id, "loading dashboard");
        let video = VideoPanel::load(api, &video_id, notifier).await;
        let comments = CommentsPanel::load(api, &video_id, notifier).await;
        let notes = NotesPanel::load(api, NoteFilters::for_video(&video_id), notifier).await;
        Dashboard::Loaded {
            video_id,
            video,
            comments,
            notes,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Dashboard::Welcome => WELCOME.to_string(),
            Dashboard::Loaded {
                video_id,
                video,
                comments,
                notes,
            } => {
                let mut out = format!("Video Dashboard · Video ID: {video_id}\n");
                if video_id == DEFAULT_VIDEO_ID {
                    out.push('\n');
                    out.push_str(SETUP_HINT);
                }
                for section in [video.render(), comments.render(), notes.render()] {
                    out.push('\n');
                    out.push_str(&section);
                }
                out
            }
        }
    }
}
