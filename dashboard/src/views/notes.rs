//! Personal notes attached to a video.

use super::{completed, fetched, format};
use crate::api::{ApiClient, Note, NoteFilters, NoteInput};
use crate::notifications::Notifier;
use std::fmt::Write;

pub const REQUIRED_MESSAGE: &str = "Title and content are required";
pub const CREATED_MESSAGE: &str = "Note created successfully";
pub const UPDATED_MESSAGE: &str = "Note updated successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save note";
pub const DELETED_MESSAGE: &str = "Note deleted successfully";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete note";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch notes";

/// Splits `"a, b,,c "` into `["a", "b", "c"]`.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// The note editor's fields, as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// Comma-separated.
    pub tags: String,
}

impl NoteDraft {
    /// Prefills the editor from an existing note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.join(", "),
        }
    }

    /// The request body for this draft, or `None` if title or content is blank.
    pub fn to_input(&self, video_id: &str) -> Option<NoteInput> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return None;
        }
        Some(NoteInput {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: parse_tags(&self.tags),
            video_id: video_id.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NotesPanel {
    filters: NoteFilters,
    notes: Vec<Note>,
}

impl NotesPanel {
    pub async fn load(api: &ApiClient, filters: NoteFilters, notifier: &mut impl Notifier) -> Self {
        let mut panel = Self {
            filters,
            notes: Vec::new(),
        };
        panel.refresh(api, notifier).await;
        panel
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn filters(&self) -> &NoteFilters {
        &self.filters
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    /// Every tag used by the listed notes, each once, in order of first use.
    pub fn known_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for tag in self.notes.iter().flat_map(|n| &n.tags) {
            if !tags.contains(&tag.as_str()) {
                tags.push(tag);
            }
        }
        tags
    }

    pub async fn refresh(&mut self, api: &ApiClient, notifier: &mut impl Notifier) {
        let result = api.get_notes(&self.filters).await;
        self.notes = fetched(result, FETCH_FAILED_MESSAGE, notifier).unwrap_or_default();
    }

    /// Creates a note, or updates `editing` when given, for the panel's video.
    pub async fn save(
        &mut self,
        api: &ApiClient,
        draft: &NoteDraft,
        editing: Option<&str>,
        notifier: &mut impl Notifier,
    ) -> bool {
        let video_id = self.filters.video_id.clone().unwrap_or_default();
        let Some(input) = draft.to_input(&video_id) else {
            notifier.error(REQUIRED_MESSAGE);
            return false;
        };
        let saved = match editing {
            Some(note_id) => completed(
                api.update_note(note_id, &input).await,
                UPDATED_MESSAGE,
                SAVE_FAILED_MESSAGE,
                notifier,
            ),
            None => completed(
                api.create_note(&input).await,
                CREATED_MESSAGE,
                SAVE_FAILED_MESSAGE,
                notifier,
            ),
        };
        if saved {
            self.refresh(api, notifier).await;
        }
        saved
    }

    pub async fn delete(&mut self, api: &ApiClient, note_id: &str, notifier: &mut impl Notifier) -> bool {
        let result = api.delete_note(note_id).await;
        let deleted = completed(result, DELETED_MESSAGE, DELETE_FAILED_MESSAGE, notifier);
        if deleted {
            self.refresh(api, notifier).await;
        }
        deleted
    }

    pub fn render(&self) -> String {
        let mut out = format!("Notes ({} total)\n", self.notes.len());
        if self.notes.is_empty() {
            let hint = if self.filters.is_narrowed() {
                "No notes match your search criteria."
            } else {
                "Start by creating your first note."
            };
            let _ = writeln!(out, "\nNo Notes Found\n{hint}");
            return out;
        }

        for note in &self.notes {
            let _ = writeln!(out, "\n{}  [{}]", note.title, note.id);
            for line in note.content.lines() {
                let _ = writeln!(out, "  {line}");
            }
            let mut footer: Vec<String> = note.tags.iter().map(|t| format!("#{t}")).collect();
            if let Some(created) = note.created_at {
                footer.push(format::date_time(created));
            }
            if !footer.is_empty() {
                let _ = writeln!(out, "  {}", footer.join(" "));
            }
        }
        out
    }
}
