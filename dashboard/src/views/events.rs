//! The audit log.

use super::format;
use crate::api::{ApiClient, Envelope, Event, EventFilters, Pagination};
use crate::notifications::Notifier;
use std::fmt::{self, Write};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch event logs";

/// How an action is presented, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTone {
    Error,
    Warning,
    Success,
    Info,
    Neutral,
}

impl ActionTone {
    /// First match wins: `error`, then `delete`, then `create`/`success`, then `update`.
    pub fn classify(action: &str) -> Self {
        if action.contains("error") {
            ActionTone::Error
        } else if action.contains("delete") {
            ActionTone::Warning
        } else if action.contains("create") || action.contains("success") {
            ActionTone::Success
        } else if action.contains("update") {
            ActionTone::Info
        } else {
            ActionTone::Neutral
        }
    }
}

impl fmt::Display for ActionTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionTone::Error => "error",
            ActionTone::Warning => "warning",
            ActionTone::Success => "success",
            ActionTone::Info => "info",
            ActionTone::Neutral => "neutral",
        })
    }
}

pub fn action_icon(action: &str) -> &'static str {
    match action {
        "video_fetch" => "📹",
        "video_update" => "✏️",
        "comments_fetch" => "💬",
        "comment_create" => "✍️",
        "comment_delete" | "note_delete" => "🗑️",
        "note_create" | "note_update" => "📝",
        "auth_request" => "🔐",
        "auth_success" => "✅",
        "auth_error" => "❌",
        _ => "📋",
    }
}

/// `Showing 21 to 40 of 45 events`, only when there is more than one page.
pub fn pagination_summary(pagination: &Pagination) -> Option<String> {
    if pagination.pages <= 1 {
        return None;
    }
    let limit = u64::from(pagination.limit);
    let first = u64::from(pagination.page.saturating_sub(1)) * limit + 1;
    let last = (u64::from(pagination.page) * limit).min(pagination.total);
    Some(format!(
        "Showing {first} to {last} of {} events",
        pagination.total
    ))
}

#[derive(Debug, Clone)]
pub struct EventLog {
    filters: EventFilters,
    events: Vec<Event>,
    pagination: Option<Pagination>,
}

impl EventLog {
    pub async fn load(api: &ApiClient, filters: EventFilters, notifier: &mut impl Notifier) -> Self {
        let mut log = Self {
            filters,
            events: Vec::new(),
            pagination: None,
        };
        log.refresh(api, notifier).await;
        log
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn filters(&self) -> &EventFilters {
        &self.filters
    }

    /// Replaces the filters and reloads.
    pub async fn apply(&mut self, filters: EventFilters, api: &ApiClient, notifier: &mut impl Notifier) {
        self.filters = filters;
        self.refresh(api, notifier).await;
    }

    pub async fn refresh(&mut self, api: &ApiClient, notifier: &mut impl Notifier) {
        match api.get_events(&self.filters).await.and_then(Envelope::ensure_success) {
            Ok(response) => {
                self.events = response.data.unwrap_or_default();
                self.pagination = response.pagination;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch events");
                notifier.error(FETCH_FAILED_MESSAGE);
                self.events.clear();
                self.pagination = None;
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Event Logs\n");
        if self.events.is_empty() {
            out.push_str("\nNo Events Found\nNo events match your current filters.\n");
            return out;
        }

        for event in &self.events {
            out.push('\n');
            out.push_str(&render_event(event));
        }

        if let Some(summary) = self.pagination.as_ref().and_then(pagination_summary) {
            let _ = writeln!(out, "\n{summary}");
        }
        out
    }
}

/// One log row, with its details pretty-printed underneath.
pub fn render_event(event: &Event) -> String {
    let tone = ActionTone::classify(&event.action);
    let mut out = format!("{} [{tone}] {}", action_icon(&event.action), event.action);
    if let Some(video_id) = &event.video_id {
        let _ = write!(out, "  Video: {video_id}");
    }
    let _ = writeln!(out, "  {}", format::date_time_seconds(event.timestamp));
    if let Some(details) = &event.details {
        let pretty = serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string());
        for line in pretty.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}
