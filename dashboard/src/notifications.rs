//! Transient user-facing messages.
//!
//! Every caught failure (and most successful mutations) ends in exactly one notification.
//! What the user actually sees is up to the [`Notifier`] in use.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            Level::Success => "✔",
            Level::Error => "✖",
        };
        write!(f, "{marker} {}", self.message)
    }
}

/// Shows notifications to the user.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    fn success(&mut self, message: impl Into<String>) {
        self.notify(Notification {
            level: Level::Success,
            message: message.into(),
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        self.notify(Notification {
            level: Level::Error,
            message: message.into(),
        });
    }
}

/// Prints notifications to stderr, keeping stdout for rendered views.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, notification: Notification) {
        eprintln!("{notification}");
    }
}

/// Keeps every notification it is given, for later inspection.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    pub notifications: Vec<Notification>,
}

impl CollectingNotifier {
    pub fn messages(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .map(|n| n.message.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|n| n.level == Level::Error)
            .map(|n| n.message.as_str())
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
