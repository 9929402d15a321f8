//! Notification surface
//!
//! Pass/fail feedback for save, export and import. A new message replaces the
//! one on screen and restarts its dismiss timer.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a notification stays visible.
pub const DISMISS_AFTER_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.shown_at) < Duration::seconds(DISMISS_AFTER_SECS)
    }
}

/// Receives user-facing feedback.
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

/// Keeps the notification on screen and everything shown so far.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    history: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification shown at an explicit time.
    pub fn notify_at(&mut self, message: &str, kind: NotificationKind, now: DateTime<Utc>) {
        self.history.push(Notification {
            message: message.to_string(),
            kind,
            shown_at: now,
        });
    }

    /// The notification still on screen at `now`, if any.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.history.last().filter(|n| n.is_visible_at(now))
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.history.last()
    }

    pub fn history(&self) -> &[Notification] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Notifier for NotificationCenter {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.notify_at(message, kind, Utc::now());
    }
}

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("{} {}", kind.icon(), message),
            NotificationKind::Error => eprintln!("{} {}", kind.icon(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_dismissed_after_four_seconds() {
        let mut center = NotificationCenter::new();
        let shown = Utc::now();
        center.notify_at("Saved", NotificationKind::Success, shown);

        assert!(center.visible_at(shown + Duration::milliseconds(3999)).is_some());
        assert!(center.visible_at(shown + Duration::seconds(4)).is_none());
    }

    #[test]
    fn test_new_notification_replaces_and_restarts_timer() {
        let mut center = NotificationCenter::new();
        let first = Utc::now();
        center.notify_at("first", NotificationKind::Success, first);
        center.notify_at("second", NotificationKind::Error, first + Duration::seconds(3));

        let visible = center.visible_at(first + Duration::seconds(5)).unwrap();
        assert_eq!(visible.message, "second");
        assert_eq!(visible.kind, NotificationKind::Error);
        assert_eq!(center.history().len(), 2);
    }
}
