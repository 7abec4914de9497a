//! Transient, auto-dismissing user messages.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub expires_at: DateTime<Utc>,
}

/// One message slot: a new notice replaces the previous one, and a notice
/// disappears on its own once its TTL has passed.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: chrono::Duration,
    current: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(5)),
            current: None,
        }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.post_at(NoticeKind::Success, text, Utc::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post_at(NoticeKind::Error, text, Utc::now());
    }

    pub fn post_at(&mut self, kind: NoticeKind, text: impl Into<String>, now: DateTime<Utc>) {
        let text = text.into();
        match kind {
            NoticeKind::Success => tracing::info!(%text, "notice"),
            NoticeKind::Error => tracing::warn!(%text, "notice"),
        }
        self.current = Some(Notice {
            kind,
            text,
            expires_at: now + self.ttl,
        });
    }

    /// The visible notice at `now`, if any.
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.current.as_ref().filter(|n| n.expires_at > now)
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Utc::now())
    }

    /// Drop the notice once it has expired.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        if self.current_at(now).is_none() {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_dismisses_itself_after_ttl() {
        let mut board = NoticeBoard::new(Duration::from_secs(5));
        let now = Utc::now();
        board.post_at(NoticeKind::Error, "boom", now);
        assert_eq!(board.current_at(now).unwrap().text, "boom");
        assert!(board
            .current_at(now + chrono::Duration::seconds(4))
            .is_some());
        assert!(board
            .current_at(now + chrono::Duration::seconds(5))
            .is_none());
        board.prune(now + chrono::Duration::seconds(6));
        assert!(board.current_at(now).is_none());
    }

    #[test]
    fn success_replaces_error() {
        let mut board = NoticeBoard::default();
        board.error("bad");
        board.success("good");
        let notice = board.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "good");
    }
}
