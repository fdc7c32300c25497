//! User-facing notices (toasts) emitted by a report session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct NoticeBroadcaster {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Info, message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Notice::new(NoticeLevel::Error, message));
    }
}

impl Default for NoticeBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notices = NoticeBroadcaster::default();
        let mut rx = notices.subscribe();

        notices.error("Location is required");
        notices.success("Voice transcribed successfully");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, NoticeLevel::Error);
        assert_eq!(first.message, "Location is required");
        assert_eq!(rx.recv().await.unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn test_send_without_subscribers() {
        let notices = NoticeBroadcaster::new(4);
        notices.info("nobody listening");
    }
}
