//! User-facing notices (the toasts of a graphical front end).
//!
//! Every mutation reports its outcome here. Notices are logged, kept in a
//! short history and broadcast to whoever renders them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Notices kept for late readers.
const HISTORY_LIMIT: usize = 100;

/// Broadcast buffer; slow subscribers skip ahead rather than block the writer.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Fan-out point for notices. Clones share history and channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
    history: Arc<Mutex<VecDeque<Notice>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            history: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Publish a notice.
    pub fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("notice: {}", notice.message),
            _ => tracing::info!("notice: {}", notice.message),
        }

        if let Ok(mut history) = self.history.lock() {
            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(notice.clone());
        }

        // No subscribers is fine; history still has it
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notice::info(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Notices published so far, oldest first.
    pub fn history(&self) -> Vec<Notice> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drain and return the history.
    pub fn take_history(&self) -> Vec<Notice> {
        self.history
            .lock()
            .map(|mut h| h.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_in_order() {
        let notifier = Notifier::new();
        notifier.success("Folder created");
        notifier.error("Failed to move file");

        let history = notifier.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Notice::success("Folder created"));
        assert_eq!(history[1].level, NoticeLevel::Error);
    }

    #[test]
    fn test_history_is_bounded() {
        let notifier = Notifier::new();
        for i in 0..(HISTORY_LIMIT + 5) {
            notifier.info(format!("n{}", i));
        }
        let history = notifier.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].message, "n5");
    }

    #[test]
    fn test_take_history_drains() {
        let notifier = Notifier::new();
        notifier.info("x");
        assert_eq!(notifier.take_history().len(), 1);
        assert!(notifier.history().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        notifier.success("Uploaded 1 of 2 files");
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.message, "Uploaded 1 of 2 files");
    }
}
