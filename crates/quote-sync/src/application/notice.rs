//! # Notice Bus
//!
//! User-visible, non-fatal notifications ("Quote added", "Failed to fetch
//! quotes") broadcast to whatever front end is listening.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Severity of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Neutral information.
    Info,
    /// An action completed.
    Success,
    /// An action failed; prior state is untouched.
    Error,
}

/// A single notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

/// Broadcast channel of [`Notice`]s.
///
/// Publishing never blocks and never fails: with no subscriber the notice is
/// dropped, and slow subscribers lag rather than stall the board.
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Bus buffering up to `capacity` notices per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New subscription; sees notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Publish a notice. Returns the number of subscribers reached.
    pub fn publish(&self, level: NoticeLevel, message: impl Into<String>) -> usize {
        let notice = Notice {
            level,
            message: message.into(),
        };
        trace!(level = ?notice.level, message = %notice.message, "Notice published");
        self.sender.send(notice).unwrap_or(0)
    }

    /// Publish an info notice.
    pub fn info(&self, message: impl Into<String>) -> usize {
        self.publish(NoticeLevel::Info, message)
    }

    /// Publish a success notice.
    pub fn success(&self, message: impl Into<String>) -> usize {
        self.publish(NoticeLevel::Success, message)
    }

    /// Publish an error notice.
    pub fn error(&self, message: impl Into<String>) -> usize {
        self.publish(NoticeLevel::Error, message)
    }
}
