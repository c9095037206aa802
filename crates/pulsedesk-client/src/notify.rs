//! In-memory toast notification queue
//!
//! Toasts expire on read rather than via background timers, so the queue
//! stays deterministic under an injected clock. Nothing here is global
//! state; views hold their own queue.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a toast message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational
    Info,
    /// Operation succeeded
    Success,
    /// Something needs attention
    Warning,
    /// Operation failed
    Error,
}

impl NotificationLevel {
    /// How long a toast of this level stays visible
    #[must_use]
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::seconds(5),
            Self::Warning => Duration::seconds(8),
            Self::Error => Duration::seconds(30),
        }
    }
}

/// One toast message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Unique id, used for dismissal
    pub id: Uuid,

    /// Severity
    pub level: NotificationLevel,

    /// Message text
    pub message: String,

    /// When the toast was pushed
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether this toast has outlived its level's TTL
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.created_at + self.level.ttl()
    }
}

/// Queue of active toasts
#[derive(Debug, Default)]
pub struct Notifier {
    queue: Vec<Notification>,
}

impl Notifier {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a toast, returning its id
    pub fn push(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.queue.push(Notification {
            id,
            level,
            message: message.into(),
            created_at: now,
        });
        id
    }

    /// Dismiss a toast by id; unknown ids are ignored
    pub fn dismiss(&mut self, id: Uuid) {
        self.queue.retain(|n| n.id != id);
    }

    /// Drop expired toasts and return the ones still visible
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Notification] {
        self.queue.retain(|n| !n.is_expired(now));
        &self.queue
    }

    /// Number of queued toasts, expired or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
