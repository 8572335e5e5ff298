//! The single user-visible notification channel.
//!
//! Every boundary outcome (commit success, invalid save, unknown scenario,
//! load failure) maps to exactly one notification with a severity. The queue
//! is owned by the session; the consuming layer drains it or sweeps expired
//! entries for auto-dismissal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How long a notification stays visible before auto-dismissal.
const DISMISS_AFTER_SECONDS: i64 = 5;

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

serde_plain::derive_display_from_serialize!(Severity);
serde_plain::derive_fromstr_from_deserialize!(Severity);

/// A transient user-visible message.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    message: String,
    severity: Severity,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// True once the auto-dismiss window has passed.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(DISMISS_AFTER_SECONDS)
    }
}

/// FIFO queue of pending notifications.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.queue.push_back(Notification::new(message, severity));
    }

    /// Removes and returns every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    /// Drops notifications whose auto-dismiss window has passed.
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) {
        self.queue.retain(|n| !n.expired(now));
    }

    pub fn pending(&self) -> &VecDeque<Notification> {
        &self.queue
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
