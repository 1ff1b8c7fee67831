//! Transient user notifications ("toasts").
//!
//! Every controller operation ends in exactly one notification. Each one
//! stays current until its dismiss time passes or a newer one replaces it.
//! A bounded history is kept for tests and the CLI.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use strum::Display;
use tracing::{error, info};

use crate::clock::SharedClock;
use crate::constants::MAX_NOTIFICATION_HISTORY;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Unix millis.
    pub raised_at: u64,
    /// Unix millis after which it is no longer shown.
    pub dismiss_at: u64,
}

impl Notification {
    pub fn is_visible(&self, now: u64) -> bool {
        now < self.dismiss_at
    }
}

struct Inner {
    history: VecDeque<Notification>,
}

/// Records notifications and answers "what is showing right now".
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Mutex<Inner>>,
    clock: SharedClock,
    dismiss_after: Duration,
}

impl Notifier {
    pub fn new(clock: SharedClock, dismiss_after: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                history: VecDeque::new(),
            })),
            clock,
            dismiss_after,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Severity::Info, message.into());
    }

    pub fn notify(&self, severity: Severity, message: String) {
        match severity {
            Severity::Error => error!(%message, "notification"),
            _ => info!(%severity, %message, "notification"),
        }

        let now = self.clock.now_millis();
        let notification = Notification {
            message,
            severity,
            raised_at: now,
            dismiss_at: now + self.dismiss_after.as_millis() as u64,
        };

        let mut inner = self.inner.lock();
        if inner.history.len() >= MAX_NOTIFICATION_HISTORY {
            inner.history.pop_front();
        }
        inner.history.push_back(notification);
    }

    /// The notification on screen now, if any.
    pub fn current(&self) -> Option<Notification> {
        let now = self.clock.now_millis();
        self.inner
            .lock()
            .history
            .back()
            .filter(|n| n.is_visible(now))
            .cloned()
    }

    /// The most recent notification regardless of expiry.
    pub fn last(&self) -> Option<Notification> {
        self.inner.lock().history.back().cloned()
    }

    /// All retained notifications, oldest first.
    pub fn history(&self) -> Vec<Notification> {
        self.inner.lock().history.iter().cloned().collect()
    }
}
