//! Transient operation-outcome notifications.
//!
//! Every refresh or command outcome lands here as a severity-tagged message.
//! Entries expire on their own after a fixed delay or can be dismissed
//! early; whichever removal happens first wins and the other is a no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Notification severity, in increasing order of operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient message describing the outcome of one operation.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

struct Inner {
    next_id: AtomicU64,
    entries: Mutex<Vec<Notification>>,
}

impl Inner {
    fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }
}

/// FIFO queue of self-expiring notifications.
///
/// Cheap to clone; clones share the same queue. Each enqueued entry gets its
/// own expiry task, so dismissal never has to cancel a timer: a timer firing
/// for an already-removed id simply finds nothing to remove.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
    ttl: Duration,
}

impl NotificationCenter {
    /// Default time a notification stays visible.
    pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
            ttl,
        }
    }

    /// Append a notification and schedule its expiry. Returns the stored
    /// entry so callers can surface it immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, message: impl Into<String>, severity: Severity) -> Notification {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };

        debug!(
            id,
            severity = severity.label(),
            message = %notification.message,
            "notification enqueued"
        );

        {
            let mut entries = self.inner.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.push(notification.clone());
        }

        let inner = Arc::clone(&self.inner);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if inner.dismiss(id) {
                debug!(id, "notification expired");
            }
        });

        notification
    }

    /// Remove a notification immediately. No-op if the id is already gone,
    /// which also covers the race with its own expiry timer.
    pub fn dismiss(&self, id: u64) -> bool {
        self.inner.dismiss(id)
    }

    /// Current queue in creation order.
    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_ttl() {
        let center = NotificationCenter::new(Duration::from_millis(5000));
        center.enqueue("node added", Severity::Success);
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(5001)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_wins_over_expiry() {
        let center = NotificationCenter::new(Duration::from_millis(5000));
        let n = center.enqueue("stopping node", Severity::Info);

        assert!(center.dismiss(n.id));
        assert!(center.active().is_empty());

        // The pending expiry timer fires against the removed id and must be
        // harmless.
        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_absent_id_is_noop() {
        let center = NotificationCenter::new(Duration::from_millis(5000));
        assert!(!center.dismiss(42));

        let n = center.enqueue("gone soon", Severity::Warning);
        tokio::time::sleep(Duration::from_millis(5001)).await;
        assert!(!center.dismiss(n.id));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_keep_fifo_creation_order() {
        let center = NotificationCenter::new(Duration::from_millis(5000));
        center.enqueue("first", Severity::Info);
        center.enqueue("second", Severity::Error);
        center.enqueue("third", Severity::Success);

        let messages: Vec<_> = center.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_monotonic() {
        let center = NotificationCenter::new(Duration::from_millis(5000));
        let a = center.enqueue("a", Severity::Info);
        let b = center.enqueue("b", Severity::Info);
        assert!(b.id > a.id);
    }
}
