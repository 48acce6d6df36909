//! Periodic and on-demand cluster state refresh.
//!
//! A refresh fetches the node list and pod list concurrently and applies
//! them to the snapshot store only when both succeed, so the view never
//! mixes a new node map with an old pod map. Each refresh is tagged with an
//! issue-time sequence number; the store discards completions older than the
//! last applied one, so overlapping refreshes (the periodic timer racing a
//! dispatcher-triggered one) cannot regress the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::ClusterClient;
use crate::error::ApiError;
use crate::notify::{NotificationCenter, Severity};
use crate::state::SnapshotStore;

/// Keeps the snapshot store close to backend truth under a polling
/// discipline, tolerant of transient backend errors.
pub struct SyncEngine {
    client: Arc<ClusterClient>,
    store: Arc<SnapshotStore>,
    notifications: NotificationCenter,
    issue_seq: AtomicU64,
}

impl SyncEngine {
    pub fn new(
        client: Arc<ClusterClient>,
        store: Arc<SnapshotStore>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            client,
            store,
            notifications,
            issue_seq: AtomicU64::new(0),
        }
    }

    /// Read access for renderers.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Perform one refresh attempt.
    ///
    /// Idempotent and safe to invoke concurrently with itself; overlapping
    /// attempts are independent and the sequence guard picks the newest
    /// completed one. On any failure the previous snapshot stays visible and
    /// a single error notification is raised.
    pub async fn refresh(&self) {
        let seq = self.issue_seq.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(seq, "starting refresh");

        let (nodes, pods) = tokio::join!(self.client.list_nodes(), self.client.list_pods());

        match (nodes, pods) {
            (Ok(nodes), Ok(pods)) => {
                let node_count = nodes.nodes.len();
                let pod_count = pods.pods.len();

                if self.store.replace(seq, nodes.nodes, pods.pods) {
                    debug!(seq, node_count, pod_count, "snapshot applied");
                } else {
                    debug!(seq, "stale refresh discarded");
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                self.report_failure(seq, e);
            }
        }
    }

    fn report_failure(&self, seq: u64, error: ApiError) {
        warn!(seq, error = %error, "refresh failed; keeping previous snapshot");
        self.notifications
            .enqueue(format!("Refresh failed: {error}"), Severity::Error);
    }

    /// Run `refresh` on a fixed interval until shutdown. The first tick
    /// fires immediately.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(interval_ms = interval.as_millis() as u64, "starting sync loop");

        let mut timer = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.refresh().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("sync loop shutting down");
                        break;
                    }
                }
            }
        }
    }
}
