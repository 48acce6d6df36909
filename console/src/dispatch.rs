//! Operator command dispatch.
//!
//! Translates each operator intent into exactly one backend mutation,
//! surfaces the outcome as exactly one notification, and then requests one
//! out-of-band refresh so the view reflects server-side effects the response
//! body does not name (a node stop reschedules pods, for instance). The
//! refresh runs on success and failure alike, since a failed command may
//! still have had partial effect.

use std::sync::Arc;

use tracing::info;

use crate::client::ClusterClient;
use crate::notify::{Notification, NotificationCenter, Severity};
use crate::sync::SyncEngine;

/// Dispatches mutating operations against the cluster manager.
pub struct CommandDispatcher {
    client: Arc<ClusterClient>,
    sync: Arc<SyncEngine>,
    notifications: NotificationCenter,
}

impl CommandDispatcher {
    pub fn new(
        client: Arc<ClusterClient>,
        sync: Arc<SyncEngine>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            client,
            sync,
            notifications,
        }
    }

    /// Add a worker node. Values below 1 are coerced to 1 rather than
    /// rejected; validation here is advisory and the backend has the final
    /// say.
    pub async fn add_node(&self, cpu_cores: u32) -> Notification {
        let cpu_cores = cpu_cores.max(1);

        let notification = match self.client.add_node(cpu_cores).await {
            Ok(response) => {
                info!(node_id = %response.node_id, cpu_cores, "node added");
                self.notifications.enqueue(
                    format!(
                        "Node {} added with {} CPU cores",
                        response.node_id, cpu_cores
                    ),
                    Severity::Success,
                )
            }
            Err(e) => self.notifications.enqueue(e.to_string(), Severity::Error),
        };

        self.sync.refresh().await;
        notification
    }

    /// Stop a node. The displayed view should show it as healthy; the
    /// backend re-validates either way.
    pub async fn stop_node(&self, node_id: &str) -> Notification {
        let notification = match self.client.stop_node(node_id).await {
            Ok(()) => {
                info!(node_id, "node stopped");
                self.notifications.enqueue(
                    format!("Node {node_id} stopped. Pods rescheduled."),
                    Severity::Success,
                )
            }
            Err(e) => self.notifications.enqueue(e.to_string(), Severity::Error),
        };

        self.sync.refresh().await;
        notification
    }

    /// Resume a stopped or unhealthy node.
    pub async fn resume_node(&self, node_id: &str) -> Notification {
        let notification = match self.client.resume_node(node_id).await {
            Ok(()) => {
                info!(node_id, "node resumed");
                self.notifications
                    .enqueue(format!("Node {node_id} resumed"), Severity::Success)
            }
            Err(e) => self.notifications.enqueue(e.to_string(), Severity::Error),
        };

        self.sync.refresh().await;
        notification
    }

    /// Launch a pod. Placement is the backend scheduler's decision; a pod
    /// accepted without placement shows as unassigned.
    pub async fn launch_pod(&self, cpu_required: u32) -> Notification {
        let cpu_required = cpu_required.max(1);

        let notification = match self.client.launch_pod(cpu_required).await {
            Ok(response) => {
                let node = response.node_id.as_deref().unwrap_or("unassigned");
                info!(pod_id = %response.pod_id, node_id = node, "pod launched");
                self.notifications.enqueue(
                    format!("Pod {} launched on {}", response.pod_id, node),
                    Severity::Success,
                )
            }
            Err(e) => self.notifications.enqueue(e.to_string(), Severity::Error),
        };

        self.sync.refresh().await;
        notification
    }
}
