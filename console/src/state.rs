//! Cluster snapshot store.
//!
//! Holds the last-known-good view of nodes and pods. A snapshot is only ever
//! replaced wholesale: either a refresh succeeds for both halves and the
//! whole pair is swapped in, or the previous snapshot stays untouched. Reads
//! are lock-free; writers serialize on a small gate that enforces the
//! sequence ordering of concurrent refreshes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// Node health as reported by the cluster manager.
///
/// Transitions are backend-owned; the console only reflects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Healthy,
    Stopped,
    Unhealthy,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Stopped => "stopped",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Pod scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodStatus {
    Pending,
    Running,
    PendingReschedule,
    Failed,
}

impl PodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::PendingReschedule => "pending_reschedule",
            Self::Failed => "failed",
        }
    }
}

/// A worker node. Keyed by node id in the snapshot map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Total CPU capacity.
    pub cpu_cores: u32,

    /// Unreserved CPU; never exceeds `cpu_cores`.
    pub available_cpu: u32,

    pub status: NodeStatus,

    /// Ids of pods placed on this node, in placement order.
    #[serde(rename = "pods", default)]
    pub pod_ids: Vec<String>,

    #[serde(default)]
    pub last_heartbeat: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    /// Opaque container runtime reference; display-only.
    #[serde(default)]
    pub container_ref: Option<String>,
}

/// A schedulable workload. Keyed by pod id in the snapshot map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    /// Hosting node, absent while unplaced or awaiting reschedule.
    #[serde(default)]
    pub node_id: Option<String>,

    pub cpu_required: u32,

    pub status: PodStatus,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Pod {
    /// Node id for display; pods without a placement show as unassigned.
    pub fn node_label(&self) -> &str {
        match self.node_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => "unassigned",
        }
    }
}

/// A complete, internally consistent view of the cluster at one point in
/// time: the node map and pod map produced by the same refresh.
#[derive(Debug, Clone, Default)]
pub struct ClusterSnapshot {
    /// Sequence number of the refresh that produced this snapshot.
    pub seq: u64,

    pub nodes: BTreeMap<String, Node>,
    pub pods: BTreeMap<String, Pod>,
}

impl ClusterSnapshot {
    /// The empty snapshot shown before the first successful refresh.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Process-wide holder of the current [`ClusterSnapshot`].
///
/// There is no partial update operation: `replace` swaps the whole snapshot
/// or does nothing. Refreshes are tagged with an issue-time sequence number,
/// and a completion is only applied if it is newer than the last applied one,
/// so a slow refresh that started earlier can never overwrite a faster one
/// that started later.
pub struct SnapshotStore {
    snapshot: ArcSwap<ClusterSnapshot>,
    applied_seq: Mutex<u64>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(ClusterSnapshot::empty()),
            applied_seq: Mutex::new(0),
        }
    }

    /// The latest applied snapshot. Lock-free; safe to call from renderers
    /// at any rate.
    pub fn current(&self) -> Arc<ClusterSnapshot> {
        self.snapshot.load_full()
    }

    /// Atomically swap in a new snapshot if `seq` is newer than the last
    /// applied sequence. Returns whether the snapshot was applied.
    pub fn replace(
        &self,
        seq: u64,
        nodes: BTreeMap<String, Node>,
        pods: BTreeMap<String, Pod>,
    ) -> bool {
        let mut applied = self.applied_seq.lock().unwrap_or_else(|e| e.into_inner());
        if seq <= *applied {
            return false;
        }
        *applied = seq;
        self.snapshot.store(Arc::new(ClusterSnapshot { seq, nodes, pods }));
        true
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(cores: u32) -> Node {
        Node {
            cpu_cores: cores,
            available_cpu: cores,
            status: NodeStatus::Healthy,
            pod_ids: vec![],
            last_heartbeat: None,
            created_at: None,
            container_ref: None,
        }
    }

    fn pod(node_id: Option<&str>, status: PodStatus) -> Pod {
        Pod {
            node_id: node_id.map(str::to_string),
            cpu_required: 1,
            status,
            created_at: None,
        }
    }

    #[test]
    fn store_starts_empty() {
        let store = SnapshotStore::new();
        let snapshot = store.current();
        assert_eq!(snapshot.seq, 0);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.pods.is_empty());
    }

    #[test]
    fn replace_swaps_both_maps_together() {
        let store = SnapshotStore::new();

        let nodes = BTreeMap::from([("node-1".to_string(), node(4))]);
        let pods = BTreeMap::from([(
            "pod-1".to_string(),
            pod(Some("node-1"), PodStatus::Running),
        )]);

        assert!(store.replace(1, nodes, pods));

        let snapshot = store.current();
        assert_eq!(snapshot.seq, 1);
        assert!(snapshot.nodes.contains_key("node-1"));
        assert!(snapshot.pods.contains_key("pod-1"));
    }

    #[test]
    fn stale_sequence_is_discarded() {
        let store = SnapshotStore::new();

        let newer = BTreeMap::from([("node-2".to_string(), node(8))]);
        assert!(store.replace(2, newer, BTreeMap::new()));

        // A refresh issued earlier but completing later must not win.
        let older = BTreeMap::from([("node-1".to_string(), node(4))]);
        assert!(!store.replace(1, older, BTreeMap::new()));

        let snapshot = store.current();
        assert_eq!(snapshot.seq, 2);
        assert!(snapshot.nodes.contains_key("node-2"));
        assert!(!snapshot.nodes.contains_key("node-1"));
    }

    #[test]
    fn equal_sequence_is_discarded() {
        let store = SnapshotStore::new();
        assert!(store.replace(1, BTreeMap::new(), BTreeMap::new()));
        assert!(!store.replace(1, BTreeMap::new(), BTreeMap::new()));
    }

    #[test]
    fn pod_node_label_defaults_to_unassigned() {
        assert_eq!(pod(None, PodStatus::Pending).node_label(), "unassigned");
        assert_eq!(pod(Some(""), PodStatus::Pending).node_label(), "unassigned");
        assert_eq!(
            pod(Some("node-1"), PodStatus::Running).node_label(),
            "node-1"
        );
    }

    #[test]
    fn node_wire_format_roundtrip() {
        let json = r#"{
            "cpu_cores": 4,
            "available_cpu": 2,
            "status": "healthy",
            "pods": ["pod-1", "pod-2"],
            "last_heartbeat": "17 December 2025: 12:00:00"
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.cpu_cores, 4);
        assert_eq!(node.available_cpu, 2);
        assert_eq!(node.status, NodeStatus::Healthy);
        assert_eq!(node.pod_ids, vec!["pod-1", "pod-2"]);
        assert!(node.container_ref.is_none());
    }

    #[test]
    fn pod_wire_format_tolerates_missing_node() {
        let json = r#"{ "cpu_required": 2, "status": "pending_reschedule" }"#;
        let pod: Pod = serde_json::from_str(json).unwrap();
        assert!(pod.node_id.is_none());
        assert_eq!(pod.status, PodStatus::PendingReschedule);
    }
}
