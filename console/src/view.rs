//! Table rendering for nodes, pods, and notifications.
//!
//! Pure presentation over the snapshot store and notification queue; no
//! state of its own and nothing here can fail.

use colored::Colorize;
use tabled::{Table, Tabled};

use crate::notify::{Notification, Severity};
use crate::state::{ClusterSnapshot, Node, NodeStatus, Pod, PodStatus};

/// Longest container reference shown before truncation.
const CONTAINER_REF_DISPLAY_LEN: usize = 16;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "CPU (avail/total)")]
    cpu: String,

    #[tabled(rename = "Pods")]
    pods: usize,

    #[tabled(rename = "Last heartbeat")]
    last_heartbeat: String,

    #[tabled(rename = "Container")]
    container: String,
}

#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Node")]
    node: String,

    #[tabled(rename = "CPU")]
    cpu_required: u32,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Created")]
    created: String,
}

fn node_row(id: &str, node: &Node) -> NodeRow {
    NodeRow {
        id: id.to_string(),
        status: color_node_status(node.status),
        cpu: format!("{}/{}", node.available_cpu, node.cpu_cores),
        pods: node.pod_ids.len(),
        last_heartbeat: node.last_heartbeat.as_deref().unwrap_or("-").to_string(),
        container: node
            .container_ref
            .as_deref()
            .map(|r| truncate_ref(r, CONTAINER_REF_DISPLAY_LEN))
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn pod_row(id: &str, pod: &Pod) -> PodRow {
    PodRow {
        id: id.to_string(),
        node: pod.node_label().to_string(),
        cpu_required: pod.cpu_required,
        status: color_pod_status(pod.status),
        created: pod.created_at.as_deref().unwrap_or("-").to_string(),
    }
}

fn color_node_status(status: NodeStatus) -> String {
    let label = status.as_str();
    match status {
        NodeStatus::Healthy => label.green().to_string(),
        NodeStatus::Stopped => label.red().to_string(),
        NodeStatus::Unhealthy => label.yellow().to_string(),
    }
}

fn color_pod_status(status: PodStatus) -> String {
    let label = status.as_str();
    match status {
        PodStatus::Running => label.green().to_string(),
        PodStatus::Pending | PodStatus::PendingReschedule => label.yellow().to_string(),
        PodStatus::Failed => label.red().to_string(),
    }
}

/// Shorten an opaque container reference for display.
fn truncate_ref(reference: &str, max: usize) -> String {
    if reference.chars().count() <= max {
        reference.to_string()
    } else {
        let head: String = reference.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Render the node table.
pub fn render_nodes(snapshot: &ClusterSnapshot) -> String {
    let rows: Vec<_> = snapshot
        .nodes
        .iter()
        .map(|(id, node)| node_row(id, node))
        .collect();

    if rows.is_empty() {
        "No nodes registered.".dimmed().to_string()
    } else {
        Table::new(rows).to_string()
    }
}

/// Render the pod table.
pub fn render_pods(snapshot: &ClusterSnapshot) -> String {
    let rows: Vec<_> = snapshot
        .pods
        .iter()
        .map(|(id, pod)| pod_row(id, pod))
        .collect();

    if rows.is_empty() {
        "No pods scheduled.".dimmed().to_string()
    } else {
        Table::new(rows).to_string()
    }
}

/// Print the full cluster view: node table, pod table, section counts.
pub fn print_snapshot(snapshot: &ClusterSnapshot) {
    print_snapshot_nodes(snapshot);
    println!();
    print_snapshot_pods(snapshot);
}

/// Print only the node section.
pub fn print_snapshot_nodes(snapshot: &ClusterSnapshot) {
    println!("{}", format!("Nodes ({})", snapshot.nodes.len()).bold());
    println!("{}", render_nodes(snapshot));
}

/// Print only the pod section.
pub fn print_snapshot_pods(snapshot: &ClusterSnapshot) {
    println!("{}", format!("Pods ({})", snapshot.pods.len()).bold());
    println!("{}", render_pods(snapshot));
}

/// Print one notification line with a severity-colored label.
pub fn print_notification(notification: &Notification) {
    let label = match notification.severity {
        Severity::Info => "Info:".blue().bold(),
        Severity::Success => "Success:".green().bold(),
        Severity::Warning => "Warning:".yellow().bold(),
        Severity::Error => "Error:".red().bold(),
    };
    println!("{} {}", label, notification.message);
}

/// Print all active notifications in FIFO order.
pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        print_notification(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_snapshot() -> ClusterSnapshot {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "node-1".to_string(),
            Node {
                cpu_cores: 4,
                available_cpu: 2,
                status: NodeStatus::Healthy,
                pod_ids: vec!["pod-1".to_string()],
                last_heartbeat: Some("17 December 2025: 12:00:00".to_string()),
                created_at: None,
                container_ref: Some("runtime://abcdef0123456789deadbeef".to_string()),
            },
        );

        let mut pods = BTreeMap::new();
        pods.insert(
            "pod-1".to_string(),
            Pod {
                node_id: Some("node-1".to_string()),
                cpu_required: 2,
                status: PodStatus::Running,
                created_at: None,
            },
        );
        pods.insert(
            "pod-2".to_string(),
            Pod {
                node_id: None,
                cpu_required: 1,
                status: PodStatus::PendingReschedule,
                created_at: None,
            },
        );

        ClusterSnapshot {
            seq: 1,
            nodes,
            pods,
        }
    }

    #[test]
    fn truncate_ref_keeps_short_values() {
        assert_eq!(truncate_ref("short", 16), "short");
    }

    #[test]
    fn truncate_ref_shortens_long_values() {
        let truncated = truncate_ref("runtime://abcdef0123456789deadbeef", 16);
        assert_eq!(truncated, "runtime://abcdef...");
    }

    #[test]
    fn node_table_contains_capacity_and_pod_count() {
        colored::control::set_override(false);
        let rendered = render_nodes(&sample_snapshot());
        assert!(rendered.contains("node-1"));
        assert!(rendered.contains("2/4"));
        assert!(rendered.contains("healthy"));
    }

    #[test]
    fn pod_table_shows_unassigned_placement() {
        colored::control::set_override(false);
        let rendered = render_pods(&sample_snapshot());
        assert!(rendered.contains("pod-2"));
        assert!(rendered.contains("unassigned"));
        assert!(rendered.contains("pending_reschedule"));
    }

    #[test]
    fn empty_snapshot_renders_placeholders() {
        colored::control::set_override(false);
        let empty = ClusterSnapshot::empty();
        assert!(render_nodes(&empty).contains("No nodes registered."));
        assert!(render_pods(&empty).contains("No pods scheduled."));
    }
}
