//! Fleet console
//!
//! Live operator console for a distributed compute cluster. The console:
//! - Polls the cluster manager for the authoritative node and pod state
//! - Applies each poll as an all-or-nothing snapshot swap, so a partial
//!   fetch failure never corrupts the displayed view
//! - Dispatches operator commands (add node, stop/resume node, launch pod)
//!   and forces a refresh after every outcome
//! - Surfaces every outcome as a transient, self-expiring notification

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod state;
pub mod sync;
pub mod view;

pub use client::ClusterClient;
pub use config::Config;
pub use dispatch::CommandDispatcher;
pub use error::ApiError;
pub use notify::{Notification, NotificationCenter, Severity};
pub use state::{ClusterSnapshot, Node, NodeStatus, Pod, PodStatus, SnapshotStore};
pub use sync::SyncEngine;
