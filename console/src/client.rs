//! HTTP client for the cluster manager API.
//!
//! Wraps the backend contract (list nodes/pods, add/stop/resume node, launch
//! pod) and maps every failure into the [`ApiError`] taxonomy. Callers never
//! see a half-parsed body: a 2xx response either parses into the expected
//! shape or becomes `ApiError::Parse`.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::state::{Node, Pod};

/// API client for the cluster manager.
#[derive(Debug, Clone)]
pub struct ClusterClient {
    client: reqwest::Client,
    base_url: String,
}

impl ClusterClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List all nodes.
    pub async fn list_nodes(&self) -> Result<NodeList, ApiError> {
        let response = self.client.get(self.url("/nodes")).send().await?;
        self.handle_response(response, "Failed to list nodes").await
    }

    /// List all pods.
    pub async fn list_pods(&self) -> Result<PodList, ApiError> {
        let response = self.client.get(self.url("/pods")).send().await?;
        self.handle_response(response, "Failed to list pods").await
    }

    /// Register a new worker node with the given capacity.
    pub async fn add_node(&self, cpu_cores: u32) -> Result<AddNodeResponse, ApiError> {
        debug!(cpu_cores, "adding node");
        let response = self
            .client
            .post(self.url("/nodes"))
            .json(&AddNodeRequest { cpu_cores })
            .send()
            .await?;
        self.handle_response(response, "Failed to add node").await
    }

    /// Stop a node. The backend reschedules its pods as a side effect.
    pub async fn stop_node(&self, node_id: &str) -> Result<(), ApiError> {
        debug!(node_id, "stopping node");
        let response = self
            .client
            .post(self.url(&format!("/nodes/{node_id}/stop")))
            .send()
            .await?;
        self.handle_response::<serde_json::Value>(response, "Failed to stop node")
            .await
            .map(|_| ())
    }

    /// Resume a previously stopped node.
    pub async fn resume_node(&self, node_id: &str) -> Result<(), ApiError> {
        debug!(node_id, "resuming node");
        let response = self
            .client
            .post(self.url(&format!("/nodes/{node_id}/resume")))
            .send()
            .await?;
        self.handle_response::<serde_json::Value>(response, "Failed to resume node")
            .await
            .map(|_| ())
    }

    /// Launch a pod; the backend picks the placement.
    pub async fn launch_pod(&self, cpu_required: u32) -> Result<LaunchPodResponse, ApiError> {
        debug!(cpu_required, "launching pod");
        let response = self
            .client
            .post(self.url("/pods"))
            .json(&LaunchPodRequest { cpu_required })
            .send()
            .await?;
        self.handle_response(response, "Failed to launch pod").await
    }

    /// Parse a 2xx body into the expected shape, or turn any other status
    /// into an `ApiError::Api` carrying the backend's error detail.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| fallback.to_string());
            Err(ApiError::api(status.as_u16(), message))
        }
    }
}

/// Error response structure shared by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// `GET /nodes` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeList {
    pub nodes: BTreeMap<String, Node>,

    #[serde(default)]
    pub total_nodes: Option<u64>,

    #[serde(default)]
    pub last_updated: Option<String>,
}

/// `GET /pods` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PodList {
    pub pods: BTreeMap<String, Pod>,

    #[serde(default)]
    pub total_pods: Option<u64>,

    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddNodeRequest {
    cpu_cores: u32,
}

/// `POST /nodes` success response.
#[derive(Debug, Clone, Deserialize)]
pub struct AddNodeResponse {
    pub node_id: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub available_cpu: Option<u32>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct LaunchPodRequest {
    cpu_required: u32,
}

/// `POST /pods` success response. `node_id` may be absent when the scheduler
/// accepted the pod but could not place it yet.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchPodResponse {
    pub pod_id: String,

    #[serde(default)]
    pub node_id: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
