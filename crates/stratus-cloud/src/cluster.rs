//! Container cluster provisioning: node batches scoped to one cluster.

use crate::client::ResourceClient;
use crate::error::{AggregateError, CloudError, Result};
use crate::orchestrator::{BatchResult, Orchestrator};
use crate::poll::{PollConfig, DEFAULT_INTERVAL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CLUSTER_AVAILABLE: &str = "Available";
pub const NODE_ACTIVE: &str = "Active";

/// Cluster and node transitions take minutes; a larger budget than the
/// generic default.
pub const CLUSTER_POLL_ATTEMPTS: u32 = 120;

/// Phases the service reports as terminal failures.
const ERROR_PHASES: &[&str] = &["Error", "Unavailable"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub phase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub phase: String,
}

fn check_phase(id: &str, phase: &str, wanted: &str) -> Result<bool> {
    if ERROR_PHASES.contains(&phase) {
        return Err(CloudError::ErrorState {
            id: id.to_string(),
            phase: phase.to_string(),
        });
    }
    Ok(phase == wanted)
}

/// Provisions node batches against one container cluster.
///
/// The node client is cluster-scoped: its ids and specs are only meaningful
/// inside the cluster this provisioner was built for.
pub struct ClusterProvisioner<CC, NC>
where
    CC: ResourceClient<Status = ClusterStatus>,
    NC: ResourceClient<Status = NodeStatus>,
{
    clusters: Orchestrator<CC>,
    nodes: Orchestrator<NC>,
    cluster_id: String,
}

impl<CC, NC> ClusterProvisioner<CC, NC>
where
    CC: ResourceClient<Status = ClusterStatus>,
    NC: ResourceClient<Status = NodeStatus>,
{
    pub fn new(clusters: Orchestrator<CC>, nodes: Orchestrator<NC>, cluster_id: String) -> Self {
        Self {
            clusters,
            nodes,
            cluster_id,
        }
    }

    pub fn scoped(cluster_client: Arc<CC>, node_client: Arc<NC>, cluster_id: String) -> Self {
        let poll = PollConfig::new(CLUSTER_POLL_ATTEMPTS, DEFAULT_INTERVAL);
        Self::new(
            Orchestrator::new(cluster_client).with_poll_config(poll),
            Orchestrator::new(node_client).with_poll_config(poll),
            cluster_id,
        )
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Wait for the cluster itself to be usable. Nodes cannot be added to a
    /// cluster that is still provisioning.
    pub async fn wait_cluster_available(&self) -> Result<()> {
        let cluster_id = self.cluster_id.clone();
        self.clusters
            .wait_ready(&self.cluster_id, move |status| {
                check_phase(&cluster_id, &status.phase, CLUSTER_AVAILABLE)
            })
            .await
    }

    /// Create a batch of nodes and wait for each to become active.
    ///
    /// The cluster is awaited first; a cluster stuck provisioning fails the
    /// whole batch before any node is requested.
    pub async fn create_nodes(&self, specs: Vec<NC::Spec>) -> Result<BatchResult<String>>
    where
        NC::Spec: 'static,
    {
        self.wait_cluster_available().await?;
        tracing::info!(
            cluster_id = %self.cluster_id,
            count = specs.len(),
            "creating cluster nodes"
        );

        Ok(self
            .nodes
            .create_all(specs, |id: &str, status: &NodeStatus| {
                check_phase(id, &status.phase, NODE_ACTIVE)
            })
            .await)
    }

    /// Delete a batch of nodes and wait for each to disappear.
    pub async fn delete_nodes(&self, ids: Vec<String>) -> Option<AggregateError> {
        tracing::info!(
            cluster_id = %self.cluster_id,
            count = ids.len(),
            "deleting cluster nodes"
        );
        self.nodes.delete_all(ids).await
    }

    /// Current status of each node, per item.
    pub async fn node_statuses(&self, ids: Vec<String>) -> BatchResult<NodeStatus> {
        self.nodes.status_all(ids).await
    }
}
