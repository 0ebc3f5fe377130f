//! Stratus Cloud Orchestration
//!
//! Async lifecycle management for OpenStack-compatible resources: bounded
//! status polling, concurrent fan-out over resource batches, and a
//! cluster-node provisioning flow built on both.
//!
//! # Gather-all semantics
//!
//! Batch operations never abort on the first failure. Every item runs to
//! its own outcome; failures come back index-tagged in one aggregate so a
//! caller always knows exactly which inputs succeeded.
//!
//! ```text
//! specs ──► create (fan-out) ──► poll until ready ──► BatchResult
//!             │ per-item task       │ bounded attempts
//!             └─ failures keep their slots, siblings continue
//! ```

pub mod client;
pub mod cluster;
pub mod error;
pub mod fanout;
pub mod orchestrator;
pub mod poll;

pub use client::{find_unique, Resource, ResourceClient};
pub use cluster::{
    ClusterProvisioner, ClusterStatus, NodeStatus, CLUSTER_AVAILABLE, CLUSTER_POLL_ATTEMPTS,
    NODE_ACTIVE,
};
pub use error::{AggregateError, CloudError, ItemError, Result};
pub use fanout::{fan_out, split_results, FanOutConfig};
pub use orchestrator::{BatchResult, Orchestrator};
pub use poll::{wait_for, PollConfig, PollOutcome, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};
