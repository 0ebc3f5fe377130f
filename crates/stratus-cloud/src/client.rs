//! Resource client trait definition

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One remote resource as reported by its service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<S> {
    /// Service-assigned identifier
    pub id: String,

    /// Human-assigned name; not guaranteed unique
    pub name: String,

    /// Current status as reported by the service
    pub status: S,
}

/// Unified interface to one resource type of a cloud service.
///
/// Implementations wrap the service API; the orchestrator drives creation,
/// polling and deletion through this trait alone.
#[async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    /// Parameters for creating one resource
    type Spec: Send + Sync;

    /// Service-reported status payload
    type Status: Send + Sync;

    /// Server-side filter for listing
    type Filter: Send + Sync;

    /// Create a resource and return its id. Creation is asynchronous on the
    /// service side; the returned resource is not necessarily ready.
    async fn create(&self, spec: &Self::Spec) -> Result<String>;

    /// Fetch one resource by id. `NotFound` when it does not exist.
    async fn get(&self, id: &str) -> Result<Resource<Self::Status>>;

    /// Request deletion. Deletion is asynchronous; the resource may linger
    /// until the service finishes tearing it down.
    async fn delete(&self, id: &str) -> Result<()>;

    /// List resources matching a filter.
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Resource<Self::Status>>>;
}

/// Resolve a name to exactly one resource id.
///
/// Zero matches is `NotFound`, more than one is `MultipleFound`; callers
/// needing "first match" semantics should use `list` directly.
pub async fn find_unique<C: ResourceClient>(
    client: &C,
    name: &str,
    filter: &C::Filter,
) -> Result<String> {
    let mut matches = client.list(filter).await?;
    matches.retain(|r| r.name == name);

    match matches.len() {
        0 => Err(CloudError::NotFound(name.to_string())),
        1 => Ok(matches.remove(0).id),
        count => Err(CloudError::MultipleFound {
            name: name.to_string(),
            count,
        }),
    }
}
