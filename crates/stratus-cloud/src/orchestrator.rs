//! Batch lifecycle orchestration: create, await readiness, delete, inspect.

use crate::client::ResourceClient;
use crate::error::{AggregateError, Result};
use crate::fanout::{fan_out, split_results, FanOutConfig};
use crate::poll::{wait_for, PollConfig, PollOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of a batch operation: per-item results in input order, plus one
/// aggregate of every failure.
///
/// A slot can be filled even when its item appears in the aggregate: a
/// resource that was created but never became ready keeps its id in the
/// slot so the caller can retry or tear it down.
#[derive(Debug)]
pub struct BatchResult<R> {
    /// Slot `i` belongs to input item `i`; `None` where that item produced
    /// no value at all
    pub items: Vec<Option<R>>,

    /// All failures, index-tagged; `None` when every item succeeded
    pub error: Option<AggregateError>,
}

impl<R> BatchResult<R> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The successful values, input order preserved.
    pub fn successes(&self) -> impl Iterator<Item = &R> {
        self.items.iter().flatten()
    }

    /// All-or-nothing view: the values when everything succeeded, the
    /// aggregate otherwise.
    pub fn into_result(self) -> std::result::Result<Vec<R>, AggregateError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.items.into_iter().flatten().collect()),
        }
    }
}

/// Drives batches of one resource type through their lifecycle.
///
/// Cloning is cheap; clones share the client and cancellation token.
pub struct Orchestrator<C: ResourceClient> {
    client: Arc<C>,
    poll: PollConfig,
    fan_out: FanOutConfig,
    cancel: CancellationToken,
}

impl<C: ResourceClient> Clone for Orchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            poll: self.poll,
            fan_out: self.fan_out,
            cancel: self.cancel.clone(),
        }
    }
}

impl<C: ResourceClient> Orchestrator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            poll: PollConfig::default(),
            fan_out: FanOutConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_fan_out_config(mut self, fan_out: FanOutConfig) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Poll one resource until `ready` approves its status.
    ///
    /// `ready` may reject a status with an error (a terminal failure state);
    /// that aborts the wait immediately.
    pub async fn wait_ready<F>(&self, id: &str, ready: F) -> Result<()>
    where
        F: Fn(&C::Status) -> Result<bool>,
    {
        tracing::info!(id, "waiting for resource to become ready");
        let client = &self.client;
        let ready = &ready;
        wait_for(&self.poll, &self.cancel, move || async move {
            let resource = client.get(id).await?;
            if ready(&resource.status)? {
                Ok(PollOutcome::Done)
            } else {
                Ok(PollOutcome::Pending)
            }
        })
        .await
    }

    /// Poll one resource until the service reports it gone.
    pub async fn wait_absent(&self, id: &str) -> Result<()> {
        tracing::info!(id, "waiting for resource to disappear");
        let client = &self.client;
        wait_for(&self.poll, &self.cancel, move || async move {
            match client.get(id).await {
                Ok(_) => Ok(PollOutcome::Pending),
                Err(e) if e.is_not_found() => Ok(PollOutcome::Done),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Create every spec concurrently, then wait for each created resource
    /// to become ready. The readiness predicate receives the resource id
    /// alongside its status.
    ///
    /// Items whose creation failed are skipped in the wait phase but keep
    /// their slots in the result. An item that was created but never became
    /// ready keeps its id in the slot AND appears in the aggregate, so the
    /// caller can still retry or tear it down.
    pub async fn create_all<F>(&self, specs: Vec<C::Spec>, ready: F) -> BatchResult<String>
    where
        C::Spec: 'static,
        F: Fn(&str, &C::Status) -> Result<bool> + Send + Sync + 'static,
    {
        let this = self.clone();
        let created = fan_out(specs, &self.fan_out, &self.cancel, move |_, spec| {
            let this = this.clone();
            async move { this.client.create(&spec).await }
        })
        .await;

        // Wait only on the ids that creation actually produced, remembering
        // where each came from.
        let mut items: Vec<Option<String>> = Vec::with_capacity(created.len());
        let mut aggregate = AggregateError::new();
        let mut pending: Vec<(usize, String)> = Vec::new();
        for (index, result) in created.into_iter().enumerate() {
            match result {
                Ok(id) => {
                    pending.push((index, id.clone()));
                    items.push(Some(id));
                }
                Err(error) => {
                    items.push(None);
                    aggregate.push(index, error);
                }
            }
        }

        let this = self.clone();
        let ready = Arc::new(ready);
        let indices: Vec<usize> = pending.iter().map(|(i, _)| *i).collect();
        let ids: Vec<String> = pending.into_iter().map(|(_, id)| id).collect();

        let waited = fan_out(ids, &self.fan_out, &self.cancel, move |_, id| {
            let this = this.clone();
            let ready = Arc::clone(&ready);
            async move {
                this.wait_ready(&id, |status| (*ready)(&id, status)).await
            }
        })
        .await;

        for (index, result) in indices.into_iter().zip(waited) {
            if let Err(error) = result {
                aggregate.push(index, error);
            }
        }

        aggregate.sort();
        BatchResult {
            items,
            error: aggregate.into_option(),
        }
    }

    /// Request deletion of every id, then wait for each successfully
    /// requested deletion to complete. Ids already gone count as success.
    ///
    /// The two phases are barrier-synchronized: no absence poll starts
    /// until every delete call has returned.
    pub async fn delete_all(&self, ids: Vec<String>) -> Option<AggregateError> {
        let this = self.clone();
        let requested = fan_out(ids.clone(), &self.fan_out, &self.cancel, move |_, id| {
            let this = this.clone();
            async move {
                match this.client.delete(&id).await {
                    Ok(()) => Ok(true),
                    // Already gone: success, and nothing to wait for.
                    Err(e) if e.is_not_found() => Ok(false),
                    Err(e) => Err(e),
                }
            }
        })
        .await;

        let mut aggregate = AggregateError::new();
        let mut pending: Vec<(usize, String)> = Vec::new();
        for (index, result) in requested.into_iter().enumerate() {
            match result {
                Ok(true) => pending.push((index, ids[index].clone())),
                Ok(false) => {}
                Err(error) => aggregate.push(index, error),
            }
        }

        let this = self.clone();
        let indices: Vec<usize> = pending.iter().map(|(i, _)| *i).collect();
        let wait_ids: Vec<String> = pending.into_iter().map(|(_, id)| id).collect();

        let waited = fan_out(wait_ids, &self.fan_out, &self.cancel, move |_, id| {
            let this = this.clone();
            async move { this.wait_absent(&id).await }
        })
        .await;

        for (index, result) in indices.into_iter().zip(waited) {
            if let Err(error) = result {
                aggregate.push(index, error);
            }
        }

        aggregate.sort();
        aggregate.into_option()
    }

    /// Fetch the status of every id concurrently.
    pub async fn status_all(&self, ids: Vec<String>) -> BatchResult<C::Status>
    where
        C::Status: 'static,
    {
        let this = self.clone();
        let results = fan_out(ids, &self.fan_out, &self.cancel, move |_, id| {
            let this = this.clone();
            async move { Ok(this.client.get(&id).await?.status) }
        })
        .await;

        let (items, error) = split_results(results);
        BatchResult { items, error }
    }
}
