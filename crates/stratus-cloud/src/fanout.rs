//! Concurrent fan-out over a batch of items with gather-all semantics.
//!
//! Every item runs to completion (or failure) regardless of what happens to
//! its siblings; one failed item never aborts the rest. Results come back
//! in input order.

use crate::error::{AggregateError, CloudError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Fan-out bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOutConfig {
    /// Maximum items in flight at once. `None` runs all items concurrently.
    pub concurrency: Option<usize>,
}

impl FanOutConfig {
    pub fn bounded(concurrency: usize) -> Self {
        Self {
            concurrency: Some(concurrency),
        }
    }
}

/// Run `op` once per item on its own task and gather all outcomes.
///
/// The returned vector is parallel to `items`: slot `i` holds item `i`'s
/// outcome. Cancellation is checked per item before its operation starts;
/// already-running operations finish normally.
pub async fn fan_out<T, R, F, Fut>(
    items: Vec<T>,
    config: &FanOutConfig,
    cancel: &CancellationToken,
    op: F,
) -> Vec<Result<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(usize, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let count = items.len();
    if count == 0 {
        return Vec::new();
    }

    let op = Arc::new(op);
    let limiter = config.concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
    // Sized to the batch so no worker ever blocks on send.
    let (tx, mut rx) = mpsc::channel::<(usize, Result<R>)>(count);

    for (index, item) in items.into_iter().enumerate() {
        let op = Arc::clone(&op);
        let limiter = limiter.clone();
        let cancel = cancel.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let result = run_one(index, item, op, limiter, cancel).await;
            let _ = tx.send((index, result)).await;
        });
    }
    drop(tx);

    let mut slots: Vec<Option<Result<R>>> = (0..count).map(|_| None).collect();
    while let Some((index, result)) = rx.recv().await {
        slots[index] = Some(result);
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(CloudError::Api(
                    "worker dropped without reporting".to_string(),
                ))
            })
        })
        .collect()
}

async fn run_one<T, R, F, Fut>(
    index: usize,
    item: T,
    op: Arc<F>,
    limiter: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
) -> Result<R>
where
    F: Fn(usize, T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let _permit = match limiter {
        Some(semaphore) => Some(
            semaphore
                .acquire_owned()
                .await
                .map_err(|_| CloudError::Cancelled)?,
        ),
        None => None,
    };

    if cancel.is_cancelled() {
        return Err(CloudError::Cancelled);
    }

    (*op)(index, item).await
}

/// Separate per-item successes from failures.
///
/// Successes keep their input positions; failures are collected into one
/// aggregate, index-tagged and ordered. `None` means nothing failed.
pub fn split_results<R>(results: Vec<Result<R>>) -> (Vec<Option<R>>, Option<AggregateError>) {
    let mut values = Vec::with_capacity(results.len());
    let mut aggregate = AggregateError::new();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => values.push(Some(value)),
            Err(error) => {
                values.push(None);
                aggregate.push(index, error);
            }
        }
    }

    aggregate.sort();
    (values, aggregate.into_option())
}
