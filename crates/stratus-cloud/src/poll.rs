//! Bounded polling loop with cooperative cancellation.

use crate::error::{CloudError, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Polling bounds shared by all wait operations.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Attempts before giving up
    pub max_attempts: u32,

    /// Pause between attempts
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

/// Verdict of a single poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Keep polling
    Pending,

    /// Condition reached, stop
    Done,
}

/// Poll `check` until it reports done, errors out, or the bounds run out.
///
/// An error from `check` aborts immediately; it is a verdict, not a
/// transient condition. Cancellation is observed during the sleep between
/// attempts, so an in-flight check always completes.
pub async fn wait_for<F, Fut>(
    config: &PollConfig,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome>>,
{
    if cancel.is_cancelled() {
        return Err(CloudError::Cancelled);
    }

    for attempt in 1..=config.max_attempts {
        match check().await? {
            PollOutcome::Done => return Ok(()),
            PollOutcome::Pending => {
                tracing::trace!(attempt, max = config.max_attempts, "condition pending");
            }
        }

        if attempt < config.max_attempts {
            tokio::select! {
                _ = tokio::time::sleep(config.interval) => {}
                _ = cancel.cancelled() => return Err(CloudError::Cancelled),
            }
        }
    }

    Err(CloudError::Timeout(config.max_attempts))
}
