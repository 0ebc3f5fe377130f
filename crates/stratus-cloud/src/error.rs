//! Lifecycle orchestration error types

use std::fmt;
use thiserror::Error;

/// Resource lifecycle errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Found {count} resources named {name}, expected exactly one")]
    MultipleFound { name: String, count: usize },

    #[error("Timed out after {0} polling attempts")]
    Timeout(u32),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("API error: {0}")]
    Api(String),

    #[error("Resource {id} entered failure state: {phase}")]
    ErrorState { id: String, phase: String },
}

impl CloudError {
    /// True when the error means the resource does not exist, as opposed to
    /// a failure talking about it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// One failed item out of a batch, tagged with its input position.
#[derive(Debug)]
pub struct ItemError {
    pub index: usize,
    pub error: CloudError,
}

/// All failures from a batch operation, ordered by input position.
///
/// Never constructed empty: a batch with no failures reports `None`, not an
/// aggregate with zero entries.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<ItemError>,
}

impl AggregateError {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, index: usize, error: CloudError) {
        self.errors.push(ItemError { index, error });
    }

    pub(crate) fn sort(&mut self) {
        self.errors.sort_by_key(|e| e.index);
    }

    /// Collapse into `None` when no item actually failed.
    pub(crate) fn into_option(self) -> Option<Self> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn errors(&self) -> &[ItemError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} item(s) failed:", self.errors.len())?;
        for item in &self.errors {
            writeln!(f, "  [{}] {}", item.index, item.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
