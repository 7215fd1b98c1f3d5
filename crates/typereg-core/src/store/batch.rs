//! Outcome of best-effort batch operations.

use crate::error::Error;

/// Result of a batch operation that processes every item independently.
///
/// Failing items never abort the batch. They are collected next to the
/// successes so callers can decide whether partial failure is fatal.
#[derive(Debug)]
pub struct BatchOutcome<I, T> {
    /// Results of the items that succeeded, in input order.
    pub succeeded: Vec<T>,
    /// Inputs that failed, with their errors, in input order.
    pub failed: Vec<(I, Error)>,
}

impl<I, T> Default for BatchOutcome<I, T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<I, T> BatchOutcome<I, T> {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful item.
    pub fn push_success(&mut self, value: T) {
        self.succeeded.push(value);
    }

    /// Record a failed item.
    pub fn push_failure(&mut self, input: I, error: Error) {
        self.failed.push((input, error));
    }

    /// True when no item failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of successful items.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed items.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Keep only the successes. Failures have already been logged.
    pub fn into_succeeded(self) -> Vec<T> {
        self.succeeded
    }

    /// Treat any failure as fatal, returning the first error.
    pub fn into_result(self) -> Result<Vec<T>, Error> {
        match self.failed.into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(self.succeeded),
        }
    }
}
