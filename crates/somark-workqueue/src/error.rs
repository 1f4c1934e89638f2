//! Queue errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("Task timed out after {0}s")]
    Timeout(u64),

    /// The pool itself misbehaved, as opposed to a task.
    #[error("Worker error: {0}")]
    WorkerError(String),

    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),
}
