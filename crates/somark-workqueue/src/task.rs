//! Task definitions.

use serde::{Deserialize, Serialize};

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    TimedOut,
}

impl TaskStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

/// A unit of work submitted to the pool.
#[derive(Debug, Clone)]
pub struct Task<P> {
    /// Position in the batch.
    pub id: usize,
    /// Display name used in logs.
    pub name: String,
    pub payload: P,
}

impl<P> Task<P> {
    pub fn new(id: usize, name: impl Into<String>, payload: P) -> Self {
        Self {
            id,
            name: name.into(),
            payload,
        }
    }
}

/// How a task settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub id: usize,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn completed(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TaskStatus::Completed,
            error: None,
        }
    }

    pub fn failed(id: usize, name: impl Into<String>, status: TaskStatus, error: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
