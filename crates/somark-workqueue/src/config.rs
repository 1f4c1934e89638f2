//! Pool configuration.

use serde::{Deserialize, Serialize};

/// Pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of tasks in flight.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-task time limit in seconds (0 = unlimited).
    #[serde(default)]
    pub task_timeout_secs: u64,
}

fn default_max_workers() -> usize {
    4
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            task_timeout_secs: 0,
        }
    }
}

impl PoolConfig {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            ..Default::default()
        }
    }

    pub fn with_task_timeout_secs(mut self, secs: u64) -> Self {
        self.task_timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.task_timeout_secs, 0);
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::new(8).with_task_timeout_secs(120);
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.task_timeout_secs, 120);
    }
}
