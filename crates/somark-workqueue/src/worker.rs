//! Worker pool for batch execution.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;
use crate::error::QueueError;
use crate::task::{Task, TaskOutcome, TaskStatus};

/// Task handler trait.
#[async_trait]
pub trait TaskHandler<P: Send + Sync>: Send + Sync {
    /// Execute a task.
    async fn handle(&self, task: &Task<P>) -> Result<(), QueueError>;
}

/// A single worker slot.
pub struct Worker {
    id: usize,
    running: AtomicBool,
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
}

impl Worker {
    /// Create a new worker.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            running: AtomicBool::new(false),
            tasks_completed: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
        }
    }

    /// Get worker ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check if worker is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get completed task count.
    pub fn tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::SeqCst)
    }

    /// Get failed task count.
    pub fn tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::SeqCst)
    }

    fn try_claim(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Process a task, bounded by `timeout` when given.
    pub async fn process<P, H>(
        &self,
        task: &Task<P>,
        handler: &H,
        timeout: Option<Duration>,
    ) -> TaskOutcome
    where
        P: Send + Sync,
        H: TaskHandler<P> + ?Sized,
    {
        debug!("Worker {} processing task {} ({})", self.id, task.id, task.name);

        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, handler.handle(task)).await {
                Ok(result) => result,
                Err(_) => Err(QueueError::Timeout(limit.as_secs())),
            },
            None => handler.handle(task).await,
        };

        match result {
            Ok(()) => {
                self.tasks_completed.fetch_add(1, Ordering::SeqCst);
                debug!("Worker {} completed task {}", self.id, task.id);
                TaskOutcome::completed(task.id, &task.name)
            }
            Err(e) => {
                self.tasks_failed.fetch_add(1, Ordering::SeqCst);
                let status = match e {
                    QueueError::Timeout(_) => TaskStatus::TimedOut,
                    _ => TaskStatus::Failed,
                };
                error!("Worker {} failed task {} ({}): {}", self.id, task.id, task.name, e);
                TaskOutcome::failed(task.id, &task.name, status, e.to_string())
            }
        }
    }
}

/// A claimed worker plus its permit. The worker is released before the permit
/// goes back to the pool, including when the task panics.
struct Slot {
    worker: Arc<Worker>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.worker.release();
    }
}

/// Result of one [`WorkerPool::run_all`] call.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    /// One entry per task, ordered by task id.
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchReport {
    fn record(&mut self, outcome: TaskOutcome) {
        match outcome.status {
            TaskStatus::Completed => self.succeeded += 1,
            TaskStatus::TimedOut => self.timed_out += 1,
            _ => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn settled(&self) -> usize {
        self.outcomes.len()
    }

    /// `"X of Y succeeded."`
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded.", self.succeeded, self.total)
    }
}

/// Worker pool for concurrent task execution.
pub struct WorkerPool {
    config: PoolConfig,
    semaphore: Arc<Semaphore>,
    workers: Vec<Arc<Worker>>,
    running: Arc<AtomicBool>,
    total_processed: Arc<AtomicU64>,
    total_failed: Arc<AtomicU64>,
}

impl WorkerPool {
    /// Create a new worker pool.
    pub fn new(config: PoolConfig) -> Result<Self, QueueError> {
        if config.max_workers == 0 {
            return Err(QueueError::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        let workers = (0..config.max_workers).map(|id| Arc::new(Worker::new(id))).collect();
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(config.max_workers)),
            workers,
            config,
            running: Arc::new(AtomicBool::new(false)),
            total_processed: Arc::new(AtomicU64::new(0)),
            total_failed: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Check if a batch is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Tasks settled successfully over the pool's lifetime.
    pub fn total_processed(&self) -> u64 {
        self.total_processed.load(Ordering::SeqCst)
    }

    /// Tasks that failed, timed out or panicked over the pool's lifetime.
    pub fn total_failed(&self) -> u64 {
        self.total_failed.load(Ordering::SeqCst)
    }

    /// Get number of available workers.
    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    fn task_timeout(&self) -> Option<Duration> {
        (self.config.task_timeout_secs > 0).then(|| Duration::from_secs(self.config.task_timeout_secs))
    }

    async fn acquire_slot(&self) -> Result<Slot, QueueError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| QueueError::WorkerError(e.to_string()))?;

        // Holding a permit guarantees at least one idle worker.
        let worker = self
            .workers
            .iter()
            .find(|worker| worker.try_claim())
            .cloned()
            .ok_or_else(|| QueueError::WorkerError("no idle worker for permit".to_string()))?;

        Ok(Slot {
            worker,
            _permit: permit,
        })
    }

    /// Run every task, at most `max_workers` at a time, and wait for all of them
    /// to settle.
    ///
    /// Dispatch waits while all workers are busy. A task that fails, times out
    /// or panics is recorded and does not stop the others.
    pub async fn run_all<P, H>(&self, tasks: Vec<Task<P>>, handler: Arc<H>) -> Result<BatchReport, QueueError>
    where
        P: Send + Sync + 'static,
        H: TaskHandler<P> + ?Sized + 'static,
    {
        self.running.store(true, Ordering::SeqCst);
        info!(
            "Worker pool running {} tasks with {} workers",
            tasks.len(),
            self.config.max_workers
        );

        let mut report = BatchReport {
            total: tasks.len(),
            ..Default::default()
        };
        let mut in_flight: HashMap<tokio::task::Id, (usize, String)> = HashMap::new();
        let mut set = JoinSet::new();
        let timeout = self.task_timeout();

        for task in tasks {
            let slot = match self.acquire_slot().await {
                Ok(slot) => slot,
                Err(e) => {
                    self.running.store(false, Ordering::SeqCst);
                    set.shutdown().await;
                    return Err(e);
                }
            };

            while let Some(joined) = set.try_join_next_with_id() {
                self.settle(joined, &mut in_flight, &mut report);
            }

            let handler = handler.clone();
            let key = (task.id, task.name.clone());
            let handle = set.spawn(async move {
                let outcome = slot.worker.process(&task, handler.as_ref(), timeout).await;
                drop(slot);
                outcome
            });
            in_flight.insert(handle.id(), key);
        }

        while let Some(joined) = set.join_next_with_id().await {
            self.settle(joined, &mut in_flight, &mut report);
        }

        report.outcomes.sort_by_key(|outcome| outcome.id);
        self.running.store(false, Ordering::SeqCst);
        info!("{}", report.summary());
        Ok(report)
    }

    fn settle(
        &self,
        joined: Result<(tokio::task::Id, TaskOutcome), JoinError>,
        in_flight: &mut HashMap<tokio::task::Id, (usize, String)>,
        report: &mut BatchReport,
    ) {
        let outcome = match joined {
            Ok((id, outcome)) => {
                in_flight.remove(&id);
                outcome
            }
            Err(join_error) => {
                let (task_id, name) = in_flight
                    .remove(&join_error.id())
                    .unwrap_or((usize::MAX, String::from("<unknown>")));
                warn!("Task {} ({}) aborted: {}", task_id, name, join_error);
                TaskOutcome::failed(task_id, name, TaskStatus::Failed, join_error.to_string())
            }
        };

        if outcome.succeeded() {
            self.total_processed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.total_failed.fetch_add(1, Ordering::SeqCst);
        }
        report.record(outcome);
        info!("{} of {} settled", report.settled(), report.total);
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
