use super::*;
use std::sync::atomic::AtomicUsize;

struct TestHandler;

#[async_trait]
impl TaskHandler<u64> for TestHandler {
    async fn handle(&self, _task: &Task<u64>) -> Result<(), QueueError> {
        Ok(())
    }
}

/// Sleeps for `payload` ms and tracks the peak number of concurrent calls.
#[derive(Default)]
struct TrackingHandler {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl TaskHandler<u64> for TrackingHandler {
    async fn handle(&self, task: &Task<u64>) -> Result<(), QueueError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(task.payload)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fails odd ids and panics on id 4.
struct FlakyHandler;

#[async_trait]
impl TaskHandler<u64> for FlakyHandler {
    async fn handle(&self, task: &Task<u64>) -> Result<(), QueueError> {
        if task.id == 4 {
            panic!("handler blew up");
        }
        if task.id % 2 == 1 {
            return Err(QueueError::ExecutionFailed(format!("odd task {}", task.id)));
        }
        Ok(())
    }
}

fn tasks(count: usize, payload: u64) -> Vec<Task<u64>> {
    (0..count).map(|id| Task::new(id, format!("{:07}", id), payload)).collect()
}

#[test]
fn test_worker_new() {
    let worker = Worker::new(1);
    assert_eq!(worker.id(), 1);
    assert!(!worker.is_running());
    assert_eq!(worker.tasks_completed(), 0);
}

#[test]
fn test_worker_claim_and_release() {
    let worker = Worker::new(0);
    assert!(worker.try_claim());
    assert!(worker.is_running());
    assert!(!worker.try_claim());
    worker.release();
    assert!(worker.try_claim());
}

#[tokio::test]
async fn test_worker_process_success() {
    let worker = Worker::new(1);
    let task = Task::new(0, "a", 0u64);

    let outcome = worker.process(&task, &TestHandler, None).await;
    assert!(outcome.succeeded());
    assert_eq!(worker.tasks_completed(), 1);
    assert_eq!(worker.tasks_failed(), 0);
}

#[tokio::test]
async fn test_worker_process_failure() {
    let worker = Worker::new(1);
    let task = Task::new(1, "b", 0u64);

    let outcome = worker.process(&task, &FlakyHandler, None).await;
    assert_eq!(outcome.status, TaskStatus::Failed);
    assert!(outcome.error.unwrap().contains("odd task 1"));
    assert_eq!(worker.tasks_failed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_worker_process_timeout() {
    let worker = Worker::new(0);
    let task = Task::new(0, "slow", 10_000u64);
    let handler = TrackingHandler::default();

    let outcome = worker.process(&task, &handler, Some(Duration::from_secs(1))).await;
    assert_eq!(outcome.status, TaskStatus::TimedOut);
}

#[test]
fn test_worker_pool_new() {
    let pool = WorkerPool::new(PoolConfig::new(4)).unwrap();
    assert!(!pool.is_running());
    assert_eq!(pool.available_workers(), 4);
    assert_eq!(pool.workers().len(), 4);
}

#[test]
fn test_worker_pool_rejects_zero_workers() {
    let result = WorkerPool::new(PoolConfig::new(0));
    assert!(matches!(result, Err(QueueError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_run_all_empty() {
    let pool = WorkerPool::new(PoolConfig::default()).unwrap();
    let report = pool.run_all(Vec::new(), Arc::new(TestHandler)).await.unwrap();
    assert_eq!(report.total, 0);
    assert_eq!(report.summary(), "0 of 0 succeeded.");
}

#[tokio::test]
async fn test_run_all_bounds_concurrency() {
    let pool = WorkerPool::new(PoolConfig::new(3)).unwrap();
    let handler = Arc::new(TrackingHandler::default());

    let report = pool.run_all(tasks(10, 20), handler.clone()).await.unwrap();

    assert_eq!(report.succeeded, 10);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 10);
    assert!(handler.peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(pool.available_workers(), 3);
    assert!(pool.workers().iter().all(|w| !w.is_running()));
    assert!(!pool.is_running());
}

#[tokio::test]
async fn test_run_all_failures_do_not_abort_batch() {
    let pool = WorkerPool::new(PoolConfig::new(2)).unwrap();

    let report = pool.run_all(tasks(6, 0), Arc::new(FlakyHandler)).await.unwrap();

    // ids 0, 2 succeed; 1, 3, 5 fail; 4 panics
    assert_eq!(report.total, 6);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 4);
    assert_eq!(report.summary(), "2 of 6 succeeded.");
    assert_eq!(pool.total_processed(), 2);
    assert_eq!(pool.total_failed(), 4);

    let ids: Vec<usize> = report.outcomes.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(report.outcomes[4].name, "0000004");
    assert_eq!(report.outcomes[4].status, TaskStatus::Failed);

    // The panicking task's worker went back to the pool.
    assert_eq!(pool.available_workers(), 2);
    assert!(pool.workers().iter().all(|w| !w.is_running()));
}

#[tokio::test(start_paused = true)]
async fn test_run_all_timeout_counts_separately() {
    let pool = WorkerPool::new(PoolConfig::new(2).with_task_timeout_secs(1)).unwrap();
    let mut batch = tasks(2, 10);
    batch.push(Task::new(2, "slow", 5_000));

    let report = pool.run_all(batch, Arc::new(TrackingHandler::default())).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.timed_out, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.outcomes[2].status, TaskStatus::TimedOut);
}

#[tokio::test]
async fn test_pool_reusable_across_batches() {
    let pool = WorkerPool::new(PoolConfig::new(2)).unwrap();
    let handler = Arc::new(TestHandler);

    pool.run_all(tasks(3, 0), handler.clone()).await.unwrap();
    pool.run_all(tasks(2, 0), handler).await.unwrap();
    assert_eq!(pool.total_processed(), 5);
}
