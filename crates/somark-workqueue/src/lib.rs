//! # Somark Workqueue
//!
//! Bounded concurrency for batch runs.
//!
//! ## Features
//!
//! - Fixed number of worker slots; dispatch waits while all are busy
//! - Per-task timeout
//! - A failing or panicking task never aborts the rest of the batch
//! - Settled-task counters and a summary per run

pub mod config;
pub mod error;
pub mod task;
pub mod worker;

pub use config::PoolConfig;
pub use error::QueueError;
pub use task::{Task, TaskOutcome, TaskStatus};
pub use worker::{BatchReport, TaskHandler, Worker, WorkerPool};
