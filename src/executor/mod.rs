//! Task executors for the fork-join walk
//!
//! The traversal engine schedules node visits through a single
//! fire-and-forget `submit` call, so any scheduler that can run boxed
//! closures can drive it. Rejection is a normal outcome: the engine
//! compensates for a failed fork, so an executor may refuse work freely
//! but must never block forever on queue space the caller itself might
//! have to free.
//!
//! Four implementations, one per concurrent CLI method:
//! - [`FixedThreadPool`]: N workers, unbounded queue
//! - [`BoundedQueuePool`]: N workers, bounded queue, overflow runs on
//!   the submitting thread
//! - [`ThreadPerTask`]: one OS thread per task
//! - [`WorkStealingPool`]: global injector with per-worker deques

pub mod bounded;
pub mod fixed;
pub mod spawning;
pub mod stealing;

pub use bounded::BoundedQueuePool;
pub use fixed::FixedThreadPool;
pub use spawning::ThreadPerTask;
pub use stealing::WorkStealingPool;

use crate::error::SubmitError;

/// A unit of work scheduled on an executor
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Capability to run tasks, eventually and in no particular order
///
/// `submit` either accepts the task for execution or returns an error;
/// it is allowed to run the task on the calling thread before returning.
pub trait Executor: Send + Sync {
    /// Schedule a task for execution
    fn submit(&self, task: Task) -> Result<(), SubmitError>;
}
