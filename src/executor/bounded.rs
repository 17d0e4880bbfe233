//! Fixed-size worker pool on a bounded queue
//!
//! Same worker loop as the unbounded pool, but submissions land in a
//! channel of fixed capacity. When the queue is full the submitting
//! thread runs the task itself instead of blocking, so a queue shorter
//! than a directory's fan-out can never wedge the walk: the producers
//! are the consumers.

use crate::error::SubmitError;
use crate::executor::{Executor, Task};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// How long an idle worker waits for work before rechecking shutdown
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Submission statistics
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Tasks accepted into the queue
    pub queued: AtomicU64,

    /// Tasks run on the submitting thread because the queue was full
    pub caller_runs: AtomicU64,
}

impl PoolStats {
    /// Number of tasks absorbed by submitters under backpressure
    pub fn caller_run_count(&self) -> u64 {
        self.caller_runs.load(Ordering::Relaxed)
    }
}

/// Fixed-size pool over a bounded task queue with run-on-caller overflow
pub struct BoundedQueuePool {
    sender: Sender<Task>,
    shutdown: Arc<AtomicBool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: Arc<PoolStats>,
}

impl BoundedQueuePool {
    /// Spawn a pool with `threads` workers and room for `queue_len` tasks
    pub fn new(threads: usize, queue_len: usize) -> io::Result<Self> {
        let (sender, receiver) = bounded::<Task>(queue_len);
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(threads);

        for id in 0..threads {
            let receiver = receiver.clone();
            let shutdown = Arc::clone(&shutdown);
            let handle = thread::Builder::new()
                .name(format!("walk-worker-{}", id))
                .spawn(move || worker_loop(id, receiver, shutdown))?;
            workers.push(handle);
        }

        Ok(Self {
            sender,
            shutdown,
            workers: Mutex::new(workers),
            stats: Arc::new(PoolStats::default()),
        })
    }

    /// Submission statistics
    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    /// Flag shutdown and wait for every worker to exit. Idempotent.
    pub fn join(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Executor for BoundedQueuePool {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(SubmitError::Shutdown);
        }
        match self.sender.try_send(task) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(task)) => {
                // Queue full: the submitter absorbs the task. Recursion
                // depth is bounded by the directory depth of the walk.
                self.stats.caller_runs.fetch_add(1, Ordering::Relaxed);
                task();
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(SubmitError::Shutdown),
        }
    }
}

impl Drop for BoundedQueuePool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn worker_loop(id: usize, receiver: Receiver<Task>, shutdown: Arc<AtomicBool>) {
    debug!(worker = id, "Pool worker starting");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        match receiver.recv_timeout(IDLE_POLL) {
            Ok(task) => task(),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker = id, "Pool worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_runs_on_caller() {
        let pool = BoundedQueuePool::new(1, 1).unwrap();

        // Park the only worker so the queue cannot drain
        let (release_tx, release_rx) = bounded::<()>(0);
        pool.submit(Box::new(move || {
            let _ = release_rx.recv();
        }))
        .unwrap();

        let counter = Arc::new(AtomicU64::new(0));
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
        }

        // The queue held at most one of the ten; the rest ran inline
        assert!(pool.stats().caller_run_count() >= 9);

        release_tx.send(()).unwrap();
        while counter.load(Ordering::Relaxed) < 10 {
            thread::sleep(Duration::from_millis(5));
        }
        pool.join();
        assert_eq!(counter.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_all_tasks_complete() {
        let pool = BoundedQueuePool::new(2, 4).unwrap();
        let counter = Arc::new(AtomicU64::new(0));

        for _ in 0..200 {
            let counter = Arc::clone(&counter);
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
        }

        while counter.load(Ordering::Relaxed) < 200 {
            thread::sleep(Duration::from_millis(5));
        }
        pool.join();
        assert_eq!(counter.load(Ordering::Relaxed), 200);
    }

    #[test]
    fn test_submit_after_join_is_rejected() {
        let pool = BoundedQueuePool::new(1, 4).unwrap();
        pool.join();
        assert_eq!(pool.submit(Box::new(|| {})), Err(SubmitError::Shutdown));
    }
}
