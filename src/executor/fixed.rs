//! Fixed-size worker pool on an unbounded queue
//!
//! N workers share one crossbeam channel. Submission never blocks and
//! never rejects while the pool is live; the queue grows with the
//! frontier of the walk.

use crate::error::SubmitError;
use crate::executor::{Executor, Task};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// How long an idle worker waits for work before rechecking shutdown
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Fixed-size pool over an unbounded task queue
pub struct FixedThreadPool {
    sender: Sender<Task>,
    shutdown: Arc<AtomicBool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl FixedThreadPool {
    /// Spawn a pool with `threads` workers
    pub fn new(threads: usize) -> io::Result<Self> {
        let (sender, receiver) = unbounded::<Task>();
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
        })
    }

    /// Flag shutdown and wait for every worker to exit. Idempotent.
    ///
    /// Call after submitted work has completed; a task still running
    /// finishes first, but tasks left in the queue are discarded.
    pub fn join(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Executor for FixedThreadPool {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(SubmitError::Shutdown);
        }
        self.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(_) => SubmitError::QueueFull,
            TrySendError::Disconnected(_) => SubmitError::Shutdown,
        })
    }
}

impl Drop for FixedThreadPool {
    fn drop(&mut self) {
        // Workers also exit once the sender disconnects; the flag just
        // spares them the final poll timeout. Joining here would deadlock
        // when the last pool handle is dropped by a worker's own task.
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
    use std::sync::atomic::AtomicU64;

    #[test]
    fn test_tasks_run_on_workers() {
        let pool = FixedThreadPool::new(4).unwrap();
        let counter = Arc::new(AtomicU64::new(0));

        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
        }

        while counter.load(Ordering::Relaxed) < 100 {
            thread::sleep(Duration::from_millis(5));
        }
        pool.join();
        assert_eq!(counter.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn test_tasks_can_resubmit() {
        let pool = Arc::new(FixedThreadPool::new(2).unwrap());
        let counter = Arc::new(AtomicU64::new(0));

        let inner_pool = Arc::clone(&pool);
        let inner_counter = Arc::clone(&counter);
        pool.submit(Box::new(move || {
            let counter = Arc::clone(&inner_counter);
            inner_pool
                .submit(Box::new(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                }))
                .unwrap();
            inner_counter.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();

        while counter.load(Ordering::Relaxed) < 2 {
            thread::sleep(Duration::from_millis(5));
        }
        pool.join();
    }

    #[test]
    fn test_submit_after_join_is_rejected() {
        let pool = FixedThreadPool::new(1).unwrap();
        pool.join();

        let result = pool.submit(Box::new(|| {}));
        assert_eq!(result, Err(SubmitError::Shutdown));
    }

    #[test]
    fn test_join_is_idempotent() {
        let pool = FixedThreadPool::new(2).unwrap();
        pool.join();
        pool.join();
    }
}
