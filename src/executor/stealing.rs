//! Work-stealing pool
//!
//! Submissions land in a global injector; each worker keeps a local
//! deque and steals when it runs dry. Find-work order is local pop,
//! then a batch from the injector, then a steal from a sibling. Idle
//! workers back off with a short sleep after enough empty spins.

use crate::error::SubmitError;
use crate::executor::{Executor, Task};
use crossbeam_deque::{Injector, Steal, Stealer, Worker as DequeWorker};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Empty find-work rounds before an idle worker sleeps
const MAX_IDLE_SPINS: u32 = 1000;

/// Work-stealing pool over a global injector and per-worker deques
pub struct WorkStealingPool {
    injector: Arc<Injector<Task>>,
    shutdown: Arc<AtomicBool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkStealingPool {
    /// Spawn a pool with `threads` stealing workers
    pub fn new(threads: usize) -> io::Result<Self> {
        let injector: Arc<Injector<Task>> = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut locals = Vec::with_capacity(threads);
        let mut stealers = Vec::with_capacity(threads);
        for _ in 0..threads {
            let local = DequeWorker::new_fifo();
            stealers.push(local.stealer());
            locals.push(local);
        }
        let stealers = Arc::new(stealers);

        let mut workers = Vec::with_capacity(threads);
        for (id, local) in locals.into_iter().enumerate() {
            let injector = Arc::clone(&injector);
            let stealers = Arc::clone(&stealers);
            let shutdown = Arc::clone(&shutdown);
            let handle = thread::Builder::new()
                .name(format!("walk-steal-{}", id))
                .spawn(move || steal_loop(id, local, injector, stealers, shutdown))?;
            workers.push(handle);
        }

        Ok(Self {
            injector,
            shutdown,
            workers: Mutex::new(workers),
        })
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

impl Executor for WorkStealingPool {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(SubmitError::Shutdown);
        }
        self.injector.push(task);
        Ok(())
    }
}

impl Drop for WorkStealingPool {
    fn drop(&mut self) {
        // Workers notice the flag within one find-work round. Joining
        // here would deadlock when the last pool handle is dropped by a
        // worker's own task.
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn steal_loop(
    id: usize,
    local: DequeWorker<Task>,
    injector: Arc<Injector<Task>>,
    stealers: Arc<Vec<Stealer<Task>>>,
    shutdown: Arc<AtomicBool>,
) {
    debug!(worker = id, "Stealing worker starting");

    let mut idle_spins = 0u32;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match find_task(id, &local, &injector, &stealers) {
            Some(task) => {
                idle_spins = 0;
                task();
            }
            None => {
                idle_spins += 1;
                if idle_spins > MAX_IDLE_SPINS {
                    // Yield to avoid busy spinning
                    thread::sleep(Duration::from_micros(100));
                    idle_spins = 0;
                }
            }
        }
    }

    debug!(worker = id, "Stealing worker exiting");
}

/// Local queue first, then a batch from the injector, then siblings
fn find_task(
    id: usize,
    local: &DequeWorker<Task>,
    injector: &Injector<Task>,
    stealers: &[Stealer<Task>],
) -> Option<Task> {
    if let Some(task) = local.pop() {
        return Some(task);
    }

    loop {
        match injector.steal_batch_and_pop(local) {
            Steal::Success(task) => return Some(task),
            Steal::Empty => break,
            Steal::Retry => continue,
        }
    }

    for (i, stealer) in stealers.iter().enumerate() {
        if i == id {
            continue;
        }
        loop {
            match stealer.steal() {
                Steal::Success(task) => return Some(task),
                Steal::Empty => break,
                Steal::Retry => continue,
            }
        }
    }

    None
}
