//! One OS thread per task
//!
//! The closest stand-in for handing every directory its own lightweight
//! task: each submission spawns a named thread and the handle is kept
//! for the final join. Expensive per task, but it puts an upper bound on
//! what unlimited parallelism buys the walk.

use crate::error::SubmitError;
use crate::executor::{Executor, Task};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// Executor spawning one thread per submitted task
#[derive(Default)]
pub struct ThreadPerTask {
    handles: Mutex<Vec<JoinHandle<()>>>,
    next_id: AtomicUsize,
}

impl ThreadPerTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads spawned so far
    pub fn spawned(&self) -> usize {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Wait for every spawned thread, including threads spawned by the
    /// tasks being joined. Idempotent.
    pub fn join(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut handles = self.handles.lock();
                handles.drain(..).collect()
            };
            if drained.is_empty() {
                break;
            }
            for handle in drained {
                let _ = handle.join();
            }
        }
    }
}

impl Executor for ThreadPerTask {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = thread::Builder::new()
            .name(format!("walk-task-{}", id))
            .spawn(task)
            .map_err(|e| SubmitError::Spawn {
                reason: e.to_string(),
            })?;
        self.handles.lock().push(handle);
        Ok(())
    }
}
