//! Fork-join traversal driver
//!
//! `traverse` submits one task for the root directory and blocks until
//! the root node resolves. Each task lists its directory, counts the
//! files it finds (invoking the caller's callback per file), forks one
//! child task per subdirectory, and lets the join protocol in
//! [`WalkNode`] carry totals back up the tree.
//!
//! Failure containment:
//! - an unlistable directory counts as empty (warn log)
//! - an entry that classifies as neither file nor directory is dropped
//! - a fork the executor rejects is joined with zero, so the walk
//!   terminates with an undercount instead of deadlocking

use crate::error::{WalkError, WalkResult};
use crate::executor::{Executor, Task};
use crate::walker::classify::{is_countable_file, is_walkable_dir};
use crate::walker::node::WalkNode;
use crossbeam_channel::bounded;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-run counters owned by the driver
///
/// Observability only: the reported file total comes exclusively from
/// the join protocol, never from these.
#[derive(Debug, Default)]
pub struct WalkCounters {
    /// Directories successfully listed
    pub dirs_listed: AtomicU64,

    /// Entries that classified as neither file nor walkable directory
    pub entries_rejected: AtomicU64,

    /// Directory listings (or single entries) that failed to read
    pub listing_errors: AtomicU64,

    /// Child submissions the executor refused
    pub forks_rejected: AtomicU64,
}

impl WalkCounters {
    pub fn dirs_listed(&self) -> u64 {
        self.dirs_listed.load(Ordering::Relaxed)
    }

    pub fn entries_rejected(&self) -> u64 {
        self.entries_rejected.load(Ordering::Relaxed)
    }

    pub fn listing_errors(&self) -> u64 {
        self.listing_errors.load(Ordering::Relaxed)
    }

    pub fn forks_rejected(&self) -> u64 {
        self.forks_rejected.load(Ordering::Relaxed)
    }
}

/// Shared state every visit task needs
struct WalkContext {
    executor: Arc<dyn Executor>,
    callback: Box<dyn Fn(&Path) + Send + Sync>,
    counters: Arc<WalkCounters>,
}

/// Walk `root` on `executor`, returning the total number of files found
///
/// `callback` runs once per counted file, on whichever worker listed the
/// containing directory, in listing order within that directory. No
/// order holds across directories.
pub fn traverse<F>(root: &Path, executor: Arc<dyn Executor>, callback: F) -> WalkResult<u64>
where
    F: Fn(&Path) + Send + Sync + 'static,
{
    traverse_with_counters(root, executor, callback, Arc::new(WalkCounters::default()))
}

/// [`traverse`], sharing externally owned run counters
pub fn traverse_with_counters<F>(
    root: &Path,
    executor: Arc<dyn Executor>,
    callback: F,
    counters: Arc<WalkCounters>,
) -> WalkResult<u64>
where
    F: Fn(&Path) + Send + Sync + 'static,
{
    if !is_walkable_dir(root) {
        return Err(WalkError::RootRejected {
            path: root.to_path_buf(),
        });
    }

    let (done_tx, done_rx) = bounded(1);
    let ctx = Arc::new(WalkContext {
        executor: Arc::clone(&executor),
        callback: Box::new(callback),
        counters,
    });

    let root_node = WalkNode::root(root.to_path_buf(), done_tx);
    let task_ctx = Arc::clone(&ctx);
    let task_node = Arc::clone(&root_node);
    let task: Task = Box::new(move || visit(&task_ctx, task_node));

    if let Err(e) = executor.submit(task) {
        // Nothing has run yet; do the root's work on this thread so the
        // walk still terminates. Children go through the executor again.
        warn!(error = %e, "Root submission rejected, visiting root on the driver thread");
        visit(&ctx, Arc::clone(&root_node));
    }

    // Hold no reference to the tree while waiting: if every task dies
    // without resolving (a panicked callback, a torn-down pool), the
    // channel disconnects instead of blocking forever.
    drop(root_node);
    drop(ctx);

    done_rx.recv().map_err(|_| WalkError::Aborted)
}

/// List one directory, count its files, fork its subdirectories
fn visit(ctx: &Arc<WalkContext>, node: Arc<WalkNode>) {
    let mut own_files: u64 = 0;
    let mut subdirs: Vec<PathBuf> = Vec::new();

    match fs::read_dir(node.path()) {
        Ok(entries) => {
            ctx.counters.dirs_listed.fetch_add(1, Ordering::Relaxed);
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(path = %node.path().display(), error = %e, "Skipping unreadable entry");
                        ctx.counters.listing_errors.fetch_add(1, Ordering::Relaxed);
                        continue;
                    }
                };
                let child_path = entry.path();
                if is_countable_file(&child_path) {
                    own_files += 1;
                    (ctx.callback)(&child_path);
                } else if is_walkable_dir(&child_path) {
                    subdirs.push(child_path);
                } else {
                    debug!(path = %child_path.display(), "Entry is neither file nor directory, skipping");
                    ctx.counters.entries_rejected.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        Err(e) => {
            warn!(path = %node.path().display(), error = %e, "Cannot list directory, counting it as empty");
            ctx.counters.listing_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    if subdirs.is_empty() {
        node.finish_leaf(own_files);
        return;
    }

    // Arm the join counter before the first fork; a child finishing
    // early must not see a count that is still growing
    node.begin_forks(own_files, subdirs.len());

    for subdir in subdirs {
        let child = WalkNode::fork(&node, subdir);
        let task_ctx = Arc::clone(ctx);
        let task_node = Arc::clone(&child);
        let task: Task = Box::new(move || visit(&task_ctx, task_node));

        if let Err(e) = ctx.executor.submit(task) {
            warn!(path = %child.path().display(), error = %e, "Fork rejected, counting subtree as empty");
            ctx.counters.forks_rejected.fetch_add(1, Ordering::Relaxed);
            node.join(0);
        }
    }
}
