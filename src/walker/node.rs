//! Fork-join accounting for one directory
//!
//! Every directory visited gets a node. The worker running the node
//! lists the directory, counts its own files, and forks one child node
//! per subdirectory. Children report their resolved totals back through
//! `join`; when the last outstanding child reports, the node resolves
//! with its own count plus everything below it and pushes that total one
//! level up. The root node hands the grand total to the waiting driver
//! over a channel instead.
//!
//! The protocol tolerates executors that reject work: a rejected fork is
//! joined immediately with a zero contribution, so `pending` still
//! reaches zero and no node waits forever on a child that never ran.

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Where a resolved total goes: up to the parent, or out to the driver
enum Outlet {
    Driver(Sender<u64>),
    Parent(Arc<WalkNode>),
}

/// Join state, guarded by one lock per node
#[derive(Debug, Default)]
struct JoinState {
    /// Forked children that have not reported yet
    pending: usize,

    /// Own files plus all joined child totals
    accumulated: u64,

    /// Set when the node resolves; later joins are ignored
    resolved: bool,
}

/// One directory in the fork tree
pub struct WalkNode {
    /// Directory this node lists
    path: PathBuf,

    /// Destination for the resolved total
    outlet: Outlet,

    /// Join protocol state
    state: Mutex<JoinState>,

    /// Resolved total, set exactly once
    total: OnceLock<u64>,
}

impl WalkNode {
    /// Create the root node; its total is sent to `driver` on resolution
    pub fn root(path: PathBuf, driver: Sender<u64>) -> Arc<Self> {
        Arc::new(Self {
            path,
            outlet: Outlet::Driver(driver),
            state: Mutex::new(JoinState::default()),
            total: OnceLock::new(),
        })
    }

    /// Create a child node reporting into `parent`
    pub fn fork(parent: &Arc<WalkNode>, path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            path,
            outlet: Outlet::Parent(Arc::clone(parent)),
            state: Mutex::new(JoinState::default()),
            total: OnceLock::new(),
        })
    }

    /// Directory this node lists
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolved total, once the node has resolved
    pub fn total(&self) -> Option<u64> {
        self.total.get().copied()
    }

    /// Record the node's own file count and arm the join counter
    ///
    /// Must be called once, before any child is submitted. Arming after
    /// the first fork would let a fast child observe `pending == 0` and
    /// resolve this node while siblings are still being forked.
    pub fn begin_forks(&self, own_files: u64, children: usize) {
        let mut state = self.state.lock();
        state.accumulated += own_files;
        state.pending = children;
    }

    /// Resolve a node that forked nothing
    pub fn finish_leaf(self: &Arc<Self>, own_files: u64) {
        let total = {
            let mut state = self.state.lock();
            state.accumulated += own_files;
            state.resolved = true;
            state.accumulated
        };
        self.publish(total);
    }

    /// Fold one child's resolved total into this node
    ///
    /// A rejected fork joins with zero, as if its subtree were empty.
    /// The join that brings `pending` to zero resolves the node and
    /// pushes its total up the tree.
    pub fn join(self: &Arc<Self>, contribution: u64) {
        if let Some(total) = self.absorb(contribution) {
            self.publish(total);
        }
    }

    /// Add a contribution and retire one pending child
    ///
    /// Returns the final total iff this call resolved the node. Joins
    /// arriving after resolution are dropped.
    fn absorb(&self, contribution: u64) -> Option<u64> {
        let mut state = self.state.lock();
        if state.resolved {
            return None;
        }
        state.accumulated += contribution;
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            state.resolved = true;
            Some(state.accumulated)
        } else {
            None
        }
    }

    /// Publish a resolved total: set the completion cell, then climb the
    /// parent chain folding the total into every node this one resolves.
    ///
    /// Iterative, so a pathologically deep directory chain cannot
    /// overflow the stack when its whole spine resolves at once.
    fn publish(self: &Arc<Self>, total: u64) {
        let mut node = Arc::clone(self);
        let mut total = total;
        loop {
            let _ = node.total.set(total);
            trace!(path = %node.path.display(), total, "Node resolved");

            let parent = match &node.outlet {
                Outlet::Driver(done) => {
                    let _ = done.send(total);
                    return;
                }
                Outlet::Parent(parent) => match parent.absorb(total) {
                    Some(parent_total) => {
                        total = parent_total;
                        Arc::clone(parent)
                    }
                    None => return,
                },
            };
            node = parent;
        }
    }
}
