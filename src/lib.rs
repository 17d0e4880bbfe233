//! walk-bench - Concurrent Directory Traversal Benchmark
//!
//! Counts every regular file beneath a root directory and measures how
//! long it takes, comparing sequential recursion against fork-join
//! traversal on several worker-pool designs.
//!
//! # Features
//!
//! - **Fork-join engine**: one task per directory; per-node join
//!   accounting carries subtree totals back to the root exactly once,
//!   whatever the executor's scheduling looks like.
//!
//! - **Pluggable executors**: a fixed pool on an unbounded queue, a
//!   bounded queue with run-on-caller overflow, a thread per task, and
//!   a work-stealing pool all drive the same engine.
//!
//! - **No failure mode but undercounting**: unreadable directories count
//!   as empty and rejected forks join with zero, so a walk terminates
//!   with a total under any executor behaviour, including one that
//!   rejects every submission.
//!
//! - **Stable counting policy**: symlinked directories are never
//!   descended into (each real subtree is walked at most once) and a
//!   symlink to a regular file counts as a file.
//!
//! # Architecture
//!
//! ```text
//!                   ┌────────────────────────────┐
//!                   │         walk-bench         │
//!                   │ config -> method dispatch  │
//!                   └─────────────┬──────────────┘
//!                                 │
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!  ┌─────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//!  │ sequential walk │ │ fork-join engine │ │    executors     │
//!  │  (two variants) │ │ traverse()/visit │ │ fixed / bounded  │
//!  └─────────────────┘ │  + WalkNode join │ │ spawn / stealing │
//!                      └────────┬─────────┘ └────────┬─────────┘
//!                               │     submit(task)   │
//!                               └─────────┬──────────┘
//!                                         ▼
//!                           ┌──────────────────────┐
//!                           │  RunReport summary   │
//!                           │ (method, ms, files)  │
//!                           └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Sequential baseline
//! walk-bench -p /data -m single_thread
//!
//! # Fork-join on a fixed pool of 32 workers
//! walk-bench -p /data -m fix_thread_pool -t 32
//!
//! # Bounded queue of 500 tasks, overflow runs on the submitter
//! walk-bench -p /data -m fix_queue_pool -t 16 -q 500
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod walker;

pub use config::{BenchConfig, CliArgs, Method};
pub use error::{BenchError, ConfigError, ConfigResult, Result, SubmitError, WalkError, WalkResult};
pub use executor::{
    BoundedQueuePool, Executor, FixedThreadPool, Task, ThreadPerTask, WorkStealingPool,
};
pub use report::RunReport;
pub use walker::{traverse, traverse_with_counters, WalkCounters};
