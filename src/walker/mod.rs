//! Concurrent fork-join directory traversal
//!
//! Each directory becomes one task. The task lists its directory,
//! counts the files, and forks one task per subdirectory into the same
//! executor; completion counts join back up the tree exactly once per
//! node. The driver blocks only on the root's completion.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │        traverse()        │
//!                  │  submit root, wait once  │
//!                  └────────────┬─────────────┘
//!                               │
//!                               ▼
//!                  ┌──────────────────────────┐
//!                  │        Executor          │
//!                  │ (fixed / bounded / spawn │
//!                  │     / work stealing)     │
//!                  └────────────┬─────────────┘
//!                               │ one task per directory
//!          ┌────────────────────┼────────────────────┐
//!          ▼                    ▼                    ▼
//!   ┌────────────┐       ┌────────────┐       ┌────────────┐
//!   │ WalkNode / │       │ WalkNode / │       │ WalkNode / │
//!   │  list,fork │  ...  │  list,fork │  ...  │  list,fork │
//!   └──────┬─────┘       └──────┬─────┘       └──────┬─────┘
//!          │     join(total)    │     join(total)    │
//!          └────────────────────┴────────────────────┘
//!                      totals climb to the root
//! ```

pub mod classify;
pub mod engine;
pub mod node;
pub mod sequential;

pub use engine::{traverse, traverse_with_counters, WalkCounters};
pub use node::WalkNode;
pub use sequential::{walk_sequential, walk_sequential_classified};
