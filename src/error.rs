//! Error types for walk-bench
//!
//! This module defines the error hierarchy covering:
//! - Configuration and CLI errors
//! - Executor submission failures
//! - Traversal driver errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what to do
//! - A traversal itself never fails: listing and classification problems
//!   are contained per-node, and a rejected fork degrades to an undercount

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end a benchmark run
///
/// Configuration problems are caught before a run starts and stay
/// [`ConfigError`]; this covers the run itself, where building a worker
/// pool or driving the traversal can fail.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Traversal driver errors
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),

    /// I/O errors (worker thread spawning)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid thread count
    #[error("Invalid thread count {count}: must be between 1 and {max}")]
    InvalidThreadCount { count: usize, max: usize },

    /// Invalid queue length
    #[error("Invalid queue length {len}: must be at least {min}")]
    InvalidQueueLength { len: usize, min: usize },

    /// Root path does not exist or cannot be resolved
    #[error("Cannot resolve root path '{path}': {reason}")]
    RootUnresolvable { path: PathBuf, reason: String },

    /// Root path resolved but is not a walkable directory
    #[error("Root path '{path}' is not a plain directory (files and symlinked roots are rejected)")]
    RootRejected { path: PathBuf },
}

/// Errors surfaced by the traversal driver
///
/// Per-node failures (unreadable directories, rejected entries, rejected
/// forks) never surface here; they are logged and absorbed so the walk can
/// only undercount, never fail.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The traversal root itself was rejected by the classifier
    #[error("Traversal root '{path}' is not a walkable directory")]
    RootRejected { path: PathBuf },

    /// The completion channel closed before the root resolved
    #[error("Traversal aborted: a worker terminated before the root completed")]
    Aborted,
}

/// Executor submission failures
///
/// The engine treats every variant the same way: it logs a warning and
/// joins the affected child with a zero contribution so the parent still
/// resolves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Bounded queue is full and the executor does not absorb overflow
    #[error("Task queue is full")]
    QueueFull,

    /// Executor has shut down and no longer accepts work
    #[error("Executor is shut down")]
    Shutdown,

    /// OS-level thread spawn failed
    #[error("Failed to spawn task thread: {reason}")]
    Spawn { reason: String },
}

/// Result type alias for BenchError
pub type Result<T> = std::result::Result<T, BenchError>;

/// Result type alias for ConfigError
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for WalkError
pub type WalkResult<T> = std::result::Result<T, WalkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_error_wraps_walk_failures() {
        let err: BenchError = WalkError::Aborted.into();
        assert!(matches!(err, BenchError::Walk(_)));
        assert_eq!(
            err.to_string(),
            "Walk error: Traversal aborted: a worker terminated before the root completed"
        );
    }

    #[test]
    fn test_bench_error_wraps_spawn_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err: BenchError = io.into();
        assert!(matches!(err, BenchError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: no threads left");
    }
}
