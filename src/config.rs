//! Configuration types for walk-bench
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - The traversal method selector
//! - Runtime configuration with validation

use crate::error::{ConfigError, ConfigResult};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Maximum reasonable thread count
const MAX_THREADS: usize = 512;

/// Minimum queue length for the bounded pool
const MIN_QUEUE_LENGTH: usize = 1;

/// Default worker threads for the pool methods
const DEFAULT_THREADS: usize = 16;

/// Default bounded queue capacity
const DEFAULT_QUEUE_LENGTH: usize = 200;

/// Benchmark concurrent directory traversal strategies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "walk-bench",
    version,
    about = "Benchmark concurrent directory traversal strategies",
    long_about = "Counts every regular file beneath a root directory and reports the wall-clock\n\
                  time, comparing sequential walks against several fork-join worker pools.\n\n\
                  Symlinked directories are never descended into; a symlink to a regular file\n\
                  counts as a file.",
    after_help = "EXAMPLES:\n    \
        walk-bench -p /data -m single_thread\n    \
        walk-bench -p /data -m fix_thread_pool -t 32\n    \
        walk-bench -p /data -m fix_queue_pool -t 16 -q 500\n    \
        walk-bench -p /data -m work_stealing_pool -t 8 -v"
)]
pub struct CliArgs {
    /// Root directory to walk
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: PathBuf,

    /// Number of worker threads for the pool methods
    #[arg(short = 't', long = "thread", default_value_t = DEFAULT_THREADS, value_name = "NUM")]
    pub thread: usize,

    /// Task queue capacity for the bounded-queue pool
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUEUE_LENGTH, value_name = "NUM")]
    pub queue_length: usize,

    /// Traversal method to benchmark
    #[arg(short = 'm', long, value_enum, value_name = "METHOD")]
    pub method: Method,

    /// Verbose output (per-directory logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Traversal strategy selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum Method {
    /// Naive recursive walk, one thread, no classification policy
    SingleThread,

    /// Recursive walk using the engine's classifier
    SingleThreadV2,

    /// Fork-join on one OS thread per task
    VirtualThread,

    /// Fork-join on a fixed pool with an unbounded queue
    FixThreadPool,

    /// Fork-join on a fixed pool with a bounded queue
    FixQueuePool,

    /// Fork-join on a work-stealing pool
    WorkStealingPool,
}

impl Method {
    /// Every method, in CLI declaration order
    pub const ALL: [Method; 6] = [
        Method::SingleThread,
        Method::SingleThreadV2,
        Method::VirtualThread,
        Method::FixThreadPool,
        Method::FixQueuePool,
        Method::WorkStealingPool,
    ];

    /// CLI name of this method
    pub fn name(&self) -> &'static str {
        match self {
            Method::SingleThread => "single_thread",
            Method::SingleThreadV2 => "single_thread_v2",
            Method::VirtualThread => "virtual_thread",
            Method::FixThreadPool => "fix_thread_pool",
            Method::FixQueuePool => "fix_queue_pool",
            Method::WorkStealingPool => "work_stealing_pool",
        }
    }

    /// True for the fork-join methods that run on an executor
    pub fn is_concurrent(&self) -> bool {
        !matches!(self, Method::SingleThread | Method::SingleThreadV2)
    }

    /// True if the method honours the queue-length setting
    pub fn uses_queue(&self) -> bool {
        matches!(self, Method::FixQueuePool)
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Canonicalized traversal root
    pub root: PathBuf,

    /// Worker threads for the pool methods
    pub threads: usize,

    /// Bounded queue capacity
    pub queue_length: usize,

    /// Selected traversal method
    pub method: Method,

    /// Verbose logging
    pub verbose: bool,
}

impl BenchConfig {
    /// Create and validate configuration from CLI arguments
    ///
    /// The root must be a plain directory: a file or a symlinked root is
    /// rejected here rather than silently walked as empty. The stored
    /// root is canonicalized so the engine's canonical-path classifier
    /// holds for every descendant even when the argument was relative.
    pub fn from_args(args: CliArgs) -> ConfigResult<Self> {
        if args.thread == 0 || args.thread > MAX_THREADS {
            return Err(ConfigError::InvalidThreadCount {
                count: args.thread,
                max: MAX_THREADS,
            });
        }

        if args.queue_length < MIN_QUEUE_LENGTH {
            return Err(ConfigError::InvalidQueueLength {
                len: args.queue_length,
                min: MIN_QUEUE_LENGTH,
            });
        }

        let meta = fs::symlink_metadata(&args.path).map_err(|e| ConfigError::RootUnresolvable {
            path: args.path.clone(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(ConfigError::RootRejected { path: args.path });
        }

        let root = fs::canonicalize(&args.path).map_err(|e| ConfigError::RootUnresolvable {
            path: args.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            root,
            threads: args.thread,
            queue_length: args.queue_length,
            method: args.method,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn args_for(path: PathBuf) -> CliArgs {
        CliArgs {
            path,
            thread: DEFAULT_THREADS,
            queue_length: DEFAULT_QUEUE_LENGTH,
            method: Method::FixThreadPool,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_defaults() {
        let args =
            CliArgs::try_parse_from(["walk-bench", "-p", "/tmp", "-m", "fix_thread_pool"]).unwrap();
        assert_eq!(args.thread, 16);
        assert_eq!(args.queue_length, 200);
        assert_eq!(args.method, Method::FixThreadPool);
        assert!(!args.verbose);
    }

    #[test]
    fn test_cli_method_names() {
        for (name, method) in [
            ("single_thread", Method::SingleThread),
            ("single_thread_v2", Method::SingleThreadV2),
            ("virtual_thread", Method::VirtualThread),
            ("fix_thread_pool", Method::FixThreadPool),
            ("fix_queue_pool", Method::FixQueuePool),
            ("work_stealing_pool", Method::WorkStealingPool),
        ] {
            let args = CliArgs::try_parse_from(["walk-bench", "-p", "/tmp", "-m", name]).unwrap();
            assert_eq!(args.method, method);
            assert_eq!(method.name(), name);
        }
    }

    #[test]
    fn test_cli_requires_path_and_method() {
        assert!(CliArgs::try_parse_from(["walk-bench", "-m", "single_thread"]).is_err());
        assert!(CliArgs::try_parse_from(["walk-bench", "-p", "/tmp"]).is_err());
    }

    #[test]
    fn test_valid_config() {
        let tmp = tempdir().unwrap();
        let config = BenchConfig::from_args(args_for(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.root, tmp.path().canonicalize().unwrap());
        assert_eq!(config.threads, 16);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let tmp = tempdir().unwrap();
        let mut args = args_for(tmp.path().to_path_buf());
        args.thread = 0;
        assert!(matches!(
            BenchConfig::from_args(args),
            Err(ConfigError::InvalidThreadCount { .. })
        ));
    }

    #[test]
    fn test_zero_queue_rejected() {
        let tmp = tempdir().unwrap();
        let mut args = args_for(tmp.path().to_path_buf());
        args.queue_length = 0;
        assert!(matches!(
            BenchConfig::from_args(args),
            Err(ConfigError::InvalidQueueLength { .. })
        ));
    }

    #[test]
    fn test_missing_root_rejected() {
        let tmp = tempdir().unwrap();
        let args = args_for(tmp.path().join("missing"));
        assert!(matches!(
            BenchConfig::from_args(args),
            Err(ConfigError::RootUnresolvable { .. })
        ));
    }

    #[test]
    fn test_file_root_rejected() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain");
        File::create(&file).unwrap();
        assert!(matches!(
            BenchConfig::from_args(args_for(file)),
            Err(ConfigError::RootRejected { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_root_rejected() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert!(matches!(
            BenchConfig::from_args(args_for(link)),
            Err(ConfigError::RootRejected { .. })
        ));
    }
}
