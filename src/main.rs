//! walk-bench - Concurrent Directory Traversal Benchmark
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, trace};
use tracing_subscriber::EnvFilter;
use walk_bench::config::{BenchConfig, CliArgs, Method};
use walk_bench::error::{self, WalkResult};
use walk_bench::executor::{
    BoundedQueuePool, Executor, FixedThreadPool, ThreadPerTask, WorkStealingPool,
};
use walk_bench::report::{print_header, print_summary, RunReport};
use walk_bench::walker::{
    traverse_with_counters, walk_sequential, walk_sequential_classified, WalkCounters,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = BenchConfig::from_args(args).context("Invalid configuration")?;

    print_header(
        &config.root.display().to_string(),
        config.method,
        config.threads,
    );

    info!(
        root = %config.root.display(),
        method = config.method.name(),
        "Starting walk"
    );

    let (report, counters) = run_method(&config).context("Walk failed")?;

    info!(
        files = report.files,
        ms = report.elapsed.as_millis() as u64,
        "Walk finished"
    );

    print_summary(&report, counters.as_deref());

    Ok(())
}

/// Per-file callback for CLI runs; counting is the engine's job
fn count_file(path: &Path) {
    trace!(path = %path.display(), "Counted file");
}

/// Run the selected method once, timing the whole strategy including
/// executor setup and teardown
fn run_method(config: &BenchConfig) -> error::Result<(RunReport, Option<Arc<WalkCounters>>)> {
    let start = Instant::now();

    let (files, counters) = match config.method {
        Method::SingleThread => (walk_sequential(&config.root, count_file), None),
        Method::SingleThreadV2 => (walk_sequential_classified(&config.root, count_file), None),
        Method::VirtualThread => {
            let pool = Arc::new(ThreadPerTask::new());
            let (files, counters) =
                run_concurrent(&config.root, Arc::clone(&pool) as Arc<dyn Executor>)?;
            pool.join();
            (files, Some(counters))
        }
        Method::FixThreadPool => {
            let pool = Arc::new(FixedThreadPool::new(config.threads)?);
            let (files, counters) =
                run_concurrent(&config.root, Arc::clone(&pool) as Arc<dyn Executor>)?;
            pool.join();
            (files, Some(counters))
        }
        Method::FixQueuePool => {
            let pool = Arc::new(BoundedQueuePool::new(config.threads, config.queue_length)?);
            let (files, counters) =
                run_concurrent(&config.root, Arc::clone(&pool) as Arc<dyn Executor>)?;
            pool.join();
            (files, Some(counters))
        }
        Method::WorkStealingPool => {
            let pool = Arc::new(WorkStealingPool::new(config.threads)?);
            let (files, counters) =
                run_concurrent(&config.root, Arc::clone(&pool) as Arc<dyn Executor>)?;
            pool.join();
            (files, Some(counters))
        }
    };

    let elapsed = start.elapsed();

    let report = RunReport {
        method: config.method,
        threads: if config.method.is_concurrent() {
            config.threads
        } else {
            1
        },
        queue_length: config.method.uses_queue().then_some(config.queue_length),
        files,
        elapsed,
    };

    Ok((report, counters))
}

fn run_concurrent(
    root: &Path,
    executor: Arc<dyn Executor>,
) -> WalkResult<(u64, Arc<WalkCounters>)> {
    let counters = Arc::new(WalkCounters::default());
    let files = traverse_with_counters(root, executor, count_file, Arc::clone(&counters))?;
    Ok((files, counters))
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("walk_bench=debug,warn")
    } else {
        EnvFilter::new("walk_bench=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
