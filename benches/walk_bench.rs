//! Benchmarks for walk-bench
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walk_bench::config::Method;
use walk_bench::executor::{
    BoundedQueuePool, Executor, FixedThreadPool, ThreadPerTask, WorkStealingPool,
};
use walk_bench::walker::{traverse, walk_sequential, walk_sequential_classified};

/// Build `fanout` subdirectories per level and `files` files per directory.
fn populate(dir: &Path, depth: u32, fanout: usize, files: usize) {
    for f in 0..files {
        fs::write(dir.join(format!("f{}.dat", f)), b"data").unwrap();
    }
    if depth == 0 {
        return;
    }
    for d in 0..fanout {
        let sub = dir.join(format!("d{}", d));
        fs::create_dir(&sub).unwrap();
        populate(&sub, depth - 1, fanout, files);
    }
}

/// 40 directories, 200 files: big enough to exercise the fork-join
/// plumbing, small enough to fit in the page cache.
fn bench_tree() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    populate(&root, 3, 3, 5);
    (tmp, root)
}

/// One full strategy run, executor setup and teardown included.
fn walk_once(method: Method, root: &Path, threads: usize) -> u64 {
    match method {
        Method::SingleThread => walk_sequential(root, |_| {}),
        Method::SingleThreadV2 => walk_sequential_classified(root, |_| {}),
        Method::VirtualThread => {
            let pool = Arc::new(ThreadPerTask::new());
            let total = traverse(root, Arc::clone(&pool) as Arc<dyn Executor>, |_| {}).unwrap();
            pool.join();
            total
        }
        Method::FixThreadPool => {
            let pool = Arc::new(FixedThreadPool::new(threads).unwrap());
            let total = traverse(root, Arc::clone(&pool) as Arc<dyn Executor>, |_| {}).unwrap();
            pool.join();
            total
        }
        Method::FixQueuePool => {
            let pool = Arc::new(BoundedQueuePool::new(threads, 200).unwrap());
            let total = traverse(root, Arc::clone(&pool) as Arc<dyn Executor>, |_| {}).unwrap();
            pool.join();
            total
        }
        Method::WorkStealingPool => {
            let pool = Arc::new(WorkStealingPool::new(threads).unwrap());
            let total = traverse(root, Arc::clone(&pool) as Arc<dyn Executor>, |_| {}).unwrap();
            pool.join();
            total
        }
    }
}

fn benchmark_methods(c: &mut Criterion) {
    let (_tmp, root) = bench_tree();

    let mut group = c.benchmark_group("walk");
    for method in Method::ALL {
        let thread_counts: &[usize] = if method.is_concurrent() { &[2, 8] } else { &[1] };
        for &threads in thread_counts {
            group.bench_with_input(
                BenchmarkId::new(method.name(), threads),
                &threads,
                |b, &threads| b.iter(|| black_box(walk_once(method, &root, threads))),
            );
        }
    }
    group.finish();
}

fn benchmark_join_protocol(c: &mut Criterion) {
    use crossbeam_channel::bounded;
    use walk_bench::walker::WalkNode;

    c.bench_function("join_fanout_64", |b| {
        b.iter(|| {
            let (done_tx, done_rx) = bounded(1);
            let root = WalkNode::root(PathBuf::from("/bench"), done_tx);

            let children: Vec<_> = (0..64)
                .map(|i| WalkNode::fork(&root, PathBuf::from(format!("/bench/{}", i))))
                .collect();
            root.begin_forks(0, children.len());
            for child in &children {
                child.finish_leaf(1);
            }

            black_box(done_rx.recv().unwrap());
        })
    });
}

criterion_group!(benches, benchmark_methods, benchmark_join_protocol);
criterion_main!(benches);
