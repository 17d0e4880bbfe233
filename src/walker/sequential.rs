//! Single-threaded baselines
//!
//! Two recursive walks with none of the fork-join machinery, kept as
//! the floor the concurrent strategies are measured against:
//! - [`walk_sequential`] counts anything whose followed metadata is a
//!   regular file and descends into non-link directories, with no
//!   canonical-path policy
//! - [`walk_sequential_classified`] runs the same classifier as the
//!   concurrent engine, so its totals match the engine's exactly
//!
//! Both are infallible: an unreadable directory contributes zero.

use crate::walker::classify::{is_countable_file, is_walkable_dir};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Naive recursive count of regular files under `root`
pub fn walk_sequential<F>(root: &Path, callback: F) -> u64
where
    F: Fn(&Path),
{
    walk_tree(root, &callback)
}

fn walk_tree(dir: &Path, callback: &dyn Fn(&Path)) -> u64 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Cannot list directory, counting it as empty");
            return 0;
        }
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let followed_is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if followed_is_file {
            callback(&path);
            count += 1;
        } else {
            let is_plain_dir = fs::symlink_metadata(&path)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_plain_dir {
                count += walk_tree(&path, callback);
            }
        }
    }
    count
}

/// Recursive count using the engine's classification policy
pub fn walk_sequential_classified<F>(root: &Path, callback: F) -> u64
where
    F: Fn(&Path),
{
    walk_tree_classified(root, &callback)
}

fn walk_tree_classified(dir: &Path, callback: &dyn Fn(&Path)) -> u64 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Cannot list directory, counting it as empty");
            return 0;
        }
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if is_countable_file(&path) {
            callback(&path);
            count += 1;
        } else if is_walkable_dir(&path) {
            count += walk_tree_classified(&path, callback);
        }
    }
    count
}
