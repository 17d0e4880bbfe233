//! Entry classification policy
//!
//! Decides, for each directory entry, whether it is:
//! - a walkable directory (descend and fork a task)
//! - a countable file (count and hand to the callback)
//! - rejected (logged and dropped)
//!
//! Directories are tested without following symlinks and must survive a
//! canonical-path round trip, so a symlinked directory is skipped and a
//! subtree reachable through links is walked at most once, via its real
//! path. Files are tested following symlinks, so a link to a regular
//! file counts while a broken link does not.

use std::fs;
use std::path::Path;
use tracing::debug;

/// Check if `path` is a plain directory reached without a symlink
///
/// Two checks must both pass:
/// 1. `symlink_metadata` reports a directory (the entry itself is not a link)
/// 2. the canonical form of the path equals the path as given
///
/// The second check presumes the caller walks canonical paths from a
/// canonical root; under that discipline it only fails when a component
/// is a link or the entry vanished mid-scan.
pub fn is_walkable_dir(path: &Path) -> bool {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot stat entry, rejecting");
            return false;
        }
    };

    if !meta.is_dir() {
        return false;
    }

    match fs::canonicalize(path) {
        Ok(real) => real == path,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot canonicalize entry, rejecting");
            false
        }
    }
}

/// Check if `path` resolves, following symlinks, to a regular file
pub fn is_countable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot stat entry, rejecting");
            false
        }
    }
}
