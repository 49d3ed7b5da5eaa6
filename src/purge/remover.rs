//! Best-effort recursive removal.
//!
//! A missing path is not an error. Any other failure is captured in the
//! outcome instead of being returned, so one unreadable directory never stops
//! the rest of a purge. Symlinks are unlinked, never followed.

#![allow(missing_docs)]

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::core::errors::PurgeError;
use crate::core::paths::{is_filesystem_root, normalize_syntactic};

/// Result of removing (or planning to remove) one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemovalOutcome {
    /// Path existed and is gone.
    Removed { bytes: u64 },
    /// Nothing was there.
    Absent,
    /// Dry-run: path exists and would be removed.
    Planned { bytes: u64 },
    /// Removal failed; the purge carries on.
    Failed { code: String, error: String },
}

impl RemovalOutcome {
    fn failed(err: &PurgeError) -> Self {
        Self::Failed {
            code: err.code().to_string(),
            error: err.to_string(),
        }
    }
}

/// Removes owned paths below a root prefix.
#[derive(Debug, Clone)]
pub struct Remover<'a> {
    root: &'a Path,
    dry_run: bool,
}

impl<'a> Remover<'a> {
    #[must_use]
    pub fn new(root: &'a Path, dry_run: bool) -> Self {
        Self { root, dry_run }
    }

    /// Remove `path` and everything below it.
    pub fn remove(&self, path: &Path) -> RemovalOutcome {
        if let Err(err) = self.preflight(path) {
            return RemovalOutcome::failed(&err);
        }

        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if is_absent(&e) => return RemovalOutcome::Absent,
            Err(e) => return RemovalOutcome::failed(&PurgeError::io(path, e)),
        };

        let bytes = if meta.is_dir() { dir_size(path) } else { meta.len() };

        if self.dry_run {
            return RemovalOutcome::Planned { bytes };
        }

        let result = if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };

        match result {
            Ok(()) => RemovalOutcome::Removed { bytes },
            // Raced with something else removing it.
            Err(e) if is_absent(&e) => RemovalOutcome::Absent,
            Err(e) => RemovalOutcome::failed(&PurgeError::io(path, e)),
        }
    }

    fn preflight(&self, path: &Path) -> Result<(), PurgeError> {
        let normalized = normalize_syntactic(path);
        if is_filesystem_root(&normalized) {
            return Err(PurgeError::SafetyVeto {
                path: path.to_path_buf(),
                reason: "refusing to remove the filesystem root".to_string(),
            });
        }
        let root = normalize_syntactic(self.root);
        if normalized == root || !normalized.starts_with(&root) {
            return Err(PurgeError::SafetyVeto {
                path: path.to_path_buf(),
                reason: format!("path is not strictly below root {}", root.display()),
            });
        }
        Ok(())
    }
}

fn is_absent(err: &io::Error) -> bool {
    // A regular file where a parent directory should be: nothing below it exists.
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn dir_size(path: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|e| match e.file_type() {
            Ok(ft) if ft.is_dir() => dir_size(&e.path()),
            _ => e.metadata().map(|m| m.len()).unwrap_or(0),
        })
        .sum()
}
