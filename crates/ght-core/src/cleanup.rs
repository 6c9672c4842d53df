//! Remove legacy files and move documentation into the docs directory

use crate::config::CleanupConfig;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path};
use tracing::{info, warn};

/// A file that could not be removed or moved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    pub file: String,
    pub error: String,
}

/// What cleanup did (or would do, for a dry run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub dry_run: bool,
    pub removed: Vec<String>,
    /// Files moved into the docs directory
    pub moved: Vec<String>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove `config.remove` and move `config.move_to_docs` into
/// `config.docs_dir`, relative to `root`.
///
/// Missing files are skipped. Entries that escape `root`, a docs directory
/// that escapes `root` or cannot be created, and per-file I/O errors are
/// recorded in [`CleanupOutcome::failed`]; nothing aborts the run. With
/// `dry_run` the filesystem is left untouched.
pub fn cleanup_repository(root: &Path, config: &CleanupConfig, dry_run: bool) -> CleanupOutcome {
    let mut outcome = CleanupOutcome {
        dry_run,
        ..CleanupOutcome::default()
    };

    for file in &config.remove {
        if !is_contained(file) {
            outcome.failed.push(outside_root(file));
            continue;
        }
        let path = root.join(file);
        if !path.exists() {
            continue;
        }
        if dry_run {
            outcome.removed.push(file.clone());
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(file = %file, "removed");
                outcome.removed.push(file.clone());
            }
            Err(e) => {
                warn!(file = %file, error = %e, "failed to remove");
                outcome.failed.push(CleanupFailure {
                    file: file.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let docs_dir = root.join(&config.docs_dir);
    // Set once the docs directory is known to be unusable
    let mut docs_error = (!is_contained(&config.docs_dir))
        .then(|| format!("docs directory {} is outside the repository", config.docs_dir));
    let mut docs_ready = false;

    for file in &config.move_to_docs {
        if !is_contained(file) {
            outcome.failed.push(outside_root(file));
            continue;
        }
        let source = root.join(file);
        if !source.is_file() {
            continue;
        }
        if let Some(error) = &docs_error {
            outcome.failed.push(CleanupFailure {
                file: file.clone(),
                error: error.clone(),
            });
            continue;
        }
        if dry_run {
            outcome.moved.push(file.clone());
            continue;
        }

        if !docs_ready {
            if let Err(e) = fs::create_dir_all(&docs_dir) {
                warn!(docs_dir = %config.docs_dir, error = %e, "failed to create docs directory");
                let error = format!("failed to create docs directory {}: {e}", config.docs_dir);
                outcome.failed.push(CleanupFailure {
                    file: file.clone(),
                    error: error.clone(),
                });
                docs_error = Some(error);
                continue;
            }
            docs_ready = true;
        }
        let Some(name) = source.file_name() else {
            continue;
        };
        match fs::rename(&source, docs_dir.join(name)) {
            Ok(()) => {
                info!(file = %file, docs_dir = %config.docs_dir, "moved");
                outcome.moved.push(file.clone());
            }
            Err(e) => {
                warn!(file = %file, error = %e, "failed to move");
                outcome.failed.push(CleanupFailure {
                    file: file.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

/// Relative path with no `..` components
fn is_contained(file: &str) -> bool {
    let path = Path::new(file);
    !file.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn outside_root(file: &str) -> CleanupFailure {
    CleanupFailure {
        file: file.to_string(),
        error: "path is outside the repository".to_string(),
    }
}
