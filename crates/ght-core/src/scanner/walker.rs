//! Collect the files a scan reads

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFile {
    /// Path relative to the repository root, `/`-separated
    pub relative: String,
    /// Path on disk
    pub path: PathBuf,
}

/// Files under `roots` (relative to `root`) with one of `extensions`.
///
/// Overlapping roots yield each file once; results are ordered by relative
/// path. Directories named in `exclude_dirs` are not descended into.
/// Missing roots are skipped.
pub fn collect_files(
    root: &Path,
    roots: &[String],
    extensions: &[String],
    exclude_dirs: &[String],
) -> Vec<ScanFile> {
    let mut files = BTreeMap::new();

    for scan_root in roots {
        let start = root.join(scan_root);
        if !start.exists() {
            debug!(path = %start.display(), "scan root missing");
            continue;
        }

        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, exclude_dirs));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            // Symlinks are kept and read through; a dangling one fails at read time
            if entry.file_type().is_dir() || !has_extension(entry.path(), extensions) {
                continue;
            }
            let relative = relative_label(root, entry.path());
            files.entry(relative.clone()).or_insert_with(|| ScanFile {
                relative,
                path: entry.into_path(),
            });
        }
    }

    files.into_values().collect()
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    // The walk root itself is never excluded, so `.` still works
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude_dirs.iter().any(|d| d == name))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn relative_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
