//! Markdown report generation
//!
//! Rendering is pure: the same inputs always produce byte-identical text.
//! Writing is a separate step so callers can preview or print instead.

mod permissions;
mod setup_guide;

pub use permissions::{normalize_endpoint, render_permissions_report, PERMISSIONS_SECTIONS};
pub use setup_guide::{render_setup_guide, SETUP_GUIDE_SECTIONS};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors writing a report to disk
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Required headings absent from `report`.
///
/// A heading is present when some line, stripped of its leading `#`s,
/// equals it exactly.
pub fn missing_sections<'a>(report: &str, required: &[&'a str]) -> Vec<&'a str> {
    let headings: Vec<&str> = report
        .lines()
        .filter(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim())
        .collect();

    required
        .iter()
        .copied()
        .filter(|section| !headings.contains(section))
        .collect()
}

/// Write `content` to `path`, warning about any missing `required` headings
pub fn write_report(path: &Path, content: &str, required: &[&str]) -> Result<(), ReportError> {
    for section in missing_sections(content, required) {
        warn!(report = %path.display(), section, "report is missing a required section");
    }

    fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(report = %path.display(), bytes = content.len(), "report written");
    Ok(())
}
