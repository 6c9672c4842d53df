//! Lint `.github/workflows` for mistakes that break automation runs

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Workflow directory relative to the repository root
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Errors that prevent validation from running at all
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No .github/workflows directory found at {path}")]
    MissingDirectory { path: PathBuf },

    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found in one workflow file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub severity: Severity,
    pub message: String,
}

/// Result of [`validate_workflows`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowValidation {
    /// Workflow file names, sorted
    pub files: Vec<String>,
    pub findings: Vec<Finding>,
}

impl WorkflowValidation {
    /// No error-level findings. Warnings do not fail validation.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }
}

/// Validate every `*.yml` / `*.yaml` file in `<root>/.github/workflows`
pub fn validate_workflows(root: &Path) -> Result<WorkflowValidation, WorkflowError> {
    let dir = root.join(WORKFLOWS_DIR);
    if !dir.is_dir() {
        return Err(WorkflowError::MissingDirectory { path: dir });
    }

    let entries = fs::read_dir(&dir).map_err(|source| WorkflowError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_workflow_file(path))
        .collect();
    paths.sort();

    let mut validation = WorkflowValidation::default();
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file = %name, "validating workflow");

        match fs::read_to_string(&path) {
            Ok(content) => validation.findings.extend(check_workflow(&name, &content)),
            Err(e) => validation.findings.push(Finding {
                file: name.clone(),
                severity: Severity::Error,
                message: format!("Error reading {name}: {e}"),
            }),
        }
        validation.files.push(name);
    }

    Ok(validation)
}

fn is_workflow_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

/// Lint one workflow's contents
pub fn check_workflow(name: &str, content: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut push = |severity: Severity, message: String| {
        findings.push(Finding {
            file: name.to_string(),
            severity,
            message,
        });
    };

    let duplicate_on = top_level_on_count(content) > 1;
    if duplicate_on {
        push(Severity::Error, format!("Duplicate 'on:' declarations in {name}"));
    } else if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(content) {
        push(Severity::Error, format!("Invalid YAML in {name}: {e}"));
    }

    if content.contains("--raw-field")
        && (content.contains('=') || content.contains("[]"))
        && (content.contains("required_status_checks") || content.contains("restrictions"))
    {
        push(
            Severity::Error,
            format!("Incorrect --raw-field usage for complex objects in {name} (use --input)"),
        );
    }

    if content.contains("set -e") && !content.contains("set +e") {
        push(
            Severity::Warning,
            format!("{name} uses 'set -e' without error handling"),
        );
    }

    if content.contains("workflow_call") && !content.contains("secrets.GH_ADMIN_TOKEN") {
        push(
            Severity::Warning,
            format!("{name} may need the GH_ADMIN_TOKEN secret"),
        );
    }

    findings
}

/// Unindented `on:` keys, quoted or not
fn top_level_on_count(content: &str) -> usize {
    content
        .lines()
        .filter(|line| {
            let key = line.split(':').next().unwrap_or_default();
            line.contains(':') && matches!(key, "on" | "\"on\"" | "'on'")
        })
        .count()
}
