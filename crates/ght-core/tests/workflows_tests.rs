//! Integration tests for workflow validation

use ght_core::workflows::{validate_workflows, Severity, WorkflowError};
use std::fs;
use tempfile::TempDir;

fn repo_with_workflows(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join(".github/workflows");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
    temp_dir
}

#[test]
fn test_missing_workflows_directory() {
    let temp_dir = TempDir::new().unwrap();
    let err = validate_workflows(temp_dir.path()).unwrap_err();
    assert!(matches!(err, WorkflowError::MissingDirectory { .. }));
}

#[test]
fn test_clean_workflows_validate() {
    let temp_dir = repo_with_workflows(&[
        ("b.yaml", "on: push\njobs: {}\n"),
        ("a.yml", "on:\n  pull_request:\njobs: {}\n"),
        ("notes.txt", "on:\non:\n"),
    ]);

    let validation = validate_workflows(temp_dir.path()).unwrap();
    assert_eq!(validation.files, vec!["a.yml", "b.yaml"]);
    assert!(validation.findings.is_empty());
    assert!(validation.is_valid());
}

#[test]
fn test_duplicate_on_fails_validation() {
    let temp_dir = repo_with_workflows(&[
        ("good.yml", "on: push\njobs: {}\n"),
        ("broken.yml", "on:\n  push:\n\non:\n  workflow_dispatch:\njobs: {}\n"),
    ]);

    let validation = validate_workflows(temp_dir.path()).unwrap();
    assert!(!validation.is_valid());
    let errors: Vec<_> = validation.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].file, "broken.yml");
    assert_eq!(errors[0].severity, Severity::Error);
}

#[test]
fn test_empty_directory_is_valid() {
    let temp_dir = repo_with_workflows(&[]);
    let validation = validate_workflows(temp_dir.path()).unwrap();
    assert!(validation.files.is_empty());
    assert!(validation.is_valid());
}
