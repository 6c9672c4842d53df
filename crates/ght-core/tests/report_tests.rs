//! Integration tests for report generation

use chrono::{TimeZone, Utc};
use ght_core::config::AnalysisConfig;
use ght_core::report::{
    missing_sections, render_permissions_report, render_setup_guide, write_report,
    PERMISSIONS_SECTIONS, SETUP_GUIDE_SECTIONS,
};
use ght_core::scanner::analyze_repository;
use ght_core::RepoSlug;
use std::fs;
use tempfile::TempDir;

fn sample_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let workflows = temp_dir.path().join(".github/workflows");
    fs::create_dir_all(&workflows).unwrap();
    fs::write(
        workflows.join("security.yml"),
        "on: workflow_dispatch\njobs:\n  enable:\n    runs-on: ubuntu-latest\n    steps:\n      - run: gh api -X PUT \"/repos/${{ github.repository }}/vulnerability-alerts\"\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("check.py"),
        "requests.get('https://api.github.com/repos/acme/widgets', headers={'Authorization': 'token x'})\n",
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_permissions_report_written_twice_is_identical() {
    let temp_dir = sample_repo();
    let repo = RepoSlug::new("acme", "widgets");
    let path = temp_dir.path().join("PAT_PERMISSIONS_ANALYSIS.md");

    let analysis = analyze_repository(temp_dir.path(), &AnalysisConfig::default());
    let report = render_permissions_report(&analysis, Some(&repo));
    write_report(&path, &report, PERMISSIONS_SECTIONS).unwrap();
    let first = fs::read(&path).unwrap();

    // The report itself is not scanned (wrong extension), so a rescan matches
    let analysis = analyze_repository(temp_dir.path(), &AnalysisConfig::default());
    let report = render_permissions_report(&analysis, Some(&repo));
    write_report(&path, &report, PERMISSIONS_SECTIONS).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_permissions_report_content() {
    let temp_dir = sample_repo();
    let repo = RepoSlug::new("acme", "widgets");

    let analysis = analyze_repository(temp_dir.path(), &AnalysisConfig::default());
    let report = render_permissions_report(&analysis, Some(&repo));

    assert!(missing_sections(&report, PERMISSIONS_SECTIONS).is_empty());
    assert!(report.contains("- **`security_events`** - Read and write security events"));
    assert!(report.contains("- `/repos/{repository}/vulnerability-alerts`"));
    assert!(report.contains("- `https://api.github.com/repos/{repository}`"));
    assert!(report.contains("### `.github/workflows/security.yml`"));
    assert!(report.contains("### `check.py`"));
}

#[test]
fn test_setup_guide_is_reproducible() {
    let temp_dir = sample_repo();
    let analysis = analyze_repository(temp_dir.path(), &AnalysisConfig::default());
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let first = render_setup_guide(&[], &analysis.classic_scopes, at);
    let second = render_setup_guide(&[], &analysis.classic_scopes, at);
    assert_eq!(first, second);
    assert!(missing_sections(&first, SETUP_GUIDE_SECTIONS).is_empty());
    assert!(first.contains("- `workflow`"));
}
