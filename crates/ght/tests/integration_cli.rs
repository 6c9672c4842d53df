//! Integration tests for the `ght` binary
//!
//! Every test runs against a temporary repository root with `GHT_HOME`
//! pointed at a temporary directory and the GitHub variables removed, so
//! only offline operations are exercised.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GITHUB_VARS: &[&str] = &[
    "GH_ADMIN_TOKEN",
    "GITHUB_TOKEN",
    "GITHUB_ACTIONS",
    "GITHUB_REPOSITORY",
    "GITHUB_API_URL",
    "GITHUB_SERVER_URL",
    "GITHUB_ACTOR",
    "INPUT_INJECT_DATE",
    "INPUT_INJECT_AUTHOR",
    "INPUT_OVERWRITE",
];

fn ght(home: &TempDir, root: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("ght");
    cmd.env("GHT_HOME", home.path()).arg("--root").arg(root);
    for var in GITHUB_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_analyze_writes_permissions_report() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(
        &repo.path().join(".github/workflows/security.yml"),
        "on: workflow_dispatch\njobs:\n  enable:\n    runs-on: ubuntu-latest\n    steps:\n      - run: gh api -X PUT /repos/acme/widgets/vulnerability-alerts\n",
    );

    ght(&home, repo.path())
        .args(["--analyze", "--repo", "acme/widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = fs::read_to_string(repo.path().join("PAT_PERMISSIONS_ANALYSIS.md")).unwrap();
    assert!(report.contains("## Repository: acme/widgets"));
    assert!(report.contains("- `/repos/{repository}/vulnerability-alerts`"));
    assert!(report.contains("### `.github/workflows/security.yml`"));
}

#[test]
fn test_analyze_honours_repo_local_config() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    fs::create_dir_all(repo.path().join(".git")).unwrap();
    write(
        &repo.path().join(".ght.toml"),
        "[reports]\npermissions_file = \"perms.md\"\n",
    );

    ght(&home, repo.path()).arg("--analyze").assert().success();

    assert!(repo.path().join("perms.md").exists());
    assert!(!repo.path().join("PAT_PERMISSIONS_ANALYSIS.md").exists());
}

#[test]
fn test_cleanup_dry_run_leaves_files() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(&repo.path().join("security_check.py"), "print('legacy')\n");
    write(&repo.path().join("GITHUB_AUTOMATION_GUIDE.md"), "# Guide\n");

    ght(&home, repo.path())
        .args(["--cleanup", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove: security_check.py"))
        .stdout(predicate::str::contains("Would move: GITHUB_AUTOMATION_GUIDE.md"));

    assert!(repo.path().join("security_check.py").exists());
    assert!(repo.path().join("GITHUB_AUTOMATION_GUIDE.md").exists());
    assert!(!repo.path().join("docs").exists());
}

#[test]
fn test_cleanup_removes_and_moves() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(&repo.path().join("security_check.py"), "print('legacy')\n");
    write(&repo.path().join("GITHUB_AUTOMATION_GUIDE.md"), "# Guide\n");

    ght(&home, repo.path()).arg("--cleanup").assert().success();

    assert!(!repo.path().join("security_check.py").exists());
    assert!(!repo.path().join("GITHUB_AUTOMATION_GUIDE.md").exists());
    assert!(repo.path().join("docs/GITHUB_AUTOMATION_GUIDE.md").exists());
}

#[test]
fn test_validate_fails_without_workflows_directory() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    ght(&home, repo.path()).arg("--validate").assert().failure();
}

#[test]
fn test_validate_passes_clean_workflows() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(
        &repo.path().join(".github/workflows/ci.yml"),
        "on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo ok\n",
    );

    ght(&home, repo.path())
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("ci.yml"));
}

#[test]
fn test_validate_rejects_duplicate_triggers() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(
        &repo.path().join(".github/workflows/broken.yml"),
        "on:\n  push:\n\non:\n  workflow_dispatch:\njobs: {}\n",
    );

    ght(&home, repo.path()).arg("--validate").assert().failure();
}

#[test]
fn test_detect_server_json_defaults_to_github_com() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    let output = ght(&home, repo.path())
        .args(["--detect-server", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["detect_server"]["server_type"], "github-com");
    assert_eq!(value["detect_server"]["version"], "unknown");
    assert_eq!(value["detect_server"]["capabilities"]["secret_scanning"], true);
}

#[test]
fn test_detect_server_text_lists_every_feature() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    ght(&home, repo.path())
        .arg("--detect-server")
        .env("GITHUB_API_URL", "https://ghe.example.com/api/v3")
        .env("GITHUB_SERVER_URL", "https://ghe.example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("Advanced Security"))
        .stdout(predicate::str::contains("❌ Dependency Review"));
}

#[test]
fn test_detect_server_enterprise_without_token() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    let output = ght(&home, repo.path())
        .args(["--detect-server", "--json"])
        .env("GITHUB_API_URL", "https://ghe.example.com/api/v3")
        .env("GITHUB_SERVER_URL", "https://ghe.example.com")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["detect_server"]["server_type"], "ghes");
    assert_eq!(value["detect_server"]["capabilities"]["code_scanning"], false);
}

#[test]
fn test_security_status_requires_repository() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    ght(&home, repo.path())
        .arg("--security-status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repository configured"));
}

#[test]
fn test_invalid_repo_flag_is_rejected() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();

    ght(&home, repo.path())
        .args(["--detect-server", "--repo", "not-a-slug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected owner/name"));
}

#[test]
fn test_pr_templates_written() {
    let home = TempDir::new().unwrap();
    let repo = TempDir::new().unwrap();
    write(
        &repo.path().join("templates.yaml"),
        "- name: feature.md\n  content: |\n    ## Description\n    Created {{DATE}}\n    ## Checklist\n",
    );

    ght(&home, repo.path())
        .arg("--pr-templates")
        .env("INPUT_INJECT_DATE", "false")
        .assert()
        .success();

    let written =
        fs::read_to_string(repo.path().join(".github/PULL_REQUEST_TEMPLATE/feature.md")).unwrap();
    assert!(written.contains("Created {{DATE}}"));
}
