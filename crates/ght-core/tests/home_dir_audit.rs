//! Audit that home directory lookups go through `ght_core::home::home_dir`
//!
//! A raw `dirs::home_dir()` elsewhere would silently ignore `GHT_HOME`, which
//! integration tests rely on to isolate global config.

use std::fs;
use std::path::{Path, PathBuf};

fn find_rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(find_rust_files(&path));
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }

    files
}

fn check_file(path: &Path) -> Vec<String> {
    if path.ends_with("home.rs") || path.ends_with("home_dir_audit.rs") {
        return Vec::new();
    }
    let content = fs::read_to_string(path).expect("Failed to read file");

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().starts_with("//"))
        .filter(|(_, line)| line.contains("dirs::home_dir()") || line.contains("dirs::config_dir()"))
        .map(|(i, _)| {
            format!(
                "{}:{}: raw home directory lookup - use ght_core::home::home_dir instead",
                path.display(),
                i + 1
            )
        })
        .collect()
}

#[test]
fn audit_no_raw_home_dir_calls() {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let crates_dir = workspace_root.join("crates");

    let rust_files = find_rust_files(&crates_dir);
    assert!(!rust_files.is_empty(), "No Rust files found in {}", crates_dir.display());

    let violations: Vec<String> = rust_files.iter().flat_map(|f| check_file(f)).collect();
    assert!(
        violations.is_empty(),
        "Home directory audit failed:\n{}",
        violations.join("\n")
    );
}
