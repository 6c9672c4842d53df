//! Static PAT permission analysis
//!
//! Scans workflows and scripts for GitHub API calls, `gh` invocations and
//! feature markers, then maps each finding through [`PERMISSION_RULES`] to
//! the classic scopes and fine-grained permissions it needs.

mod patterns;
mod walker;

pub use patterns::{
    matching_rules, PermissionRule, ESSENTIAL_CLASSIC_SCOPES, ESSENTIAL_FINE_GRAINED,
    PERMISSION_RULES,
};
pub use walker::{collect_files, ScanFile};

use crate::config::AnalysisConfig;
use patterns::{Capture, OperationKind, ENDPOINT_PATTERN, EXTRACTION_PATTERNS, KEYWORD_MARKERS};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, warn};

const WORKFLOWS_DIR: &str = ".github/workflows";

/// Why one operation in one file needs a set of permissions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Justification {
    pub file: String,
    pub operation: String,
    pub reason: String,
    pub classic_scopes: Vec<String>,
    pub fine_grained: Vec<String>,
}

/// Operations extracted from one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOperations {
    /// Path relative to the repository root
    pub file: String,
    pub operations: Vec<String>,
}

/// Result of a permission scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionAnalysis {
    /// Number of files read
    pub files_scanned: usize,
    /// Files with at least one operation
    pub files: Vec<FileOperations>,
    pub classic_scopes: BTreeSet<String>,
    pub fine_grained: BTreeSet<String>,
    /// Operations referencing `api.github.com` or `/repos/`
    pub api_endpoints: BTreeSet<String>,
    /// Deduplicated, in discovery order
    pub justifications: Vec<Justification>,
}

impl PermissionAnalysis {
    /// Distinct files that contributed a justification
    pub fn justified_files(&self) -> BTreeSet<&str> {
        self.justifications.iter().map(|j| j.file.as_str()).collect()
    }
}

/// Scan the repository at `root` using the configured roots and filters
pub fn analyze_repository(root: &Path, config: &AnalysisConfig) -> PermissionAnalysis {
    let files = collect_files(root, &config.paths, &config.extensions, &config.exclude_dirs);
    let mut scanned = Vec::with_capacity(files.len());
    let mut touched_workflows = false;

    for file in &files {
        let content = match std::fs::read(&file.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(file = %file.relative, error = %e, "skipping unreadable file");
                continue;
            }
        };
        debug!(file = %file.relative, "scanning");

        if file.relative.starts_with(WORKFLOWS_DIR) {
            touched_workflows = true;
        }
        let operations = extract_operations(&content);
        scanned.push(FileOperations {
            file: file.relative.clone(),
            operations,
        });
    }

    let files_scanned = scanned.len();
    scanned.retain(|f| !f.operations.is_empty());
    let mut analysis = classify_operations(scanned, touched_workflows);
    analysis.files_scanned = files_scanned;
    analysis
}

/// Extract labelled operations (`API:`, `CLI:`, `Endpoint:`, `Keyword:`)
/// from file contents. Duplicates are dropped, first occurrence wins.
pub fn extract_operations(content: &str) -> Vec<String> {
    let mut operations = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |kind: OperationKind, value: &str| {
        let label = format!("{}: {}", kind.label(), value);
        if seen.insert(label.clone()) {
            operations.push(label);
        }
    };

    for pattern in EXTRACTION_PATTERNS.iter() {
        for captures in pattern.regex.captures_iter(content) {
            let value = match pattern.capture {
                Capture::Whole => captures.get(0).map(|m| m.as_str().to_string()),
                Capture::Group => captures.get(1).map(|m| m.as_str().to_string()),
                Capture::GhSubcommand => captures.get(1).map(|m| format!("gh {}", m.as_str())),
            };
            if let Some(value) = value {
                push(pattern.kind, &value);
            }
        }
    }

    for found in ENDPOINT_PATTERN.find_iter(content) {
        let endpoint = found.as_str().trim_end_matches(|c: char| c == '"' || c.is_whitespace());
        push(OperationKind::Endpoint, endpoint);
    }

    let lowered = content.to_lowercase();
    for marker in KEYWORD_MARKERS {
        if lowered.contains(&marker.to_lowercase()) {
            push(OperationKind::Keyword, marker);
        }
    }

    operations
}

/// Map extracted operations to permissions.
///
/// `touched_workflows` adds the `workflow` scope and `Actions: Write`.
/// The essential permission sets are always included.
pub fn classify_operations(
    files: Vec<FileOperations>,
    touched_workflows: bool,
) -> PermissionAnalysis {
    let mut analysis = PermissionAnalysis::default();
    let mut seen = HashSet::new();

    for file in &files {
        for operation in &file.operations {
            for rule in matching_rules(operation) {
                analysis
                    .classic_scopes
                    .extend(rule.classic_scopes.iter().map(|s| s.to_string()));
                analysis
                    .fine_grained
                    .extend(rule.fine_grained.iter().map(|s| s.to_string()));
                let justification = Justification {
                    file: file.file.clone(),
                    operation: operation.clone(),
                    reason: rule.reason.to_string(),
                    classic_scopes: to_strings(rule.classic_scopes),
                    fine_grained: to_strings(rule.fine_grained),
                };
                if seen.insert(justification.clone()) {
                    analysis.justifications.push(justification);
                }
            }

            if operation.contains("api.github.com") || operation.contains("/repos/") {
                analysis.api_endpoints.insert(operation.clone());
            }
        }
    }

    analysis
        .classic_scopes
        .extend(ESSENTIAL_CLASSIC_SCOPES.iter().map(|s| s.to_string()));
    analysis
        .fine_grained
        .extend(ESSENTIAL_FINE_GRAINED.iter().map(|s| s.to_string()));

    if touched_workflows {
        analysis.classic_scopes.insert("workflow".to_string());
        analysis.fine_grained.insert("Actions: Write".to_string());
        analysis.justifications.push(Justification {
            file: "Multiple workflow files".to_string(),
            operation: "Workflow modification".to_string(),
            reason: "Required to update GitHub Actions workflows".to_string(),
            classic_scopes: vec!["workflow".to_string()],
            fine_grained: vec!["Actions: Write".to_string()],
        });
    }

    analysis.files = files;
    analysis
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_gh_cli_and_api_calls() {
        let content = r#"
run: |
  gh api -X PUT "/repos/${{ github.repository }}/vulnerability-alerts"
  gh workflow run deploy.yml
"#;
        let ops = extract_operations(content);
        assert!(ops.contains(&"API: PUT".to_string()));
        assert!(ops.contains(&"CLI: gh api".to_string()));
        assert!(ops.contains(&"CLI: gh workflow".to_string()));
        assert!(ops.contains(&"CLI: /repos/${{ github.repository }}/vulnerability-alerts".to_string()));
        assert!(ops.contains(&"Endpoint: /repos/${{".to_string()));
        assert!(ops.contains(&"Keyword: vulnerability-alerts".to_string()));
    }

    #[test]
    fn test_extract_python_requests() {
        let content = "resp = requests.put(f'https://api.github.com/repos/acme/widgets', headers={'Authorization': f'token {t}'})\n";
        let ops = extract_operations(content);
        assert_eq!(ops[0], "API: https://api.github.com/repos/acme/widgets");
        assert!(ops.contains(&"API: put".to_string()));
        assert!(ops.iter().any(|o| o.starts_with("API: Authorization")));
    }

    #[test]
    fn test_gh_requires_word_boundary() {
        let ops = extract_operations("the hash sigh repo was lost\n");
        assert!(ops.iter().all(|o| !o.starts_with("CLI:")));
    }

    #[test]
    fn test_endpoint_stops_at_quote_or_whitespace() {
        let ops = extract_operations("curl \"https://x/repos/acme/widgets/topics\" -d @body\n");
        assert!(ops.contains(&"Endpoint: /repos/acme/widgets/topics".to_string()));
    }

    #[test]
    fn test_duplicate_operations_are_dropped() {
        let ops = extract_operations("gh repo view\ngh repo view\n");
        assert_eq!(
            ops.iter().filter(|o| o.as_str() == "CLI: gh repo").count(),
            1
        );
    }

    #[test]
    fn test_vulnerability_alerts_requires_security_events() {
        let files = vec![FileOperations {
            file: "scripts/enable.sh".to_string(),
            operations: extract_operations("curl -X PUT $API/repos/$REPO/vulnerability-alerts \n"),
        }];
        let analysis = classify_operations(files, false);
        assert!(analysis.classic_scopes.contains("security_events"));
        assert!(analysis
            .justifications
            .iter()
            .any(|j| j.reason == "Enable/disable Dependabot vulnerability alerts"));
        assert!(analysis
            .api_endpoints
            .contains("Endpoint: /repos/$REPO/vulnerability-alerts"));
    }

    #[test]
    fn test_essential_permissions_always_present() {
        let analysis = classify_operations(Vec::new(), false);
        let classic: Vec<_> = analysis.classic_scopes.iter().map(String::as_str).collect();
        assert_eq!(
            classic,
            vec!["admin:repo_hook", "read:org", "repo", "security_events", "workflow"]
        );
        assert_eq!(analysis.fine_grained.len(), ESSENTIAL_FINE_GRAINED.len());
        assert!(analysis.justifications.is_empty());
    }

    #[test]
    fn test_workflow_files_add_synthetic_justification() {
        let analysis = classify_operations(Vec::new(), true);
        assert!(analysis.classic_scopes.contains("workflow"));
        assert!(analysis.fine_grained.contains("Actions: Write"));
        assert_eq!(analysis.justifications.len(), 1);
        assert_eq!(analysis.justifications[0].file, "Multiple workflow files");
    }

    #[test]
    fn test_repeated_justifications_are_deduplicated() {
        let file = FileOperations {
            file: "a.yml".to_string(),
            operations: vec!["CLI: gh workflow".to_string(), "CLI: gh workflow".to_string()],
        };
        let analysis = classify_operations(vec![file], false);
        assert_eq!(analysis.justifications.len(), 1);
        assert_eq!(analysis.justified_files().into_iter().collect::<Vec<_>>(), vec!["a.yml"]);
    }
}
