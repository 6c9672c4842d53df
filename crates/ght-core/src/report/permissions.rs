//! `PAT_PERMISSIONS_ANALYSIS.md`

use crate::context::RepoSlug;
use crate::scanner::{Justification, PermissionAnalysis};
use crate::token::scope_description;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Headings every permissions report must contain
pub const PERMISSIONS_SECTIONS: &[&str] = &[
    "Classic Personal Access Token Scopes",
    "Fine-grained Personal Access Token Permissions",
    "GitHub API Endpoints Used",
    "Security Features Automation Matrix",
    "Permission Justifications",
    "Summary",
    "Quick PAT Setup Guide",
];

const SECURITY_MATRIX: &[(&str, &str, &str)] = &[
    ("Dependabot Vulnerability Alerts", "/repos/{repo}/vulnerability-alerts", "repo, security_events"),
    ("Private Vulnerability Reporting", "/repos/{repo}", "repo, security_events"),
    ("Dependency Graph", "/repos/{repo}", "repo"),
    ("Secret Scanning", "/repos/{repo}", "repo, security_events"),
    ("Push Protection", "/repos/{repo}", "repo, security_events"),
    ("Advanced Security", "/repos/{repo}", "repo, security_events"),
];

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\{.*?\}\}").unwrap_or_else(|e| panic!("invalid expression pattern: {e}"))
});

/// Strip the operation label and replace `${{ ... }}` expressions and the
/// repository slug with `{repository}`. The slug only matches as whole path
/// segments, so `acme/widgets-v2` is left alone for `acme/widgets`.
pub fn normalize_endpoint(operation: &str, repository: Option<&RepoSlug>) -> String {
    let endpoint = operation
        .split_once(": ")
        .map_or(operation, |(_, value)| value);
    let normalized = EXPRESSION.replace_all(endpoint, "{repository}").into_owned();
    let Some(repo) = repository else {
        return normalized;
    };
    let pattern = format!(r"/{}(?P<end>[/?#]|$)", regex::escape(&repo.to_string()));
    match Regex::new(&pattern) {
        Ok(slug) => slug
            .replace_all(&normalized, "/{repository}${end}")
            .into_owned(),
        Err(_) => normalized,
    }
}

/// Render the permission analysis as Markdown
pub fn render_permissions_report(
    analysis: &PermissionAnalysis,
    repository: Option<&RepoSlug>,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let title = repository.map_or_else(|| "this repository".to_string(), |r| r.to_string());

    lines.push("# Complete Personal Access Token Permissions Analysis".to_string());
    lines.push(format!("## Repository: {title}"));
    lines.push(String::new());
    lines.push("Based on analysis of all workflows, scripts, and API operations.".to_string());
    lines.push(String::new());

    lines.push("## Classic Personal Access Token Scopes".to_string());
    lines.push(String::new());
    lines.push("### Required Scopes (All Essential)".to_string());
    lines.push(String::new());
    for scope in &analysis.classic_scopes {
        lines.push(format!("- **`{scope}`** - {}", scope_description(scope)));
    }
    lines.push(String::new());

    lines.push("## Fine-grained Personal Access Token Permissions".to_string());
    lines.push(String::new());
    lines.push("If using fine-grained tokens, ensure these permissions:".to_string());
    lines.push(String::new());
    lines.push("### Repository Permissions".to_string());
    for permission in analysis.fine_grained.iter().filter(|p| p.contains(':')) {
        lines.push(format!("- **{permission}**"));
    }
    lines.push(String::new());

    lines.push("## GitHub API Endpoints Used".to_string());
    lines.push(String::new());
    lines.push("The automation interacts with these GitHub API endpoints:".to_string());
    lines.push(String::new());
    let endpoints: BTreeSet<String> = analysis
        .api_endpoints
        .iter()
        .filter(|op| op.contains("/repos/"))
        .map(|op| normalize_endpoint(op, repository))
        .collect();
    for endpoint in &endpoints {
        lines.push(format!("- `{endpoint}`"));
    }
    lines.push(String::new());

    lines.push("## Security Features Automation Matrix".to_string());
    lines.push(String::new());
    lines.push("| Security Feature | API Endpoint | Required Permissions |".to_string());
    lines.push("|------------------|--------------|----------------------|".to_string());
    for (feature, endpoint, permissions) in SECURITY_MATRIX {
        lines.push(format!("| {feature} | `{endpoint}` | `{permissions}` |"));
    }
    lines.push(String::new());

    lines.push("## Permission Justifications".to_string());
    lines.push(String::new());
    lines.push("Why each permission is required:".to_string());
    lines.push(String::new());
    let mut by_file: BTreeMap<&str, Vec<&Justification>> = BTreeMap::new();
    for justification in &analysis.justifications {
        by_file
            .entry(justification.file.as_str())
            .or_default()
            .push(justification);
    }
    for (file, justifications) in by_file {
        lines.push(format!("### `{file}`"));
        lines.push(String::new());
        for j in justifications {
            lines.push(format!("- **Operation**: {}", j.operation));
            lines.push(format!("  - **Purpose**: {}", j.reason));
            lines.push(format!("  - **Classic Scopes**: `{}`", j.classic_scopes.join(", ")));
            if !j.fine_grained.is_empty() {
                lines.push(format!("  - **Fine-grained**: `{}`", j.fine_grained.join(", ")));
            }
            lines.push(String::new());
        }
    }

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("- **Total Classic Scopes Required**: {}", analysis.classic_scopes.len()));
    lines.push(format!("- **Total Fine-grained Permissions**: {}", analysis.fine_grained.len()));
    lines.push(format!("- **API Endpoints Used**: {}", analysis.api_endpoints.len()));
    lines.push(format!("- **Files Analyzed**: {}", analysis.justified_files().len()));
    lines.push(String::new());

    lines.push("## Quick PAT Setup Guide".to_string());
    lines.push(String::new());
    lines.push("### Step 1: Create Classic PAT".to_string());
    lines.push(
        "1. Go to GitHub → Settings → Developer settings → Personal access tokens → Tokens (classic)"
            .to_string(),
    );
    lines.push("2. Click 'Generate new token (classic)'".to_string());
    lines.push("3. Set expiration to 90+ days".to_string());
    lines.push("4. Select these scopes:".to_string());
    lines.push(String::new());
    for scope in &analysis.classic_scopes {
        lines.push(format!("   - `{scope}`"));
    }
    lines.push(String::new());
    lines.push("### Step 2: Add to Repository".to_string());
    lines.push("1. Go to your repository → Settings → Secrets and variables → Actions".to_string());
    lines.push("2. Click 'New repository secret'".to_string());
    lines.push("3. Name: `GH_ADMIN_TOKEN`".to_string());
    lines.push("4. Value: Paste your generated PAT".to_string());
    lines.push("5. Click 'Add secret'".to_string());
    lines.push(String::new());
    lines.push("### Step 3: Verify Setup".to_string());
    lines.push("```bash".to_string());
    lines.push("ght --diagnose".to_string());
    lines.push("```".to_string());
    lines.push(String::new());
    lines.join("\n")
}
