//! `AUTOMATION_SETUP_GUIDE.md`

use crate::diagnose::Issue;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Headings every setup guide must contain
pub const SETUP_GUIDE_SECTIONS: &[&str] = &[
    "Required Personal Access Token Permissions",
    "Quick Setup Steps",
    "Verification",
];

/// Render the setup guide. `generated_at` is printed verbatim so output is
/// reproducible for a fixed timestamp.
pub fn render_setup_guide(
    issues: &[Issue],
    classic_scopes: &BTreeSet<String>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines: Vec<String> = vec![
        "# GitHub Repository Automation - Setup Guide".to_string(),
        format!("*Generated on {}*", generated_at.format("%Y-%m-%d at %H:%M:%S UTC")),
        String::new(),
    ];

    let status = if issues.is_empty() { "Ready" } else { "Setup Required" };
    lines.push(format!("## Setup Status: {status}"));
    lines.push(String::new());

    if !issues.is_empty() {
        lines.push("### Issues Found:".to_string());
        for (i, issue) in issues.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, issue.message));
        }
        lines.push(String::new());
    }

    lines.push("## Required Personal Access Token Permissions".to_string());
    lines.push(String::new());
    lines.push("### Classic PAT Scopes (All Required)".to_string());
    lines.extend(classic_scopes.iter().map(|scope| format!("- `{scope}`")));
    lines.push(String::new());

    lines.extend(
        [
            "## Quick Setup Steps",
            "",
            "1. **Create Personal Access Token**",
            "   - Go to GitHub → Settings → Developer settings → Personal access tokens",
            "   - Create new token with all scopes listed above",
            "",
            "2. **Add to Repository Secrets**",
            "   - Go to repository → Settings → Secrets and variables → Actions",
            "   - Add secret named `GH_ADMIN_TOKEN` with your token",
            "",
            "3. **Install GitHub CLI** (for local use)",
            "   - Windows: `winget install --id GitHub.cli`",
            "   - macOS: `brew install gh`",
            "   - Linux: See https://cli.github.com/",
            "",
            "4. **Run Automation**",
            "   - Go to the Actions tab and run the repository automation workflow",
            "",
            "## Verification",
            "```bash",
            "# Run the toolkit again to verify setup",
            "ght --diagnose",
            "```",
            "",
            "---",
            "*Generated by ght*",
            "",
        ]
        .iter()
        .map(|line| line.to_string()),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnose::IssueKind;
    use crate::report::missing_sections;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn scopes() -> BTreeSet<String> {
        ["workflow", "repo"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ready_guide() {
        let guide = render_setup_guide(&[], &scopes(), at());
        assert!(guide.contains("*Generated on 2025-03-14 at 09:26:53 UTC*"));
        assert!(guide.contains("## Setup Status: Ready"));
        assert!(!guide.contains("Issues Found"));
        assert!(guide.contains("- `repo`\n- `workflow`\n"));
        assert!(missing_sections(&guide, SETUP_GUIDE_SECTIONS).is_empty());
    }

    #[test]
    fn test_issues_are_numbered() {
        let issues = vec![
            Issue {
                kind: IssueKind::GhCliMissing,
                message: "Install GitHub CLI from https://cli.github.com/".to_string(),
            },
            Issue {
                kind: IssueKind::AdminToken,
                message: "Set GH_ADMIN_TOKEN environment variable with your PAT".to_string(),
            },
        ];
        let guide = render_setup_guide(&issues, &scopes(), at());
        assert!(guide.contains("## Setup Status: Setup Required"));
        assert!(guide.contains("1. Install GitHub CLI"));
        assert!(guide.contains("2. Set GH_ADMIN_TOKEN"));
    }

    #[test]
    fn test_identical_inputs_render_identically() {
        assert_eq!(
            render_setup_guide(&[], &scopes(), at()),
            render_setup_guide(&[], &scopes(), at())
        );
    }
}
