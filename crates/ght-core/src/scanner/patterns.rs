//! Static extraction patterns and the operation → permission table

use regex::Regex;
use std::sync::LazyLock;

/// How an extraction pattern turns a regex match into an operation label
#[derive(Debug, Clone, Copy)]
pub(crate) enum Capture {
    /// Use the whole match
    Whole,
    /// Use capture group 1
    Group,
    /// Use capture group 1, prefixed with `gh `
    GhSubcommand,
}

/// One regex applied to file contents
#[derive(Debug)]
pub(crate) struct ExtractionPattern {
    pub kind: OperationKind,
    pub regex: Regex,
    pub capture: Capture,
}

/// Category of an extracted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperationKind {
    Api,
    Cli,
    Endpoint,
    Keyword,
}

impl OperationKind {
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Api => "API",
            OperationKind::Cli => "CLI",
            OperationKind::Endpoint => "Endpoint",
            OperationKind::Keyword => "Keyword",
        }
    }
}

fn pattern(kind: OperationKind, regex: &str, capture: Capture) -> ExtractionPattern {
    ExtractionPattern {
        kind,
        // Literal patterns below; a typo is a programming error caught by tests
        regex: Regex::new(regex).unwrap_or_else(|e| panic!("invalid pattern {regex}: {e}")),
        capture,
    }
}

/// Patterns producing `API:` and `CLI:` operations, in match order
pub(crate) static EXTRACTION_PATTERNS: LazyLock<Vec<ExtractionPattern>> = LazyLock::new(|| {
    use Capture::*;
    use OperationKind::*;
    vec![
        pattern(Api, r"(?i)gh api.*?-X\s+(GET|POST|PUT|PATCH|DELETE)", Group),
        pattern(Api, r"(?i)https://api\.github\.com/[\w/\-{}]+", Whole),
        pattern(Api, r"(?i)requests\.(get|post|put|patch|delete)\(", Group),
        pattern(Api, r"(?i)Authorization.*token", Whole),
        pattern(Cli, r"(?i)\bgh\s+(\w+)", GhSubcommand),
        pattern(Cli, r#"(?i)gh api.*?['"](.*?)['"]"#, Group),
        pattern(Cli, r"(?i)gh repo view", Whole),
        pattern(Cli, r"(?i)gh workflow", Whole),
    ]
});

/// `/repos/...` fragments, terminated by a quote or whitespace
pub(crate) static ENDPOINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/repos/[^"\s]*["\s]"#).unwrap_or_else(|e| panic!("invalid endpoint pattern: {e}"))
});

/// Literal feature markers reported as `Keyword:` operations when present
pub(crate) const KEYWORD_MARKERS: &[&str] = &[
    "vulnerability-alerts",
    "vulnerability_alerts",
    "private_vulnerability_reporting",
    "dependency_graph_enabled",
    "dependency_submission_enabled",
    "secret_scanning_push_protection",
    "secret_scanning",
    "advanced_security",
    "CODEOWNERS",
    "dependabot.yml",
    "pull_request_template",
    "read:org",
];

/// Maps an operation substring to the permissions it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionRule {
    /// Matched case-insensitively against operation labels
    pub needle: &'static str,
    pub classic_scopes: &'static [&'static str],
    pub fine_grained: &'static [&'static str],
    pub reason: &'static str,
}

const REPO_SECURITY: &[&str] = &["repo", "security_events"];
const ADMIN_SECURITY_WRITE: &[&str] = &["Administration: Write", "Security events: Write"];

/// Operation → permission table, evaluated in order; every hit applies
pub const PERMISSION_RULES: &[PermissionRule] = &[
    // Repository security settings
    PermissionRule {
        needle: "vulnerability-alerts",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Enable/disable Dependabot vulnerability alerts",
    },
    PermissionRule {
        needle: "/repos/",
        classic_scopes: &["repo"],
        fine_grained: &["Contents: Write", "Metadata: Read"],
        reason: "Repository information and modification",
    },
    PermissionRule {
        needle: "private_vulnerability_reporting",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Enable private vulnerability reporting",
    },
    PermissionRule {
        needle: "dependency_graph_enabled",
        classic_scopes: &["repo"],
        fine_grained: &["Administration: Write"],
        reason: "Enable dependency graph",
    },
    PermissionRule {
        needle: "dependency_submission_enabled",
        classic_scopes: &["repo"],
        fine_grained: &["Administration: Write"],
        reason: "Enable dependency submission",
    },
    PermissionRule {
        needle: "vulnerability_alerts",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Enable vulnerability alerts",
    },
    PermissionRule {
        needle: "secret_scanning",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Configure secret scanning",
    },
    PermissionRule {
        needle: "secret_scanning_push_protection",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Configure push protection",
    },
    PermissionRule {
        needle: "advanced_security",
        classic_scopes: REPO_SECURITY,
        fine_grained: ADMIN_SECURITY_WRITE,
        reason: "Enable GitHub Advanced Security",
    },
    // gh CLI
    PermissionRule {
        needle: "gh repo",
        classic_scopes: &["repo"],
        fine_grained: &["Metadata: Read"],
        reason: "Repository information via CLI",
    },
    PermissionRule {
        needle: "gh api",
        classic_scopes: &["repo"],
        fine_grained: &["Contents: Write"],
        reason: "Direct API access via CLI",
    },
    PermissionRule {
        needle: "gh workflow",
        classic_scopes: &["workflow", "repo"],
        fine_grained: &["Actions: Write", "Contents: Write"],
        reason: "Workflow management via CLI",
    },
    // Managed files
    PermissionRule {
        needle: "CODEOWNERS",
        classic_scopes: &["repo"],
        fine_grained: &["Contents: Write"],
        reason: "Create and update CODEOWNERS file",
    },
    PermissionRule {
        needle: "dependabot.yml",
        classic_scopes: &["repo"],
        fine_grained: &["Contents: Write"],
        reason: "Create and update Dependabot configuration",
    },
    PermissionRule {
        needle: "pull_request_template",
        classic_scopes: &["repo"],
        fine_grained: &["Contents: Write"],
        reason: "Create and update PR templates",
    },
    // Team references in CODEOWNERS
    PermissionRule {
        needle: "read:org",
        classic_scopes: &["read:org"],
        fine_grained: &[],
        reason: "Read organization and team membership for CODEOWNERS",
    },
];

/// Classic scopes every automation run needs
pub const ESSENTIAL_CLASSIC_SCOPES: &[&str] =
    &["repo", "admin:repo_hook", "security_events", "read:org", "workflow"];

/// Fine-grained permissions every automation run needs
pub const ESSENTIAL_FINE_GRAINED: &[&str] = &[
    "Administration: Write",
    "Contents: Write",
    "Metadata: Read",
    "Security events: Write",
    "Actions: Write",
    "Pull requests: Write",
    "Issues: Write",
];

/// Rules whose needle occurs in `operation` (case-insensitive)
pub fn matching_rules(operation: &str) -> impl Iterator<Item = &'static PermissionRule> {
    let lowered = operation.to_lowercase();
    PERMISSION_RULES
        .iter()
        .filter(move |rule| lowered.contains(&rule.needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(EXTRACTION_PATTERNS.len(), 8);
        assert!(ENDPOINT_PATTERN.is_match("/repos/a/b "));
    }

    #[test]
    fn test_vulnerability_alerts_needs_security_events() {
        let rules: Vec<_> = matching_rules("Endpoint: /repos/acme/widgets/vulnerability-alerts")
            .map(|r| r.reason)
            .collect();
        assert_eq!(
            rules,
            vec![
                "Enable/disable Dependabot vulnerability alerts",
                "Repository information and modification"
            ]
        );
    }

    #[test]
    fn test_push_protection_also_matches_secret_scanning() {
        let count = matching_rules("Keyword: secret_scanning_push_protection").count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(matching_rules("Keyword: codeowners").count(), 1);
        assert_eq!(matching_rules("CLI: GH WORKFLOW").count(), 1);
        assert_eq!(matching_rules("API: PUT").count(), 0);
    }
}
