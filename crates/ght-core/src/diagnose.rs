//! Environment readiness diagnostics
//!
//! Checks that the GitHub CLI is usable locally, or that the expected
//! variables are present inside GitHub Actions, and that the admin token is
//! valid. Problems are returned as [`Issue`]s; nothing is printed here.

use crate::env::{self, EnvSnapshot};
use crate::github::{GhCli, GhCliError, GitHubApi};
use crate::token::{scope_description, validate_token, TokenValidation};
use serde::Serialize;
use tracing::debug;

const INSTALL_GH: &str = "Install GitHub CLI from https://cli.github.com/";

/// Where the diagnostics ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    GitHubActions,
    Local,
}

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Environment::GitHubActions => "GitHub Actions",
            Environment::Local => "Local",
        }
    }
}

/// One line of the diagnostic transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Check {
    fn pass(name: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail,
        }
    }

    fn fail(name: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail,
        }
    }
}

/// Category of a problem, used to pick remediation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    GhCliMissing,
    GhCliUnauthenticated,
    AdminToken,
    MissingEnvVar,
}

/// A problem that blocks automation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of [`diagnose`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub environment: Environment,
    pub checks: Vec<Check>,
    /// Admin token validation, when a token was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenValidation>,
    pub issues: Vec<Issue>,
}

impl Diagnosis {
    /// No issues were found
    pub fn is_ready(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Run the diagnostics appropriate for the current environment
pub fn diagnose<S: AsRef<str>>(
    env: &EnvSnapshot,
    gh: &dyn GhCli,
    api: &dyn GitHubApi,
    required_scopes: &[S],
) -> Diagnosis {
    let environment = if env.in_github_actions() {
        Environment::GitHubActions
    } else {
        Environment::Local
    };
    debug!(environment = environment.label(), "running diagnostics");

    let mut checks = Vec::new();
    let mut issues = Vec::new();

    match environment {
        Environment::GitHubActions => check_actions_variables(env, &mut checks, &mut issues),
        Environment::Local => check_gh_cli(gh, &mut checks, &mut issues),
    }
    let token = check_admin_token(env, environment, api, required_scopes, &mut checks, &mut issues);

    Diagnosis {
        environment,
        checks,
        token,
        issues,
    }
}

fn check_actions_variables(env: &EnvSnapshot, checks: &mut Vec<Check>, issues: &mut Vec<Issue>) {
    for var in [env::GITHUB_REPOSITORY, env::GITHUB_TOKEN, env::GITHUB_ACTOR] {
        if env.is_set(var) {
            checks.push(Check::pass(format!("{var} is available"), None));
        } else {
            checks.push(Check::fail(format!("{var} is missing"), None));
            issues.push(Issue::new(
                IssueKind::MissingEnvVar,
                format!("Missing environment variable: {var}"),
            ));
        }
    }
}

fn check_gh_cli(gh: &dyn GhCli, checks: &mut Vec<Check>, issues: &mut Vec<Issue>) {
    let installed = match gh.run(&["--version"]) {
        Ok(output) if output.success => {
            let version = output.stdout.lines().next().unwrap_or_default().to_string();
            checks.push(Check::pass("GitHub CLI is installed", Some(version)));
            true
        }
        Ok(output) => {
            checks.push(Check::fail("GitHub CLI not working properly", Some(output.stderr)));
            issues.push(Issue::new(IssueKind::GhCliMissing, INSTALL_GH));
            true
        }
        Err(e) => {
            checks.push(Check::fail("GitHub CLI (gh) is not installed", Some(e.to_string())));
            issues.push(Issue::new(IssueKind::GhCliMissing, INSTALL_GH));
            false
        }
    };

    if !installed {
        checks.push(Check::fail(
            "Cannot check authentication - GitHub CLI not found",
            None,
        ));
        return;
    }

    match gh.run(&["auth", "status"]) {
        Ok(output) if output.success => {
            // Older gh versions print the status on stderr
            let detail = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            checks.push(Check::pass("GitHub CLI is authenticated", Some(detail)));
        }
        Ok(output) => {
            checks.push(Check::fail("GitHub CLI is not authenticated", Some(output.stderr)));
            issues.push(Issue::new(
                IssueKind::GhCliUnauthenticated,
                "Run 'gh auth login' to authenticate GitHub CLI",
            ));
        }
        Err(GhCliError::NotFound) => {
            checks.push(Check::fail(
                "Cannot check authentication - GitHub CLI not found",
                None,
            ));
        }
        Err(e) => {
            checks.push(Check::fail("GitHub CLI authentication check failed", Some(e.to_string())));
        }
    }
}

fn check_admin_token<S: AsRef<str>>(
    env: &EnvSnapshot,
    environment: Environment,
    api: &dyn GitHubApi,
    required_scopes: &[S],
    checks: &mut Vec<Check>,
    issues: &mut Vec<Issue>,
) -> Option<TokenValidation> {
    let in_actions = environment == Environment::GitHubActions;

    let Some(token) = env.admin_token() else {
        checks.push(Check::fail("GH_ADMIN_TOKEN is not set", None));
        let message = if in_actions {
            "Add GH_ADMIN_TOKEN secret to repository"
        } else {
            "Set GH_ADMIN_TOKEN environment variable with your PAT"
        };
        issues.push(Issue::new(IssueKind::AdminToken, message));
        return None;
    };

    checks.push(Check::pass(
        "GH_ADMIN_TOKEN is set",
        Some(format!("Length: {} characters", token.len())),
    ));

    let validation = validate_token(api, token, required_scopes);
    if validation.is_valid() {
        let owner = validation.login.as_deref().unwrap_or("Unknown");
        checks.push(Check::pass(
            "Token appears to be valid",
            Some(format!("Token belongs to: {owner}")),
        ));
    } else {
        let detail = if validation.missing_scopes.is_empty() {
            None
        } else {
            Some(format!("Missing scopes: {}", validation.missing_scopes.join(", ")))
        };
        checks.push(Check::fail("Token validation failed", detail));
        let message = if in_actions {
            "Check GH_ADMIN_TOKEN secret permissions"
        } else {
            "Check GH_ADMIN_TOKEN validity and permissions"
        };
        issues.push(Issue::new(IssueKind::AdminToken, message));
    }
    Some(validation)
}

/// Remediation steps for one kind of issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub title: &'static str,
    pub steps: Vec<String>,
}

/// Remediation blocks for the issue kinds present, in a fixed order
pub fn solutions_for<S: AsRef<str>>(issues: &[Issue], required_scopes: &[S]) -> Vec<Solution> {
    let has = |kind: IssueKind| issues.iter().any(|issue| issue.kind == kind);
    let mut solutions = Vec::new();

    if has(IssueKind::GhCliMissing) {
        solutions.push(Solution {
            title: "Install GitHub CLI",
            steps: vec![
                "Windows: winget install --id GitHub.cli".to_string(),
                "macOS: brew install gh".to_string(),
                "Linux: https://github.com/cli/cli/blob/trunk/docs/install_linux.md".to_string(),
            ],
        });
    }

    if has(IssueKind::GhCliUnauthenticated) {
        solutions.push(Solution {
            title: "Authenticate GitHub CLI",
            steps: vec![
                "Run: gh auth login".to_string(),
                "Follow the interactive prompts".to_string(),
            ],
        });
    }

    if has(IssueKind::AdminToken) {
        let mut steps = vec![
            "Go to GitHub → Settings → Developer settings → Personal access tokens".to_string(),
            "Create a new token with these scopes:".to_string(),
        ];
        steps.extend(required_scopes.iter().map(|scope| {
            let scope = scope.as_ref();
            format!("  - {scope} ({})", scope_description(scope))
        }));
        steps.push("For local use: export GH_ADMIN_TOKEN=<your-token>".to_string());
        steps.push(
            "For GitHub Actions: add a repository secret named GH_ADMIN_TOKEN".to_string(),
        );
        solutions.push(Solution {
            title: "Set up a Personal Access Token",
            steps,
        });
    }

    solutions
}
