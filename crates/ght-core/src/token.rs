//! Personal access token validation

use crate::github::{GitHubApi, GitHubError};
use serde::Serialize;
use tracing::debug;

/// Outcome of validating a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TokenStatus {
    /// Accepted and carries every required scope
    Valid,
    /// Accepted but lacks at least one required scope
    MissingScopes,
    /// The API answered with a non-200 status
    Rejected { http_status: u16 },
    /// The API could not be reached
    Unreachable { message: String },
}

/// Result of [`validate_token`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenValidation {
    pub status: TokenStatus,
    /// Login of the token owner, when the token was accepted
    pub login: Option<String>,
    /// Scopes granted to the token
    pub scopes: Vec<String>,
    /// Required scopes the token lacks, in required order
    pub missing_scopes: Vec<String>,
}

impl TokenValidation {
    /// Whether the token is accepted and sufficiently scoped
    pub fn is_valid(&self) -> bool {
        self.status == TokenStatus::Valid
    }

    fn failed(status: TokenStatus) -> Self {
        Self {
            status,
            login: None,
            scopes: Vec::new(),
            missing_scopes: Vec::new(),
        }
    }
}

/// Validate `token` against `GET /user` and compare its scopes to
/// `required_scopes`.
///
/// Never fails: HTTP and transport errors become invalid outcomes.
pub fn validate_token<S: AsRef<str>>(
    api: &dyn GitHubApi,
    token: &str,
    required_scopes: &[S],
) -> TokenValidation {
    let user = match api.authenticated_user(token) {
        Ok(user) => user,
        Err(GitHubError::Status { status, .. }) => {
            debug!(status, "token rejected");
            return TokenValidation::failed(TokenStatus::Rejected {
                http_status: status,
            });
        }
        Err(e) => {
            debug!(error = %e, "token validation request failed");
            return TokenValidation::failed(TokenStatus::Unreachable {
                message: e.to_string(),
            });
        }
    };

    let missing_scopes = missing_scopes(&user.scopes, required_scopes);
    let status = if missing_scopes.is_empty() {
        TokenStatus::Valid
    } else {
        TokenStatus::MissingScopes
    };

    TokenValidation {
        status,
        login: user.login,
        scopes: user.scopes,
        missing_scopes,
    }
}

/// Required scopes absent from `granted`, preserving required order
pub fn missing_scopes<S: AsRef<str>>(granted: &[String], required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|scope| !granted.iter().any(|g| g == scope))
        .map(str::to_string)
        .collect()
}

/// What a classic scope grants, as shown in reports and remediation steps
pub fn scope_description(scope: &str) -> &'static str {
    match scope {
        "repo" => "Full control of private repositories - Essential for all repository operations",
        "admin:repo_hook" => "Full control of repository hooks - Required for webhook management",
        "security_events" => {
            "Read and write security events - Critical for security feature automation"
        }
        "read:org" => "Read org and team membership - Needed for CODEOWNERS team references",
        "workflow" => "Update GitHub Action workflows - Required if modifying workflow files",
        _ => "Required for automation operations",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::{MockCall, MockGitHubApi};

    #[test]
    fn test_scope_description_fallback() {
        assert!(scope_description("repo").starts_with("Full control"));
        assert_eq!(scope_description("gist"), "Required for automation operations");
    }

    const REQUIRED: &[&str] = &["repo", "admin:repo_hook", "security_events"];

    #[test]
    fn test_token_with_all_scopes_is_valid() {
        let api = MockGitHubApi::new().with_user(
            "octocat",
            &["repo", "admin:repo_hook", "security_events", "gist"],
        );

        let result = validate_token(&api, "t0ken", REQUIRED);
        assert!(result.is_valid());
        assert_eq!(result.login.as_deref(), Some("octocat"));
        assert!(result.missing_scopes.is_empty());
        assert_eq!(
            api.get_calls(),
            vec![MockCall::AuthenticatedUser {
                token: "t0ken".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_scope_is_reported() {
        let api = MockGitHubApi::new().with_user("octocat", &["repo", "admin:repo_hook"]);

        let result = validate_token(&api, "t0ken", REQUIRED);
        assert!(!result.is_valid());
        assert_eq!(result.status, TokenStatus::MissingScopes);
        assert_eq!(result.missing_scopes, vec!["security_events"]);
    }

    #[test]
    fn test_token_without_scope_header_misses_everything() {
        let api = MockGitHubApi::new().with_user("octocat", &[]);

        let result = validate_token(&api, "t0ken", REQUIRED);
        assert_eq!(result.missing_scopes, REQUIRED);
    }

    #[test]
    fn test_non_200_is_invalid() {
        let mut api = MockGitHubApi::new();
        api.user_status = 403;

        let result = validate_token(&api, "t0ken", REQUIRED);
        assert_eq!(result.status, TokenStatus::Rejected { http_status: 403 });
        assert!(!result.is_valid());
    }

    #[test]
    fn test_network_failure_is_invalid() {
        let api = MockGitHubApi::new()
            .with_user("octocat", REQUIRED)
            .with_error("connection reset");

        let result = validate_token(&api, "t0ken", REQUIRED);
        assert!(matches!(result.status, TokenStatus::Unreachable { .. }));
        assert!(!result.is_valid());
    }
}
