//! Mock GitHub API and `gh` runner for testing

use super::cli::{GhCli, GhCliError, GhOutput};
use super::client::GitHubApi;
use super::error::GitHubError;
use super::types::{AuthenticatedUser, RepoMetadata, ServerMeta};
use crate::context::RepoSlug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Record of API calls for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    AuthenticatedUser { token: String },
    Repository(RepoSlug),
    EnableVulnerabilityAlerts(RepoSlug),
    Meta,
}

/// Mock GitHub API. Returns canned data.
///
/// A `None` response is served as HTTP 404.
#[derive(Debug, Clone)]
pub struct MockGitHubApi {
    /// Response to `GET /user`
    pub user: Option<AuthenticatedUser>,
    /// Status served for `GET /user` when `user` is `None`
    pub user_status: u16,
    /// Response to `GET /repos/{owner}/{repo}`
    pub repository: Option<RepoMetadata>,
    /// Status returned by the vulnerability-alerts PUT
    pub vulnerability_alerts_status: u16,
    /// Response to `GET /meta`
    pub meta: Option<ServerMeta>,
    /// If set, every call fails with this transport error
    pub error: Option<String>,
    /// Track calls for verification
    pub call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGitHubApi {
    /// Create a mock that answers 404/401 to everything
    pub fn new() -> Self {
        Self {
            user: None,
            user_status: 401,
            repository: None,
            vulnerability_alerts_status: 404,
            meta: None,
            error: None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `GET /user` with the given login and scopes
    pub fn with_user(mut self, login: &str, scopes: &[&str]) -> Self {
        self.user = Some(AuthenticatedUser {
            login: Some(login.to_string()),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Serve `GET /repos/...` with `repository`
    pub fn with_repository(mut self, repository: RepoMetadata) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Status for the vulnerability-alerts PUT
    pub fn with_vulnerability_alerts_status(mut self, status: u16) -> Self {
        self.vulnerability_alerts_status = status;
        self
    }

    /// Serve `GET /meta` reporting `version`
    pub fn with_installed_version(mut self, version: &str) -> Self {
        self.meta = Some(ServerMeta {
            installed_version: Some(version.to_string()),
        });
        self
    }

    /// Fail every call as if the request never completed
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Get a copy of the call log for assertions
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    fn log_call(&self, call: MockCall) -> Result<(), GitHubError> {
        self.call_log.lock().unwrap().push(call);
        match &self.error {
            Some(message) => Err(GitHubError::Request {
                url: "mock://".to_string(),
                source: std::io::Error::other(message.clone()).into(),
            }),
            None => Ok(()),
        }
    }

    fn not_found(path: &str) -> GitHubError {
        GitHubError::Status {
            url: format!("mock://{path}"),
            status: 404,
        }
    }
}

impl Default for MockGitHubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubApi for MockGitHubApi {
    fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, GitHubError> {
        self.log_call(MockCall::AuthenticatedUser {
            token: token.to_string(),
        })?;
        self.user.clone().ok_or_else(|| GitHubError::Status {
            url: "mock://user".to_string(),
            status: self.user_status,
        })
    }

    fn repository(&self, _token: &str, repo: &RepoSlug) -> Result<RepoMetadata, GitHubError> {
        self.log_call(MockCall::Repository(repo.clone()))?;
        self.repository
            .clone()
            .ok_or_else(|| Self::not_found(&format!("repos/{repo}")))
    }

    fn enable_vulnerability_alerts(
        &self,
        _token: &str,
        repo: &RepoSlug,
    ) -> Result<u16, GitHubError> {
        self.log_call(MockCall::EnableVulnerabilityAlerts(repo.clone()))?;
        Ok(self.vulnerability_alerts_status)
    }

    fn meta(&self, _token: &str) -> Result<ServerMeta, GitHubError> {
        self.log_call(MockCall::Meta)?;
        self.meta.clone().ok_or_else(|| Self::not_found("meta"))
    }
}

/// Mock `gh` runner keyed by the space-joined argument list
#[derive(Debug, Clone, Default)]
pub struct MockGhCli {
    /// Canned outputs, e.g. `"auth status"` → output
    pub responses: HashMap<String, GhOutput>,
    /// Simulate `gh` missing from PATH
    pub missing: bool,
    /// Track invocations for verification
    pub call_log: Arc<Mutex<Vec<String>>>,
}

impl MockGhCli {
    /// A `gh` that is installed and authenticated
    pub fn authenticated() -> Self {
        Self::default()
            .with_response("--version", GhOutput::ok("gh version 2.62.0 (2024-11-14)"))
            .with_response("auth status", GhOutput::ok("Logged in to github.com account octocat"))
    }

    /// A `gh` that is not installed
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// Register the output for `args`
    pub fn with_response(mut self, args: &str, output: GhOutput) -> Self {
        self.responses.insert(args.to_string(), output);
        self
    }

    /// Get a copy of the invocation log
    pub fn get_calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }
}

impl GhCli for MockGhCli {
    fn run(&self, args: &[&str]) -> Result<GhOutput, GhCliError> {
        let key = args.join(" ");
        self.call_log.lock().unwrap().push(key.clone());
        if self.missing {
            return Err(GhCliError::NotFound);
        }
        Ok(self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| GhOutput::failed(&format!("unknown command: gh {key}"))))
    }
}
