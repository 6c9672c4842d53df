//! GitHub REST API client

use super::error::GitHubError;
use super::types::{AuthenticatedUser, RepoMetadata, ServerMeta};
use crate::context::RepoSlug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// REST API version pinned on every request
pub const API_VERSION: &str = "2022-11-28";

const SCOPES_HEADER: &str = "x-oauth-scopes";

/// The GitHub REST operations the toolkit performs.
///
/// Implementations block the caller; there is no retry. Any response other
/// than 200 on a read is reported as [`GitHubError::Status`].
pub trait GitHubApi: std::fmt::Debug {
    /// `GET /user`, including the token's classic scopes
    fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, GitHubError>;

    /// `GET /repos/{owner}/{repo}`
    fn repository(&self, token: &str, repo: &RepoSlug) -> Result<RepoMetadata, GitHubError>;

    /// `PUT /repos/{owner}/{repo}/vulnerability-alerts`, returning the raw
    /// HTTP status so callers can tell "enabled" from "already enabled"
    fn enable_vulnerability_alerts(&self, token: &str, repo: &RepoSlug)
    -> Result<u16, GitHubError>;

    /// `GET /meta`
    fn meta(&self, token: &str) -> Result<ServerMeta, GitHubError>;
}

/// Blocking HTTP implementation of [`GitHubApi`]
#[derive(Debug, Clone)]
pub struct HttpGitHubApi {
    client: Client,
    api_url: String,
}

#[derive(Deserialize)]
struct UserBody {
    login: Option<String>,
}

impl HttpGitHubApi {
    /// Create a client for `api_url` with a per-request `timeout`
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ght/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitHubError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: Method, token: &str, path: &str) -> Result<(String, Response), GitHubError> {
        let url = self.url(path);
        debug!(%method, %url, "GitHub API request");

        let response = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .map_err(|source| GitHubError::Request {
                url: url.clone(),
                source: Box::new(source),
            })?;

        debug!(status = response.status().as_u16(), %url, "GitHub API response");
        Ok((url, response))
    }

    fn expect_ok(url: String, response: Response) -> Result<(String, Response), GitHubError> {
        if response.status() != StatusCode::OK {
            return Err(GitHubError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok((url, response))
    }

    fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, GitHubError> {
        let (url, response) = self.send(Method::GET, token, path)?;
        let (url, response) = Self::expect_ok(url, response)?;
        response
            .json::<T>()
            .map_err(|source| GitHubError::Decode { url, source })
    }
}

impl GitHubApi for HttpGitHubApi {
    fn authenticated_user(&self, token: &str) -> Result<AuthenticatedUser, GitHubError> {
        let (url, response) = self.send(Method::GET, token, "user")?;
        let (url, response) = Self::expect_ok(url, response)?;

        // Read the header before the body consumes the response
        let scopes = response
            .headers()
            .get(SCOPES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_scopes_header)
            .unwrap_or_default();

        let body: UserBody = response
            .json()
            .map_err(|source| GitHubError::Decode { url, source })?;

        Ok(AuthenticatedUser {
            login: body.login,
            scopes,
        })
    }

    fn repository(&self, token: &str, repo: &RepoSlug) -> Result<RepoMetadata, GitHubError> {
        self.get_json(token, &format!("repos/{}/{}", repo.owner, repo.name))
    }

    fn enable_vulnerability_alerts(
        &self,
        token: &str,
        repo: &RepoSlug,
    ) -> Result<u16, GitHubError> {
        let path = format!("repos/{}/{}/vulnerability-alerts", repo.owner, repo.name);
        let (_, response) = self.send(Method::PUT, token, &path)?;
        Ok(response.status().as_u16())
    }

    fn meta(&self, token: &str) -> Result<ServerMeta, GitHubError> {
        self.get_json(token, "meta")
    }
}

/// Split an `X-OAuth-Scopes` header value into scope names
pub fn parse_scopes_header(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scopes_header() {
        assert_eq!(
            parse_scopes_header("repo, admin:repo_hook,security_events"),
            vec!["repo", "admin:repo_hook", "security_events"]
        );
        assert!(parse_scopes_header("").is_empty());
        assert!(parse_scopes_header(" , ").is_empty());
    }

    #[test]
    fn test_url_joining_ignores_slashes() {
        let api = HttpGitHubApi::new("https://ghe.example.com/api/v3/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(api.url("/meta"), "https://ghe.example.com/api/v3/meta");
        assert_eq!(api.url("user"), "https://ghe.example.com/api/v3/user");
    }
}
