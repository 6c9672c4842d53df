//! Repository identification: `owner/name` slugs and GitHub remote detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Invalid `owner/name` string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid repository '{0}': expected owner/name")]
pub struct RepoSlugError(pub String);

/// A GitHub repository identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Owning user or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    /// Create a slug from its parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`
    pub fn parse(value: &str) -> Result<Self, RepoSlugError> {
        let trimmed = value.trim().trim_end_matches(".git");
        match trimmed.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if valid_segment(owner) && valid_segment(name) => {
                Ok(Self::new(*owner, *name))
            }
            _ => Err(RepoSlugError(value.to_string())),
        }
    }

    /// Detect a GitHub repository from a git remote URL
    ///
    /// Supports SSH (`git@host:owner/repo.git`) and HTTPS
    /// (`https://host/owner/repo.git`) forms. `github_host` is the web host
    /// of the configured server (github.com or an Enterprise Server host);
    /// remotes on other hosts yield `None`.
    pub fn from_remote_url(url: &str, github_host: &str) -> Option<Self> {
        let (host, path) = Self::split_ssh_url(url).or_else(|| Self::split_https_url(url))?;
        if !host.eq_ignore_ascii_case(github_host) {
            return None;
        }
        Self::parse(path.trim_start_matches('/')).ok()
    }

    /// Parse SSH-style URLs: git@host:path/to/repo.git
    fn split_ssh_url(url: &str) -> Option<(String, String)> {
        if url.contains("://") {
            return None;
        }
        let (_, rest) = url.split_once('@')?;
        let (host, path) = rest.split_once(':')?;
        Some((host.to_string(), path.to_string()))
    }

    /// Parse HTTPS URLs (also ssh:// URLs): scheme://host/path/to/repo.git
    fn split_https_url(url: &str) -> Option<(String, String)> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        Some((host, parsed.path().to_string()))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Read the `origin` remote URL from `<root>/.git/config`
///
/// This does not shell out to git; it reads the config file directly and
/// returns `None` when the file or the remote is absent.
pub fn origin_remote_url(root: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(root.join(".git/config")).ok()?;
    let mut in_origin = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line == "[remote \"origin\"]";
            continue;
        }
        if in_origin
            && let Some((key, value)) = line.split_once('=')
            && key.trim() == "url"
        {
            return Some(value.trim().to_string());
        }
    }

    None
}

/// Host part of a server URL (`https://github.com` → `github.com`)
pub fn server_host(server_url: &str) -> Option<String> {
    url::Url::parse(server_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
