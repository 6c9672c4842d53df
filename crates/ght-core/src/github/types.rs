//! GitHub REST API response shapes
//!
//! Only the fields the toolkit reads are modelled; everything else in the
//! payload is ignored.

use serde::{Deserialize, Serialize};

/// `GET /user`, combined with the `X-OAuth-Scopes` response header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Login of the token owner
    pub login: Option<String>,
    /// Classic scopes granted to the token (empty for fine-grained tokens)
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_vulnerability_alerts: Option<bool>,
    /// Absent when the token lacks admin rights
    #[serde(default)]
    pub security_and_analysis: Option<SecurityAndAnalysis>,
}

/// `security_and_analysis` object of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAndAnalysis {
    #[serde(default)]
    pub advanced_security: Option<FeatureStatus>,
    #[serde(default)]
    pub secret_scanning: Option<FeatureStatus>,
    #[serde(default)]
    pub secret_scanning_push_protection: Option<FeatureStatus>,
}

/// `{ "status": "enabled" | "disabled" }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    #[serde(default)]
    pub status: Option<String>,
}

impl FeatureStatus {
    /// Build an entry with the given status string
    pub fn new(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
        }
    }

    /// Whether the status reads `enabled`
    pub fn is_enabled(&self) -> bool {
        self.status.as_deref() == Some("enabled")
    }
}

/// `GET /meta`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMeta {
    /// Present on Enterprise Server only
    #[serde(default)]
    pub installed_version: Option<String>,
}
