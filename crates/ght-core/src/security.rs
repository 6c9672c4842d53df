//! Repository security feature status and toggles

use crate::context::RepoSlug;
use crate::github::{FeatureStatus, GitHubApi, GitHubError, RepoMetadata};
use serde::Serialize;
use tracing::{debug, warn};

/// Security settings of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityStatus {
    pub full_name: String,
    /// `public`, `private` or `internal`
    pub visibility: String,
    pub public: bool,
    /// Always true for public repositories
    pub advanced_security: bool,
    pub secret_scanning: bool,
    pub push_protection: bool,
    pub vulnerability_alerts: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub has_projects: bool,
}

/// Overall verdict on a repository's security configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityAssessment {
    /// Every applicable feature is on
    AllEnabled,
    /// Public repository with secret scanning and push protection on but
    /// vulnerability alerts off. Acceptable.
    CriticalOnly,
    /// At least one required feature is off
    NeedsAttention,
}

impl SecurityAssessment {
    /// Whether the configuration is acceptable
    pub fn is_acceptable(self) -> bool {
        !matches!(self, SecurityAssessment::NeedsAttention)
    }
}

impl SecurityStatus {
    /// Derive the status from `GET /repos/{owner}/{repo}`
    pub fn from_metadata(metadata: &RepoMetadata) -> Self {
        let public = !metadata.private;
        let security = metadata.security_and_analysis.clone().unwrap_or_default();
        let enabled = |feature: &Option<FeatureStatus>| {
            feature.as_ref().is_some_and(FeatureStatus::is_enabled)
        };

        let visibility = metadata.visibility.clone().unwrap_or_else(|| {
            if public { "public" } else { "private" }.to_string()
        });

        Self {
            full_name: metadata.full_name.clone(),
            visibility,
            public,
            advanced_security: public || enabled(&security.advanced_security),
            secret_scanning: enabled(&security.secret_scanning),
            push_protection: enabled(&security.secret_scanning_push_protection),
            vulnerability_alerts: metadata.has_vulnerability_alerts.unwrap_or(false),
            has_issues: metadata.has_issues,
            has_wiki: metadata.has_wiki,
            has_projects: metadata.has_projects,
        }
    }

    /// Public repositories need secret scanning and push protection.
    /// Private repositories need all four features.
    pub fn assessment(&self) -> SecurityAssessment {
        let critical = self.secret_scanning && self.push_protection;
        if self.public {
            match (critical, self.vulnerability_alerts) {
                (true, true) => SecurityAssessment::AllEnabled,
                (true, false) => SecurityAssessment::CriticalOnly,
                (false, _) => SecurityAssessment::NeedsAttention,
            }
        } else if critical && self.advanced_security && self.vulnerability_alerts {
            SecurityAssessment::AllEnabled
        } else {
            SecurityAssessment::NeedsAttention
        }
    }

    /// Feature name and enabled flag, in display order
    pub fn features(&self) -> [(&'static str, bool); 4] {
        [
            ("Advanced Security", self.advanced_security),
            ("Secret Scanning", self.secret_scanning),
            ("Push Protection", self.push_protection),
            ("Vulnerability Alerts", self.vulnerability_alerts),
        ]
    }
}

/// Fetch and derive the security status of `repo`
pub fn fetch_security_status(
    api: &dyn GitHubApi,
    token: &str,
    repo: &RepoSlug,
) -> Result<SecurityStatus, GitHubError> {
    let metadata = api.repository(token, repo)?;
    let status = SecurityStatus::from_metadata(&metadata);
    debug!(repo = %repo, assessment = ?status.assessment(), "security status fetched");
    Ok(status)
}

/// Result of asking GitHub to enable Dependabot vulnerability alerts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AlertsOutcome {
    /// 204: turned on
    Enabled,
    /// 200: was already on
    AlreadyEnabled,
    /// 404: not available for this repository
    Unavailable,
    /// Any other status
    Failed { status: u16 },
    /// The request never completed
    Error { message: String },
}

impl AlertsOutcome {
    /// Whether alerts are on after the request
    pub fn is_enabled(&self) -> bool {
        matches!(self, AlertsOutcome::Enabled | AlertsOutcome::AlreadyEnabled)
    }
}

/// `PUT /repos/{owner}/{repo}/vulnerability-alerts`. Never fails; every
/// problem is folded into the outcome.
pub fn enable_vulnerability_alerts(
    api: &dyn GitHubApi,
    token: &str,
    repo: &RepoSlug,
) -> AlertsOutcome {
    let outcome = match api.enable_vulnerability_alerts(token, repo) {
        Ok(204) => AlertsOutcome::Enabled,
        Ok(200) => AlertsOutcome::AlreadyEnabled,
        Ok(404) => AlertsOutcome::Unavailable,
        Ok(status) => AlertsOutcome::Failed { status },
        Err(e) => AlertsOutcome::Error {
            message: e.to_string(),
        },
    };
    if !outcome.is_enabled() {
        warn!(repo = %repo, ?outcome, "vulnerability alerts not enabled");
    }
    outcome
}
