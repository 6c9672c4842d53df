//! GitHub server type detection and feature capability lookup

use crate::config::{DEFAULT_API_URL, DEFAULT_SERVER_URL};
use crate::github::GitHubApi;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Flavour of GitHub the toolkit talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServerType {
    /// Public github.com
    #[serde(rename = "github-com")]
    GitHubCom,
    /// GitHub Enterprise Cloud (github.com API, custom server URL)
    #[serde(rename = "ghec")]
    EnterpriseCloud,
    /// Self-hosted GitHub Enterprise Server
    #[serde(rename = "ghes")]
    EnterpriseServer,
}

impl ServerType {
    /// Short identifier (`github-com`, `ghec`, `ghes`)
    pub fn as_str(self) -> &'static str {
        match self {
            ServerType::GitHubCom => "github-com",
            ServerType::EnterpriseCloud => "ghec",
            ServerType::EnterpriseServer => "ghes",
        }
    }

    /// Human-readable name
    pub fn description(self) -> &'static str {
        match self {
            ServerType::GitHubCom => "GitHub.com",
            ServerType::EnterpriseCloud => "GitHub Enterprise Cloud",
            ServerType::EnterpriseServer => "GitHub Enterprise Server",
        }
    }
}

/// Classify the server from the API and web base URLs
pub fn classify_server(api_url: &str, server_url: &str) -> ServerType {
    if normalize(api_url) != DEFAULT_API_URL {
        return ServerType::EnterpriseServer;
    }
    if normalize(server_url) == DEFAULT_SERVER_URL {
        ServerType::GitHubCom
    } else {
        ServerType::EnterpriseCloud
    }
}

fn normalize(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Enterprise Server `major.minor` release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    /// Create a version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` of a version string such as
    /// `3.11.4`. Returns `None` for anything without two numeric
    /// components (`unknown`, `3`, `three.one`).
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some(Self { major, minor })
    }
}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Version-gated security features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    AdvancedSecurity,
    SecretScanning,
    CodeScanning,
    DependencyReview,
}

impl Feature {
    /// Every feature, in display order
    pub const ALL: [Feature; 4] = [
        Feature::AdvancedSecurity,
        Feature::SecretScanning,
        Feature::CodeScanning,
        Feature::DependencyReview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Feature::AdvancedSecurity => "Advanced Security",
            Feature::SecretScanning => "Secret Scanning",
            Feature::CodeScanning => "Code Scanning",
            Feature::DependencyReview => "Dependency Review",
        }
    }
}

/// Minimum Enterprise Server release for each feature
const GHES_FEATURE_GATES: &[(Feature, ServerVersion)] = &[
    (Feature::AdvancedSecurity, ServerVersion::new(3, 0)),
    (Feature::SecretScanning, ServerVersion::new(3, 0)),
    (Feature::CodeScanning, ServerVersion::new(3, 0)),
    (Feature::DependencyReview, ServerVersion::new(3, 2)),
];

/// Which security features the server supports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub advanced_security: bool,
    pub secret_scanning: bool,
    pub code_scanning: bool,
    pub dependency_review: bool,
}

impl Capabilities {
    /// Every feature available
    pub const ALL: Capabilities = Capabilities {
        advanced_security: true,
        secret_scanning: true,
        code_scanning: true,
        dependency_review: true,
    };

    /// Whether `feature` is available
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::AdvancedSecurity => self.advanced_security,
            Feature::SecretScanning => self.secret_scanning,
            Feature::CodeScanning => self.code_scanning,
            Feature::DependencyReview => self.dependency_review,
        }
    }

    fn set(&mut self, feature: Feature) {
        match feature {
            Feature::AdvancedSecurity => self.advanced_security = true,
            Feature::SecretScanning => self.secret_scanning = true,
            Feature::CodeScanning => self.code_scanning = true,
            Feature::DependencyReview => self.dependency_review = true,
        }
    }
}

/// Look up feature support for a server type and (optional) version
///
/// github.com and Enterprise Cloud support everything. Enterprise Server
/// support is gated on release; an unknown version supports nothing.
pub fn capabilities_for(server_type: ServerType, version: Option<ServerVersion>) -> Capabilities {
    match server_type {
        ServerType::GitHubCom | ServerType::EnterpriseCloud => Capabilities::ALL,
        ServerType::EnterpriseServer => {
            let mut capabilities = Capabilities::default();
            if let Some(version) = version {
                for (feature, minimum) in GHES_FEATURE_GATES {
                    if version >= *minimum {
                        capabilities.set(*feature);
                    }
                }
            }
            capabilities
        }
    }
}

/// Everything learned about the target server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub server_type: ServerType,
    pub description: &'static str,
    pub api_url: String,
    pub server_url: String,
    /// Raw version string (`unknown` when not determined)
    pub version: String,
    pub capabilities: Capabilities,
    /// Why the version could not be determined, if it wasn't
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Detect the server type, its version (Enterprise Server only) and the
/// resulting capabilities.
///
/// The version comes from `GET /meta` and is only requested for Enterprise
/// Server when a token is available. Failures leave the version unknown.
pub fn detect_server(
    api: &dyn GitHubApi,
    api_url: &str,
    server_url: &str,
    token: Option<&str>,
) -> ServerInfo {
    let server_type = classify_server(api_url, server_url);
    let mut notes = Vec::new();
    let mut version = "unknown".to_string();

    if server_type == ServerType::EnterpriseServer {
        match token {
            Some(token) => match api.meta(token) {
                Ok(meta) => match meta.installed_version {
                    Some(installed) => version = installed,
                    None => notes.push("Server meta did not report installed_version".to_string()),
                },
                Err(e) => notes.push(format!("Could not fetch server meta: {e}")),
            },
            None => notes.push("No GitHub token available for version detection".to_string()),
        }
    }

    let parsed = ServerVersion::parse(&version);
    if server_type == ServerType::EnterpriseServer && parsed.is_none() && version != "unknown" {
        notes.push(format!("Could not parse version: {version}"));
    }
    debug!(server = server_type.as_str(), %version, "server detected");

    ServerInfo {
        server_type,
        description: server_type.description(),
        api_url: api_url.to_string(),
        server_url: server_url.to_string(),
        version,
        capabilities: capabilities_for(server_type, parsed),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::{MockCall, MockGitHubApi};

    fn ghes(version: &str) -> Capabilities {
        capabilities_for(ServerType::EnterpriseServer, ServerVersion::parse(version))
    }

    #[test]
    fn test_classify_server() {
        assert_eq!(
            classify_server("https://api.github.com", "https://github.com"),
            ServerType::GitHubCom
        );
        assert_eq!(
            classify_server("https://api.github.com/", "https://github.com/"),
            ServerType::GitHubCom
        );
        assert_eq!(
            classify_server("https://api.github.com", "https://acme.ghe.com"),
            ServerType::EnterpriseCloud
        );
        assert_eq!(
            classify_server("https://ghe.acme.internal/api/v3", "https://ghe.acme.internal"),
            ServerType::EnterpriseServer
        );
    }

    #[test]
    fn test_ghes_3_1_has_advanced_security_but_not_dependency_review() {
        let caps = ghes("3.1");
        assert!(caps.advanced_security);
        assert!(caps.secret_scanning);
        assert!(caps.code_scanning);
        assert!(!caps.dependency_review);
    }

    #[test]
    fn test_supports_follows_version_gates() {
        let caps = ghes("3.1");
        let supported: Vec<_> = Feature::ALL
            .into_iter()
            .filter(|f| caps.supports(*f))
            .map(Feature::label)
            .collect();
        assert_eq!(supported, vec!["Advanced Security", "Secret Scanning", "Code Scanning"]);
        assert!(Feature::ALL.into_iter().all(|f| Capabilities::ALL.supports(f)));
    }

    #[test]
    fn test_ghes_3_2_has_everything() {
        assert_eq!(ghes("3.2"), Capabilities::ALL);
        assert_eq!(ghes("3.12.1"), Capabilities::ALL);
    }

    #[test]
    fn test_ghes_unknown_or_old_version_has_nothing() {
        assert_eq!(ghes("unknown"), Capabilities::default());
        assert_eq!(ghes("3"), Capabilities::default());
        assert_eq!(ghes(""), Capabilities::default());
        assert_eq!(ghes("2.22"), Capabilities::default());
    }

    #[test]
    fn test_cloud_servers_have_everything() {
        assert_eq!(capabilities_for(ServerType::GitHubCom, None), Capabilities::ALL);
        assert_eq!(capabilities_for(ServerType::EnterpriseCloud, None), Capabilities::ALL);
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        assert!(ServerVersion::new(3, 10) > ServerVersion::new(3, 2));
        assert_eq!(ServerVersion::parse("3.9.0-rc1"), Some(ServerVersion::new(3, 9)));
        assert_eq!(ServerVersion::new(3, 11).to_string(), "3.11");
    }

    #[test]
    fn test_detect_github_com_skips_meta() {
        let api = MockGitHubApi::new().with_installed_version("3.9.0");
        let info = detect_server(&api, DEFAULT_API_URL, DEFAULT_SERVER_URL, Some("t0ken"));

        assert_eq!(info.server_type, ServerType::GitHubCom);
        assert_eq!(info.version, "unknown");
        assert_eq!(info.capabilities, Capabilities::ALL);
        assert!(api.get_calls().is_empty());
    }

    #[test]
    fn test_detect_ghes_reads_version_from_meta() {
        let api = MockGitHubApi::new().with_installed_version("3.1.7");
        let info = detect_server(
            &api,
            "https://ghe.acme.internal/api/v3",
            "https://ghe.acme.internal",
            Some("t0ken"),
        );

        assert_eq!(info.server_type, ServerType::EnterpriseServer);
        assert_eq!(info.version, "3.1.7");
        assert!(info.capabilities.advanced_security);
        assert!(!info.capabilities.dependency_review);
        assert_eq!(api.get_calls(), vec![MockCall::Meta]);
    }

    #[test]
    fn test_detect_ghes_without_token_has_no_capabilities() {
        let api = MockGitHubApi::new().with_installed_version("3.9.0");
        let info = detect_server(&api, "https://ghe.local/api/v3", "https://ghe.local", None);

        assert_eq!(info.version, "unknown");
        assert_eq!(info.capabilities, Capabilities::default());
        assert_eq!(info.notes.len(), 1);
        assert!(api.get_calls().is_empty());
    }

    #[test]
    fn test_detect_ghes_meta_failure_is_a_note() {
        let api = MockGitHubApi::new().with_error("timed out");
        let info = detect_server(&api, "https://ghe.local/api/v3", "https://ghe.local", Some("t"));

        assert_eq!(info.version, "unknown");
        assert!(info.notes[0].contains("timed out"));
    }
}
