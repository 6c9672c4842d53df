//! Configuration types

use serde::{Deserialize, Serialize};

/// Public github.com REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Public github.com web base URL
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub endpoints and target repository
    #[serde(default)]
    pub github: GitHubConfig,
    /// Token validation
    #[serde(default)]
    pub token: TokenConfig,
    /// Permission analysis scan
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Report output files
    #[serde(default)]
    pub reports: ReportConfig,
    /// Repository cleanup lists
    #[serde(default)]
    pub cleanup: CleanupConfig,
    /// Pull request template materialization
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// GitHub endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,
    /// Web server base URL
    pub server_url: String,
    /// Target repository as `owner/name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            repository: None,
            timeout_secs: 10,
        }
    }
}

/// Token validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Classic PAT scopes the admin token must carry
    pub required_scopes: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            required_scopes: ["repo", "admin:repo_hook", "security_events", "read:org", "workflow"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Permission analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directories (relative to the repository root) to scan
    pub paths: Vec<String>,
    /// File extensions to read, without the leading dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            paths: to_strings(&[".github/workflows", ".github/actions", ".github/scripts", "."]),
            extensions: to_strings(&["yml", "yaml", "py", "js", "sh", "json"]),
            exclude_dirs: to_strings(&[".git", "target", "node_modules"]),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// PAT permission analysis report
    pub permissions_file: String,
    /// Setup guide report
    pub setup_guide_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            permissions_file: "PAT_PERMISSIONS_ANALYSIS.md".to_string(),
            setup_guide_file: "AUTOMATION_SETUP_GUIDE.md".to_string(),
        }
    }
}

/// Cleanup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Files removed from the repository root
    pub remove: Vec<String>,
    /// Files moved into `docs_dir`
    pub move_to_docs: Vec<String>,
    /// Documentation directory
    pub docs_dir: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove: to_strings(&[
                // Sample application
                "app.py",
                "index.js",
                "package.json",
                "requirements.txt",
                // Superseded notes
                "COPILOT_INSPECTION.md",
                "COPILOT_INSTRUCTION.md",
                "MAIN_AUTOMATION_FIX.md",
                "PAT_SETUP_COMPLETE.md",
                "SETUP_INSTRUCTIONS.md",
                // Standalone scripts replaced by ght
                "diagnose-automation.py",
                "pat-permissions-analysis.py",
                "enable_security_features.py",
                "security_check.py",
            ]),
            move_to_docs: to_strings(&["GITHUB_AUTOMATION_GUIDE.md", "PAT_PERMISSIONS_ANALYSIS.md"]),
            docs_dir: "docs".to_string(),
        }
    }
}

/// PR template configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// YAML file listing the templates
    pub source: String,
    /// Output directory for rendered templates
    pub target_dir: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            source: "templates.yaml".to_string(),
            target_dir: ".github/PULL_REQUEST_TEMPLATE".to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
