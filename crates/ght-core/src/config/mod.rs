//! Configuration resolution
//!
//! Resolves configuration from multiple sources with priority:
//! 1. Command-line flags (passed as parameters)
//! 2. Environment variables
//! 3. Repo-local config (.ght.toml) or an explicit `--config` file
//! 4. Global config (~/.config/ght/config.toml)
//! 5. Defaults

mod discovery;
mod types;

pub use discovery::{resolve_config, ConfigError, ConfigOverrides, REPO_CONFIG_FILE};
pub use types::{
    AnalysisConfig, CleanupConfig, Config, GitHubConfig, ReportConfig, TemplatesConfig,
    TokenConfig, DEFAULT_API_URL, DEFAULT_SERVER_URL,
};
