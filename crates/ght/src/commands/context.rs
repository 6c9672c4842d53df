//! Shared state for one `ght` invocation

use anyhow::{Context, Result};
use ght_core::config::{resolve_config, Config, ConfigOverrides};
use ght_core::context::resolve_repository;
use ght_core::github::{HttpGitHubApi, SystemGhCli};
use ght_core::home::home_dir;
use ght_core::{EnvSnapshot, GhCli, GitHubApi, RepoSlug};
use std::path::PathBuf;
use std::time::Duration;

/// Resolved configuration, environment and clients
pub(crate) struct RunContext {
    /// Repository root every relative path is resolved against
    pub root: PathBuf,
    pub env: EnvSnapshot,
    pub config: Config,
    pub repository: Option<RepoSlug>,
    pub api: Box<dyn GitHubApi>,
    pub gh: Box<dyn GhCli>,
    pub json: bool,
}

impl RunContext {
    pub fn resolve(
        root: Option<PathBuf>,
        config_path: Option<PathBuf>,
        repo: Option<String>,
        json: bool,
    ) -> Result<Self> {
        let env = EnvSnapshot::capture();
        let root = match root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let home = home_dir(&env).context("Could not determine home directory")?;

        let overrides = ConfigOverrides {
            repository: repo,
            config_path,
        };
        let config = resolve_config(&overrides, &root, &home, &env)?;

        let repository = resolve_repository(
            config.github.repository.as_deref(),
            &root,
            &config.github.server_url,
        )?;

        let api = HttpGitHubApi::new(
            &config.github.api_url,
            Duration::from_secs(config.github.timeout_secs),
        )?;

        Ok(Self {
            root,
            env,
            config,
            repository,
            api: Box::new(api),
            gh: Box::new(SystemGhCli),
            json,
        })
    }

    /// Target repository, or an error naming how to set one
    pub fn require_repository(&self) -> Result<&RepoSlug> {
        self.repository.as_ref().context(
            "No repository configured: pass --repo owner/name, set GITHUB_REPOSITORY, \
             or run inside a clone with a GitHub origin remote",
        )
    }

    /// Admin token, falling back to GITHUB_TOKEN
    pub fn require_token(&self) -> Result<&str> {
        self.env
            .any_token()
            .context("No token available: set GH_ADMIN_TOKEN or GITHUB_TOKEN")
    }
}
