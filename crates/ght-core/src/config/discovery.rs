//! Configuration discovery and resolution

use super::types::Config;
use crate::env::{EnvSnapshot, GITHUB_API_URL, GITHUB_REPOSITORY, GITHUB_SERVER_URL};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Repo-local config file name
pub const REPO_CONFIG_FILE: &str = ".ght.toml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("TOML parsing error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Merged tables did not form a valid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] toml::de::Error),
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Override target repository (`owner/name`)
    pub repository: Option<String>,
    /// Explicit config file, replacing repo-local discovery
    pub config_path: Option<PathBuf>,
}

/// Resolve configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables
/// 3. Repo-local config (.ght.toml in current dir or up to git root),
///    or the explicit `--config` file
/// 4. Global config (~/.config/ght/config.toml)
/// 5. Defaults
///
/// Files are merged key by key, so a repo-local file only needs the keys
/// it changes. An unparseable discovered file is logged and skipped; an
/// explicit `--config` file must load.
pub fn resolve_config(
    overrides: &ConfigOverrides,
    current_dir: &Path,
    home_dir: &Path,
    env: &EnvSnapshot,
) -> Result<Config, ConfigError> {
    let mut merged = toml::Table::new();

    // 4. Global config
    let global_config_path = home_dir.join(".config/ght/config.toml");
    if global_config_path.exists() {
        if let Some(table) = load_discovered(&global_config_path, "global") {
            merge_tables(&mut merged, table);
        }
    }

    // 3. Explicit or repo-local config
    if let Some(path) = &overrides.config_path {
        merge_tables(&mut merged, load_table(path)?);
    } else if let Some(repo_config) = find_repo_local_config(current_dir) {
        if let Some(table) = load_discovered(&repo_config, "repo") {
            merge_tables(&mut merged, table);
        }
    }

    let mut config: Config = toml::Value::Table(merged).try_into()?;

    // 2. Environment
    apply_env_overrides(&mut config, env);

    // 1. Command line
    apply_cli_overrides(&mut config, overrides);

    debug!(api_url = %config.github.api_url, "configuration resolved");
    Ok(config)
}

/// Find repo-local config file
///
/// Searches current directory and parent directories up to git root
fn find_repo_local_config(current_dir: &Path) -> Option<PathBuf> {
    let mut dir = current_dir;

    loop {
        let config_path = dir.join(REPO_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if dir.join(".git").exists() {
            break;
        }

        dir = dir.parent()?;
    }

    None
}

fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    contents.parse::<toml::Table>().map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a discovered config file, or `None` if it does not parse or does
/// not fit the [`Config`] shape on its own
fn load_discovered(path: &Path, kind: &str) -> Option<toml::Table> {
    let table = match load_table(path) {
        Ok(table) => table,
        Err(e) => {
            warn!("Ignoring {kind} config: {e}");
            return None;
        }
    };
    if let Err(e) = toml::Value::Table(table.clone()).try_into::<Config>() {
        warn!("Ignoring {kind} config {}: {e}", path.display());
        return None;
    }
    Some(table)
}

/// Deep-merge `overlay` into `base`; overlay wins on conflicting leaves.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn apply_env_overrides(config: &mut Config, env: &EnvSnapshot) {
    if let Some(api_url) = env.get(GITHUB_API_URL) {
        config.github.api_url = api_url.to_string();
    }

    if let Some(server_url) = env.get(GITHUB_SERVER_URL) {
        config.github.server_url = server_url.to_string();
    }

    if let Some(repository) = env.get(GITHUB_REPOSITORY) {
        config.github.repository = Some(repository.to_string());
    }
}

fn apply_cli_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(ref repository) = overrides.repository {
        config.github.repository = Some(repository.clone());
    }
}
