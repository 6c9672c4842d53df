//! GitHub access: REST API client and `gh` CLI runner
//!
//! Both are traits so checks can run against canned responses in tests.

mod cli;
mod client;
mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
mod types;

pub use cli::{GhCli, GhCliError, GhOutput, SystemGhCli};
pub use client::{parse_scopes_header, GitHubApi, HttpGitHubApi, API_VERSION};
pub use error::GitHubError;
pub use types::{AuthenticatedUser, FeatureStatus, RepoMetadata, SecurityAndAnalysis, ServerMeta};
