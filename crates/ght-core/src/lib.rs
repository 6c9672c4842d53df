//! Core library for gh-toolkit (ght)
//!
//! Readiness checks and static analysis for GitHub repository automation:
//! token validation, server capability detection, PAT permission analysis,
//! repository security reporting, and the Markdown reports built from them.
//!
//! Everything here returns structured results; printing is left to the
//! `ght` binary.

pub mod cleanup;
pub mod config;
pub mod context;
pub mod diagnose;
pub mod env;
pub mod github;
pub mod home;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod security;
pub mod server;
pub mod templates;
pub mod token;
pub mod workflows;

pub use context::RepoSlug;
pub use env::EnvSnapshot;
pub use github::{GhCli, GitHubApi, GitHubError};
