//! Runner for the `gh` CLI

use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors launching `gh`
#[derive(Debug, Error)]
pub enum GhCliError {
    /// `gh` is not on PATH
    #[error("gh CLI not found. Install from https://cli.github.com/")]
    NotFound,

    /// `gh` exists but could not be executed
    #[error("Failed to execute gh: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured result of one `gh` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GhOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
}

impl GhOutput {
    /// A successful invocation printing `stdout`
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// A failed invocation printing `stderr`
    pub fn failed(stderr: &str) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Something that can run `gh` with arguments.
///
/// A non-zero exit is a normal [`GhOutput`], not an error; only failure to
/// launch the process is an error.
pub trait GhCli: std::fmt::Debug {
    /// Run `gh <args>` to completion
    fn run(&self, args: &[&str]) -> Result<GhOutput, GhCliError>;
}

/// Runs the real `gh` binary from PATH
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGhCli;

impl GhCli for SystemGhCli {
    fn run(&self, args: &[&str]) -> Result<GhOutput, GhCliError> {
        debug!(?args, "running gh");
        let output = Command::new("gh").args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GhCliError::NotFound
            } else {
                GhCliError::Io(e)
            }
        })?;

        // `gh auth status` historically reports on stderr, so keep both
        Ok(GhOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
