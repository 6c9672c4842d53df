//! Canonical home directory resolution
//!
//! Every lookup of the user's home directory goes through [`home_dir`] so
//! that `GHT_HOME` is honoured everywhere. Integration tests point
//! `GHT_HOME` at a temporary directory to isolate global config.
//!
//! # Precedence
//!
//! 1. `GHT_HOME` (if set and not blank)
//! 2. `dirs::home_dir()` platform default

use crate::env::{EnvSnapshot, GHT_HOME};
use std::path::PathBuf;

/// Home directory for config discovery, `None` when it cannot be determined
pub fn home_dir(env: &EnvSnapshot) -> Option<PathBuf> {
    if let Some(home) = env.get(GHT_HOME) {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
}
