//! Process environment snapshot
//!
//! Every environment variable the toolkit consults is captured once at
//! startup. Checks then read from the snapshot, which keeps them testable
//! without mutating the process environment.

use std::collections::BTreeMap;

/// Personal access token with admin rights over the repository
pub const GH_ADMIN_TOKEN: &str = "GH_ADMIN_TOKEN";
/// Token injected by GitHub Actions
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Set to `true` by the GitHub Actions runner
pub const GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";
/// `owner/repo` of the workflow run
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Login that triggered the workflow run
pub const GITHUB_ACTOR: &str = "GITHUB_ACTOR";
/// REST API base URL
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
/// Web server base URL
pub const GITHUB_SERVER_URL: &str = "GITHUB_SERVER_URL";
/// PR template action input: replace `{{DATE}}`
pub const INPUT_INJECT_DATE: &str = "INPUT_INJECT_DATE";
/// PR template action input: replace `{{AUTHOR}}`
pub const INPUT_INJECT_AUTHOR: &str = "INPUT_INJECT_AUTHOR";
/// PR template action input: overwrite existing templates
pub const INPUT_OVERWRITE: &str = "INPUT_OVERWRITE";
/// Home directory override used for config discovery
pub const GHT_HOME: &str = "GHT_HOME";

const KNOWN_VARS: &[&str] = &[
    GH_ADMIN_TOKEN,
    GITHUB_TOKEN,
    GITHUB_ACTIONS,
    GITHUB_REPOSITORY,
    GITHUB_ACTOR,
    GITHUB_API_URL,
    GITHUB_SERVER_URL,
    INPUT_INJECT_DATE,
    INPUT_INJECT_AUTHOR,
    INPUT_OVERWRITE,
    GHT_HOME,
];

/// Immutable view of the toolkit-relevant environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the known variables from the current process.
    pub fn capture() -> Self {
        Self::from_pairs(
            KNOWN_VARS
                .iter()
                .filter_map(|name| std::env::var(name).ok().map(|value| (*name, value))),
        )
    }

    /// Build a snapshot from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `name`; empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether `name` is set to a non-empty value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Boolean action input: only a case-insensitive `true` counts.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Whether the process runs inside a GitHub Actions job.
    pub fn in_github_actions(&self) -> bool {
        self.is_set(GITHUB_ACTIONS)
    }

    /// The admin PAT, if configured.
    pub fn admin_token(&self) -> Option<&str> {
        self.get(GH_ADMIN_TOKEN)
    }

    /// Best available token: the admin PAT, else the Actions token.
    pub fn any_token(&self) -> Option<&str> {
        self.admin_token().or_else(|| self.get(GITHUB_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let env = EnvSnapshot::from_pairs([(GH_ADMIN_TOKEN, "")]);
        assert!(env.admin_token().is_none());
        assert!(!env.is_set(GH_ADMIN_TOKEN));
    }

    #[test]
    fn any_token_prefers_admin_token() {
        let env = EnvSnapshot::from_pairs([(GH_ADMIN_TOKEN, "admin"), (GITHUB_TOKEN, "actions")]);
        assert_eq!(env.any_token(), Some("admin"));

        let env = EnvSnapshot::from_pairs([(GITHUB_TOKEN, "actions")]);
        assert_eq!(env.any_token(), Some("actions"));
    }

    #[test]
    fn flag_accepts_only_true() {
        let env = EnvSnapshot::from_pairs([
            (INPUT_INJECT_DATE, "TRUE"),
            (INPUT_INJECT_AUTHOR, "yes"),
        ]);
        assert!(env.flag(INPUT_INJECT_DATE));
        assert!(!env.flag(INPUT_INJECT_AUTHOR));
        assert!(!env.flag(INPUT_OVERWRITE));
    }
}
