//! Repository context detection
//!
//! All detection is local (no network calls).

mod repo;

pub use repo::{origin_remote_url, server_host, RepoSlug, RepoSlugError};

use std::path::Path;

/// Resolve the target repository
///
/// An explicitly configured `owner/name` (from `--repo`, `GITHUB_REPOSITORY`
/// or config) wins and must be well-formed. Otherwise the `origin` remote of
/// the repository at `root` is used when it points at the configured server.
pub fn resolve_repository(
    configured: Option<&str>,
    root: &Path,
    server_url: &str,
) -> Result<Option<RepoSlug>, RepoSlugError> {
    if let Some(value) = configured {
        return RepoSlug::parse(value).map(Some);
    }

    let Some(host) = server_host(server_url) else {
        return Ok(None);
    };

    Ok(origin_remote_url(root).and_then(|url| RepoSlug::from_remote_url(&url, &host)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configured_repository_wins() {
        let temp_dir = TempDir::new().unwrap();
        let slug = resolve_repository(Some("acme/widgets"), temp_dir.path(), "https://github.com")
            .unwrap();
        assert_eq!(slug, Some(RepoSlug::new("acme", "widgets")));
    }

    #[test]
    fn test_malformed_configured_repository_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(resolve_repository(Some("widgets"), temp_dir.path(), "https://github.com").is_err());
    }

    #[test]
    fn test_falls_back_to_origin_remote() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join(".git")).unwrap();
        std::fs::write(
            temp_dir.path().join(".git/config"),
            "[remote \"origin\"]\n\turl = git@github.com:acme/widgets.git\n",
        )
        .unwrap();

        let slug = resolve_repository(None, temp_dir.path(), "https://github.com").unwrap();
        assert_eq!(slug, Some(RepoSlug::new("acme", "widgets")));
    }

    #[test]
    fn test_no_repository_available() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_repository(None, temp_dir.path(), "https://github.com").unwrap(),
            None
        );
    }
}
