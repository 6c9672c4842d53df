//! Pull request template materialization
//!
//! Reads a YAML list of `{name, content}` entries and writes each one into
//! the pull request template directory, optionally stamping the date and
//! author into `{{DATE}}` / `{{AUTHOR}}` placeholders.

use crate::config::TemplatesConfig;
use crate::env::{self, EnvSnapshot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Sections every template is expected to contain
pub const REQUIRED_SECTIONS: &[&str] = &["Description", "Checklist"];

const DATE_PLACEHOLDER: &str = "{{DATE}}";
const AUTHOR_PLACEHOLDER: &str = "{{AUTHOR}}";

/// Errors materializing templates
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read templates from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse templates in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid template name '{0}': must be a plain file name")]
    InvalidName(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One entry of the templates file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Placeholder and overwrite behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    pub inject_date: bool,
    pub inject_author: bool,
    pub overwrite: bool,
    /// Substituted for `{{AUTHOR}}`
    pub author: String,
    /// Substituted for `{{DATE}}`
    pub date: NaiveDate,
}

impl TemplateOptions {
    /// Read the action inputs (`INPUT_INJECT_DATE`, `INPUT_INJECT_AUTHOR`,
    /// `INPUT_OVERWRITE`) and `GITHUB_ACTOR`
    pub fn from_env(env: &EnvSnapshot, today: NaiveDate) -> Self {
        Self {
            inject_date: env.flag(env::INPUT_INJECT_DATE),
            inject_author: env.flag(env::INPUT_INJECT_AUTHOR),
            overwrite: env.flag(env::INPUT_OVERWRITE),
            author: env.get(env::GITHUB_ACTOR).unwrap_or("unknown").to_string(),
            date: today,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateAction {
    Written,
    /// Target exists and overwrite is off
    Skipped,
}

/// What happened to one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateResult {
    pub name: String,
    pub path: PathBuf,
    pub action: TemplateAction,
    /// Entries of [`REQUIRED_SECTIONS`] absent from the content
    pub missing_sections: Vec<&'static str>,
}

/// Parse the templates file at `path`
pub fn load_templates(path: &Path) -> Result<Vec<TemplateSpec>, TemplateError> {
    let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| TemplateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply the enabled placeholder substitutions
pub fn render_template(content: &str, options: &TemplateOptions) -> String {
    let mut rendered = content.to_string();
    if options.inject_date {
        rendered = rendered.replace(DATE_PLACEHOLDER, &options.date.format("%Y-%m-%d").to_string());
    }
    if options.inject_author {
        rendered = rendered.replace(AUTHOR_PLACEHOLDER, &options.author);
    }
    rendered
}

/// Load `config.source` and write every template into `config.target_dir`,
/// both relative to `root`.
///
/// All names are checked before anything is written; a name with a path
/// separator (or `.`/`..`) fails the whole run.
pub fn materialize_templates(
    root: &Path,
    config: &TemplatesConfig,
    options: &TemplateOptions,
) -> Result<Vec<TemplateResult>, TemplateError> {
    let templates = load_templates(&root.join(&config.source))?;
    if let Some(bad) = templates.iter().find(|t| !is_plain_name(&t.name)) {
        return Err(TemplateError::InvalidName(bad.name.clone()));
    }

    let target_dir = root.join(&config.target_dir);
    fs::create_dir_all(&target_dir).map_err(|source| TemplateError::Write {
        path: target_dir.clone(),
        source,
    })?;

    let mut results = Vec::with_capacity(templates.len());
    for template in templates {
        let path = target_dir.join(&template.name);
        let content = render_template(&template.content, options);
        let missing_sections: Vec<&'static str> = REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|section| !content.contains(section))
            .collect();

        if path.exists() && !options.overwrite {
            info!(path = %path.display(), "template exists, skipping (overwrite disabled)");
            results.push(TemplateResult {
                name: template.name,
                path,
                action: TemplateAction::Skipped,
                missing_sections,
            });
            continue;
        }

        if !missing_sections.is_empty() {
            warn!(template = %template.name, missing = ?missing_sections, "template missing required sections");
        }
        fs::write(&path, &content).map_err(|source| TemplateError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "template written");

        results.push(TemplateResult {
            name: template.name,
            path,
            action: TemplateAction::Written,
            missing_sections,
        });
    }

    Ok(results)
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TemplateOptions {
        TemplateOptions {
            inject_date: true,
            inject_author: true,
            overwrite: false,
            author: "octocat".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        }
    }

    #[test]
    fn test_render_substitutes_enabled_placeholders() {
        let content = "Date: {{DATE}} by {{AUTHOR}}";
        assert_eq!(render_template(content, &options()), "Date: 2025-01-02 by octocat");

        let disabled = TemplateOptions {
            inject_date: false,
            ..options()
        };
        assert_eq!(render_template(content, &disabled), "Date: {{DATE}} by octocat");
    }

    #[test]
    fn test_options_from_env() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let env = EnvSnapshot::from_pairs([
            (env::INPUT_INJECT_DATE, "TRUE"),
            (env::INPUT_INJECT_AUTHOR, "yes"),
        ]);
        let opts = TemplateOptions::from_env(&env, today);
        assert!(opts.inject_date);
        assert!(!opts.inject_author);
        assert!(!opts.overwrite);
        assert_eq!(opts.author, "unknown");
    }

    #[test]
    fn test_plain_names() {
        assert!(is_plain_name("feature.md"));
        assert!(!is_plain_name("../escape.md"));
        assert!(!is_plain_name("nested/bug.md"));
        assert!(!is_plain_name("..\\win.md"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name(".."));
    }
}
