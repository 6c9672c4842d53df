//! `--pr-templates`

use super::context::RunContext;
use super::Outcome;
use anyhow::Result;
use chrono::Utc;
use ght_core::templates::{materialize_templates, TemplateAction, TemplateOptions};

pub(crate) fn execute(ctx: &RunContext) -> Result<Outcome> {
    let options = TemplateOptions::from_env(&ctx.env, Utc::now().date_naive());
    let results = materialize_templates(&ctx.root, &ctx.config.templates, &options)?;

    let mut text = vec![format!("📝 Pull request templates ({})", results.len())];
    for result in &results {
        let action = match result.action {
            TemplateAction::Written => "✅ wrote",
            TemplateAction::Skipped => "⏭️  skipped (exists)",
        };
        text.push(format!("  {action} {}", result.path.display()));
        if !result.missing_sections.is_empty() {
            text.push(format!(
                "     ⚠️  missing sections: {}",
                result.missing_sections.join(", ")
            ));
        }
    }

    Ok(Outcome {
        success: true,
        text: text.join("\n"),
        json: serde_json::to_value(&results)?,
    })
}
