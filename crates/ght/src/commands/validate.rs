//! `--validate`

use super::context::RunContext;
use super::{mark, Outcome};
use anyhow::Result;
use ght_core::workflows::{validate_workflows, Severity};
use serde_json::json;

pub(crate) fn execute(ctx: &RunContext) -> Result<Outcome> {
    let validation = match validate_workflows(&ctx.root) {
        Ok(validation) => validation,
        Err(e) => {
            return Ok(Outcome {
                success: false,
                text: format!("❌ {e}"),
                json: json!({ "valid": false, "error": e.to_string() }),
            });
        }
    };

    let valid = validation.is_valid();
    let mut text = vec![format!(
        "🔍 Workflow Validation ({} files)",
        validation.files.len()
    )];
    for file in &validation.files {
        let clean = !validation
            .errors()
            .any(|finding| &finding.file == file);
        text.push(format!("  {} {file}", mark(clean)));
    }
    for finding in &validation.findings {
        let label = match finding.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        text.push(format!("  {label}: {}: {}", finding.file, finding.message));
    }
    text.push(if valid {
        "✅ All workflows valid".to_string()
    } else {
        "❌ Workflow validation failed".to_string()
    });

    let mut value = serde_json::to_value(&validation)?;
    value["valid"] = json!(valid);
    Ok(Outcome {
        success: valid,
        text: text.join("\n"),
        json: value,
    })
}
