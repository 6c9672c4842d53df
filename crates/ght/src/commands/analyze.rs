//! `--analyze`

use super::context::RunContext;
use super::Outcome;
use anyhow::Result;
use ght_core::report::{render_permissions_report, write_report, PERMISSIONS_SECTIONS};
use ght_core::scanner::analyze_repository;
use serde_json::json;

pub(crate) fn execute(ctx: &RunContext) -> Result<Outcome> {
    let analysis = analyze_repository(&ctx.root, &ctx.config.analysis);
    let report = render_permissions_report(&analysis, ctx.repository.as_ref());
    let path = ctx.root.join(&ctx.config.reports.permissions_file);
    write_report(&path, &report, PERMISSIONS_SECTIONS)?;

    let join = |items: &std::collections::BTreeSet<String>| {
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    };
    let text = [
        "🔍 PAT Permission Analysis".to_string(),
        format!("Files scanned: {}", analysis.files_scanned),
        format!("Files with GitHub operations: {}", analysis.files.len()),
        format!("Classic scopes: {}", join(&analysis.classic_scopes)),
        format!("Fine-grained permissions: {}", analysis.fine_grained.len()),
        format!("API endpoints: {}", analysis.api_endpoints.len()),
        format!("✅ Report written to {}", path.display()),
    ]
    .join("\n");

    Ok(Outcome {
        success: true,
        text,
        json: json!({
            "report": path.display().to_string(),
            "analysis": serde_json::to_value(&analysis)?,
        }),
    })
}
