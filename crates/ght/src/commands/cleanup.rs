//! `--cleanup`

use super::context::RunContext;
use super::Outcome;
use anyhow::Result;
use ght_core::cleanup::cleanup_repository;

pub(crate) fn execute(ctx: &RunContext, dry_run: bool) -> Result<Outcome> {
    let outcome = cleanup_repository(&ctx.root, &ctx.config.cleanup, dry_run);

    let (remove_verb, move_verb) = if dry_run {
        ("Would remove", "Would move")
    } else {
        ("Removed", "Moved")
    };
    let docs_dir = &ctx.config.cleanup.docs_dir;

    let mut text = vec![if dry_run {
        "🧹 Repository Cleanup (dry run)".to_string()
    } else {
        "🧹 Repository Cleanup".to_string()
    }];
    for file in &outcome.removed {
        text.push(format!("  {remove_verb}: {file}"));
    }
    for file in &outcome.moved {
        text.push(format!("  {move_verb}: {file} -> {docs_dir}/{file}"));
    }
    for failure in &outcome.failed {
        text.push(format!("  ❌ {}: {}", failure.file, failure.error));
    }
    if outcome.removed.is_empty() && outcome.moved.is_empty() && outcome.failed.is_empty() {
        text.push("  Nothing to clean up".to_string());
    }

    Ok(Outcome {
        success: outcome.is_success(),
        text: text.join("\n"),
        json: serde_json::to_value(&outcome)?,
    })
}
