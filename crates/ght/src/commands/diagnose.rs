//! `--diagnose`

use super::context::RunContext;
use super::{mark, Outcome};
use anyhow::Result;
use ght_core::diagnose::{diagnose, solutions_for};
use ght_core::token::TokenStatus;
use serde_json::json;

pub(crate) fn execute(ctx: &RunContext) -> Result<Outcome> {
    let required = ctx.config.token.required_scopes.as_slice();
    let diagnosis = diagnose(&ctx.env, ctx.gh.as_ref(), ctx.api.as_ref(), required);
    let solutions = solutions_for(&diagnosis.issues, required);

    let mut text = vec![
        "🔧 Automation Diagnostics".to_string(),
        format!("Environment: {}", diagnosis.environment.label()),
    ];
    for check in &diagnosis.checks {
        match &check.detail {
            Some(detail) => text.push(format!("  {} {}: {detail}", mark(check.passed), check.name)),
            None => text.push(format!("  {} {}", mark(check.passed), check.name)),
        }
    }
    if let Some(token) = &diagnosis.token {
        if let Some(login) = &token.login {
            text.push(format!("  Token owner: {login}"));
        }
        if token.status == TokenStatus::MissingScopes {
            text.push(format!("  Missing scopes: {}", token.missing_scopes.join(", ")));
        }
    }

    if diagnosis.is_ready() {
        text.push("✅ Automation is ready".to_string());
    } else {
        text.push(String::new());
        text.push("Issues Found:".to_string());
        for (i, issue) in diagnosis.issues.iter().enumerate() {
            text.push(format!("  {}. {}", i + 1, issue.message));
        }
        for solution in &solutions {
            text.push(String::new());
            text.push(format!("{}:", solution.title));
            for step in &solution.steps {
                text.push(format!("  - {step}"));
            }
        }
    }

    let mut value = serde_json::to_value(&diagnosis)?;
    value["ready"] = json!(diagnosis.is_ready());
    value["solutions"] = serde_json::to_value(&solutions)?;
    Ok(Outcome {
        success: diagnosis.is_ready(),
        text: text.join("\n"),
        json: value,
    })
}
