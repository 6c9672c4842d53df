//! `--security-status` and `--enable-security`

use super::context::RunContext;
use super::{mark, Outcome};
use anyhow::Result;
use ght_core::security::{
    enable_vulnerability_alerts, fetch_security_status, AlertsOutcome, SecurityAssessment,
    SecurityStatus,
};
use serde_json::json;

pub(crate) fn status(ctx: &RunContext) -> Result<Outcome> {
    let repo = ctx.require_repository()?;
    let token = ctx.require_token()?;
    let status = fetch_security_status(ctx.api.as_ref(), token, repo)?;

    Ok(Outcome {
        success: status.assessment().is_acceptable(),
        text: render_status(&status).join("\n"),
        json: status_json(&status)?,
    })
}

pub(crate) fn enable(ctx: &RunContext) -> Result<Outcome> {
    let repo = ctx.require_repository()?;
    let token = ctx.require_token()?;

    let alerts = enable_vulnerability_alerts(ctx.api.as_ref(), token, repo);
    let mut text = vec![format!("🔐 Enabling security features for {repo}")];
    text.push(match &alerts {
        AlertsOutcome::Enabled => "  ✅ Vulnerability alerts enabled".to_string(),
        AlertsOutcome::AlreadyEnabled => "  ✅ Vulnerability alerts already enabled".to_string(),
        AlertsOutcome::Unavailable => {
            "  ⚠️  Vulnerability alerts not available for this repository".to_string()
        }
        AlertsOutcome::Failed { status } => {
            format!("  ❌ Failed to enable vulnerability alerts (HTTP {status})")
        }
        AlertsOutcome::Error { message } => {
            format!("  ❌ Failed to enable vulnerability alerts: {message}")
        }
    });
    text.push(String::new());

    let status = fetch_security_status(ctx.api.as_ref(), token, repo)?;
    text.extend(render_status(&status));

    Ok(Outcome {
        success: status.assessment().is_acceptable(),
        text: text.join("\n"),
        json: json!({
            "vulnerability_alerts": serde_json::to_value(&alerts)?,
            "status": status_json(&status)?,
        }),
    })
}

fn render_status(status: &SecurityStatus) -> Vec<String> {
    let mut text = vec![
        format!("🛡️  Security Status: {}", status.full_name),
        format!("Visibility: {}", status.visibility),
    ];
    for (name, enabled) in status.features() {
        text.push(format!("  {} {name}", mark(enabled)));
    }
    text.push(format!(
        "Issues: {}  Wiki: {}  Projects: {}",
        on_off(status.has_issues),
        on_off(status.has_wiki),
        on_off(status.has_projects)
    ));
    text.push(match status.assessment() {
        SecurityAssessment::AllEnabled => "✅ All security features enabled".to_string(),
        SecurityAssessment::CriticalOnly => {
            "✅ Critical security features enabled (secret scanning and push protection)"
                .to_string()
        }
        SecurityAssessment::NeedsAttention => {
            "⚠️  Some security features need attention".to_string()
        }
    });
    text
}

fn status_json(status: &SecurityStatus) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(status)?;
    value["assessment"] = serde_json::to_value(status.assessment())?;
    Ok(value)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
