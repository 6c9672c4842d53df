//! `--detect-server`

use super::context::RunContext;
use super::{mark, Outcome};
use anyhow::Result;
use ght_core::server::{detect_server, Feature};

pub(crate) fn execute(ctx: &RunContext) -> Result<Outcome> {
    let github = &ctx.config.github;
    let info = detect_server(
        ctx.api.as_ref(),
        &github.api_url,
        &github.server_url,
        ctx.env.any_token(),
    );

    let caps = &info.capabilities;
    let mut text = vec![
        "🔍 GitHub Server Detection".to_string(),
        format!("Server Type: {} ({})", info.description, info.server_type.as_str()),
        format!("API URL: {}", info.api_url),
        format!("Server URL: {}", info.server_url),
        format!("Version: {}", info.version),
        "Capabilities:".to_string(),
    ];
    for feature in Feature::ALL {
        text.push(format!("  {} {}", mark(caps.supports(feature)), feature.label()));
    }
    for note in &info.notes {
        text.push(format!("⚠️  {note}"));
    }

    // Detection itself cannot fail; an unknown version only limits features
    Ok(Outcome {
        success: true,
        text: text.join("\n"),
        json: serde_json::to_value(&info)?,
    })
}
