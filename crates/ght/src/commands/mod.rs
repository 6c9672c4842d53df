//! CLI flag parsing and operation dispatch

use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value};
use std::path::PathBuf;

mod analyze;
mod cleanup;
mod context;
mod diagnose;
mod security;
mod server;
mod setup_report;
mod templates;
mod validate;

use context::RunContext;

/// ght - GitHub automation readiness toolkit
#[derive(Parser, Debug)]
#[command(
    name = "ght",
    version,
    about = "GitHub automation readiness toolkit",
    long_about = "Diagnose automation setup, detect the GitHub server, analyze PAT permissions \
                  and report repository security. With no operation flag, runs --all."
)]
pub struct Cli {
    /// Run environment diagnostics
    #[arg(long)]
    diagnose: bool,

    /// Analyze PAT permissions and write the permissions report
    #[arg(long)]
    analyze: bool,

    /// Write the automation setup guide
    #[arg(long)]
    setup_report: bool,

    /// Remove legacy files and move docs into the docs directory
    #[arg(long)]
    cleanup: bool,

    /// Validate workflow files
    #[arg(long)]
    validate: bool,

    /// Detect the GitHub server type and capabilities
    #[arg(long)]
    detect_server: bool,

    /// Show repository security feature status
    #[arg(long)]
    security_status: bool,

    /// Enable Dependabot vulnerability alerts, then show security status
    #[arg(long)]
    enable_security: bool,

    /// Write pull request templates from templates.yaml
    #[arg(long)]
    pr_templates: bool,

    /// Run detect-server, validate, diagnose, analyze, setup-report and a
    /// cleanup dry run
    #[arg(long)]
    all: bool,

    /// Target repository (owner/name)
    #[arg(long, value_name = "OWNER/NAME")]
    repo: Option<String>,

    /// Preview cleanup without touching files
    #[arg(long)]
    dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Repository root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Config file to use instead of the repo-local .ght.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// One selectable operation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    DetectServer,
    Validate,
    Diagnose,
    SecurityStatus,
    EnableSecurity,
    Analyze,
    SetupReport,
    PrTemplates,
    Cleanup { dry_run: bool },
}

impl Operation {
    fn key(self) -> &'static str {
        match self {
            Operation::DetectServer => "detect_server",
            Operation::Validate => "validate",
            Operation::Diagnose => "diagnose",
            Operation::SecurityStatus => "security_status",
            Operation::EnableSecurity => "enable_security",
            Operation::Analyze => "analyze",
            Operation::SetupReport => "setup_report",
            Operation::PrTemplates => "pr_templates",
            Operation::Cleanup { .. } => "cleanup",
        }
    }

    fn run(self, ctx: &RunContext) -> Result<Outcome> {
        match self {
            Operation::DetectServer => server::execute(ctx),
            Operation::Validate => validate::execute(ctx),
            Operation::Diagnose => diagnose::execute(ctx),
            Operation::SecurityStatus => security::status(ctx),
            Operation::EnableSecurity => security::enable(ctx),
            Operation::Analyze => analyze::execute(ctx),
            Operation::SetupReport => setup_report::execute(ctx),
            Operation::PrTemplates => templates::execute(ctx),
            Operation::Cleanup { dry_run } => cleanup::execute(ctx, dry_run),
        }
    }
}

/// Result of one operation: pass/fail, human text and a JSON value
pub(crate) struct Outcome {
    pub success: bool,
    pub text: String,
    pub json: Value,
}

impl Cli {
    /// Operations selected by the flags, in fixed order
    fn operations(&self) -> Vec<Operation> {
        let explicit = self.diagnose
            || self.analyze
            || self.setup_report
            || self.cleanup
            || self.validate
            || self.detect_server
            || self.security_status
            || self.enable_security
            || self.pr_templates;

        if self.all || !explicit {
            // The aggregate run only ever previews cleanup
            let mut ops = vec![
                Operation::DetectServer,
                Operation::Validate,
                Operation::Diagnose,
                Operation::Analyze,
                Operation::SetupReport,
                Operation::Cleanup { dry_run: true },
            ];
            // Extra explicit flags given alongside --all still run
            let extras = [
                (self.security_status, Operation::SecurityStatus),
                (self.enable_security, Operation::EnableSecurity),
                (self.pr_templates, Operation::PrTemplates),
            ];
            for (selected, op) in extras {
                if selected {
                    ops.push(op);
                }
            }
            ops.sort_by_key(|op| order(*op));
            return ops;
        }

        let mut ops = Vec::new();
        let flags = [
            (self.detect_server, Operation::DetectServer),
            (self.validate, Operation::Validate),
            (self.diagnose, Operation::Diagnose),
            (self.security_status, Operation::SecurityStatus),
            (self.enable_security, Operation::EnableSecurity),
            (self.analyze, Operation::Analyze),
            (self.setup_report, Operation::SetupReport),
            (self.pr_templates, Operation::PrTemplates),
            (self.cleanup, Operation::Cleanup { dry_run: self.dry_run }),
        ];
        for (selected, op) in flags {
            if selected {
                ops.push(op);
            }
        }
        ops
    }

    /// Execute the selected operations. Returns whether all succeeded.
    pub fn execute(self) -> Result<bool> {
        let operations = self.operations();
        let ctx = RunContext::resolve(
            self.root.clone(),
            self.config.clone(),
            self.repo.clone(),
            self.json,
        )?;

        let mut success = true;
        let mut results = Map::new();
        for op in operations {
            tracing::debug!(operation = op.key(), "running");
            match op.run(&ctx) {
                Ok(outcome) => {
                    success &= outcome.success;
                    if ctx.json {
                        results.insert(op.key().to_string(), outcome.json);
                    } else {
                        println!("{}", outcome.text);
                    }
                }
                Err(e) => {
                    success = false;
                    if ctx.json {
                        results.insert(
                            op.key().to_string(),
                            serde_json::json!({ "error": format!("{e:#}") }),
                        );
                    } else {
                        eprintln!("Error ({}): {e:#}", op.key());
                    }
                }
            }
        }

        if ctx.json {
            results.insert("success".to_string(), Value::Bool(success));
            println!("{}", serde_json::to_string_pretty(&Value::Object(results))?);
        }
        Ok(success)
    }
}

fn order(op: Operation) -> usize {
    match op {
        Operation::DetectServer => 0,
        Operation::Validate => 1,
        Operation::Diagnose => 2,
        Operation::SecurityStatus => 3,
        Operation::EnableSecurity => 4,
        Operation::Analyze => 5,
        Operation::SetupReport => 6,
        Operation::PrTemplates => 7,
        Operation::Cleanup { .. } => 8,
    }
}

/// Check mark or cross for text output
pub(crate) fn mark(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}
