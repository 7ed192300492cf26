use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// How ruff is reachable in this project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuffMode {
    Uv,
    Direct,
}

/// One diagnostic from `ruff check --output-format json`.
#[derive(Debug, Clone, Deserialize)]
struct RuffViolation {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    location: RuffLocation,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RuffLocation {
    #[serde(default)]
    row: u64,
    #[serde(default)]
    column: u64,
}

/// PostToolUse handler: surface ruff findings after Python file edits.
///
/// Advisory only — violations come back as an approve-with-reason, never a
/// block. Prefers `uv run ruff`, falls back to a bare `ruff` on PATH, and
/// reminds about installation when neither works.
pub fn handle(input: &HookInput, cfg: &Config) -> Result<Verdict, String> {
    if !matches!(input.tool_name(), "Write" | "Edit" | "MultiEdit") {
        return Ok(Verdict::approve());
    }

    let file_path = input.input_str("file_path");
    if !utils::is_python_file(file_path) || !Path::new(file_path).exists() {
        return Ok(Verdict::approve());
    }

    if !cfg.run_linters {
        return Ok(Verdict::approve());
    }

    let Some(mode) = detect_ruff() else {
        return Ok(Verdict::approve_with(
            "REMINDER: Install ruff for linting! Per CLAUDE.md:\n\
             \x20 uv add --dev ruff\n\
             Then run: uv run ruff check .",
        ));
    };

    let violations = match run_ruff_check(file_path, mode) {
        Ok(v) => v,
        // ruff itself misbehaving never holds up the edit
        Err(_) => return Ok(Verdict::approve()),
    };

    if violations.is_empty() {
        return Ok(Verdict::approve());
    }

    let prefix = match mode {
        RuffMode::Uv => "uv run ",
        RuffMode::Direct => "",
    };
    Ok(Verdict::approve_with(format!(
        "⚠️ RUFF VIOLATIONS DETECTED in {}!\n\n\
         {}\n\n\
         Per CLAUDE.md, you MUST run:\n\
         \x20 {}ruff check --fix {}\n\
         \x20 {}ruff format {}\n\n\
         Fix these issues before continuing!",
        utils::basename(file_path),
        format_violations(&violations),
        prefix,
        file_path,
        prefix,
        file_path
    )))
}

/// Probe for ruff, uv-managed first.
fn detect_ruff() -> Option<RuffMode> {
    if version_check("uv", &["run", "ruff", "--version"]) {
        return Some(RuffMode::Uv);
    }
    if version_check("ruff", &["--version"]) {
        return Some(RuffMode::Direct);
    }
    None
}

fn version_check(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run ruff on one file and parse its JSON diagnostics.
fn run_ruff_check(file_path: &str, mode: RuffMode) -> Result<Vec<RuffViolation>, String> {
    let output = match mode {
        RuffMode::Uv => Command::new("uv")
            .args(["run", "ruff", "check", file_path, "--output-format", "json"])
            .output(),
        RuffMode::Direct => Command::new("ruff")
            .args(["check", file_path, "--output-format", "json"])
            .output(),
    }
    .map_err(|e| format!("Failed to run ruff: {}", e))?;

    if output.status.success() {
        return Ok(Vec::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).map_err(|e| format!("Unparseable ruff output: {}", e))
}

/// First 5 violations, one per line, with an elision count.
fn format_violations(violations: &[RuffViolation]) -> String {
    let mut lines: Vec<String> = violations
        .iter()
        .take(5)
        .map(|v| {
            format!(
                "  {}:{}:{} {}: {}",
                v.filename,
                v.location.row,
                v.location.column,
                v.code.as_deref().unwrap_or(""),
                v.message
            )
        })
        .collect();

    if violations.len() > 5 {
        lines.push(format!("  ... and {} more violations", violations.len() - 5));
    }

    lines.join("\n")
}
