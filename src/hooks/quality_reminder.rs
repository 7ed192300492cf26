use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// PostToolUse handler: quality checklist after substantial Python edits.
///
/// Advisory only. Fires when a single Write/Edit introduces at least
/// `quality_reminder_lines` lines; the checklist commands are anchored at
/// the project root (nearest pyproject.toml or .git ancestor).
pub fn handle(input: &HookInput, cfg: &Config) -> Result<Verdict, String> {
    if !matches!(input.tool_name(), "Write" | "Edit" | "MultiEdit") {
        return Ok(Verdict::approve());
    }

    let file_path = input.input_str("file_path");
    if !utils::is_python_file(file_path) {
        return Ok(Verdict::approve());
    }

    let introduced = introduced_lines(input);
    if introduced < cfg.quality_reminder_lines {
        return Ok(Verdict::approve());
    }

    let project_root = utils::find_project_root(file_path);
    let root = project_root.display();

    Ok(Verdict::approve_with(format!(
        "📋 QUALITY CHECK REMINDER - {} modified ({} lines)!\n\n\
         Per CLAUDE.md, run these checks before finishing:\n\n\
         1. LINTING & FORMATTING:\n\
         \x20  uv run ruff check {} --fix\n\
         \x20  uv run ruff format {}\n\n\
         2. TYPE CHECKING:\n\
         \x20  uv run mypy {}\n\n\
         3. RUN TESTS:\n\
         \x20  uv run pytest\n\
         \x20  uv run pytest --cov=src --cov-report=html\n\n\
         4. CHECK LINE LIMITS:\n\
         \x20  - Files < {} lines\n\
         \x20  - Functions < {} lines\n\
         \x20  - Classes < {} lines\n\n\
         Complete ALL checks before marking task as done!",
        utils::basename(file_path),
        introduced,
        root,
        root,
        root,
        cfg.max_file_lines,
        cfg.max_function_lines,
        cfg.max_class_lines
    )))
}

/// Lines this invocation introduces: Write content, Edit new_string, or
/// all MultiEdit new_strings combined.
fn introduced_lines(input: &HookInput) -> usize {
    match input.tool_name() {
        "Write" => utils::count_lines(input.input_str("content")),
        "Edit" => utils::count_lines(input.input_str("new_string")),
        "MultiEdit" => input
            .tool_input()
            .and_then(|ti| ti.get("edits"))
            .and_then(|v| v.as_array())
            .map(|edits| {
                edits
                    .iter()
                    .filter_map(|e| e.get("new_string").and_then(|v| v.as_str()))
                    .map(utils::count_lines)
                    .sum()
            })
            .unwrap_or(0),
        _ => 0,
    }
}
