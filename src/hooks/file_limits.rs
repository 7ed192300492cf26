use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// PreToolUse handler: enforce Python file size and structure limits.
///
/// Write: blocks files over the line limit and functions/classes over
/// theirs. Edit: blocks edits that add too many lines at once. Read of an
/// already-oversized file approves with a refactor warning.
pub fn handle(input: &HookInput, cfg: &Config) -> Result<Verdict, String> {
    let tool_name = input.tool_name();
    let file_path = input.input_str("file_path");

    if matches!(tool_name, "Write" | "Edit" | "MultiEdit") {
        if !utils::is_python_file(file_path) {
            return Ok(Verdict::approve());
        }

        if tool_name == "Write" {
            let content = input.input_str("content");
            let line_count = utils::count_lines(content);

            if line_count > cfg.max_file_lines {
                return Ok(Verdict::block(format!(
                    "File would be {} lines (max {}). Per CLAUDE.md: Split into multiple modules.",
                    line_count, cfg.max_file_lines
                )));
            }

            let violations = analyze_python_source(content, cfg);
            if !violations.is_empty() {
                let list = violations
                    .iter()
                    .map(|v| format!("  - {}", v))
                    .collect::<Vec<_>>()
                    .join("\n");
                return Ok(Verdict::block(format!(
                    "Code structure violations per CLAUDE.md:\n{}",
                    list
                )));
            }
        } else if tool_name == "Edit" && Path::new(file_path).exists() {
            let new_lines = utils::count_lines(input.input_str("new_string"));
            if new_lines > cfg.max_edit_lines {
                return Ok(Verdict::block(format!(
                    "Edit adds {} lines. Consider breaking into smaller edits or refactoring.",
                    new_lines
                )));
            }
        }
    } else if tool_name == "Read"
        && utils::is_python_file(file_path)
        && let Ok(content) = fs::read_to_string(file_path)
    {
        let line_count = utils::count_lines(&content);
        if line_count > cfg.max_file_lines {
            return Ok(Verdict::approve_with(format!(
                "WARNING: File has {} lines (exceeds {}). Per CLAUDE.md: This file should be refactored.",
                line_count, cfg.max_file_lines
            )));
        }
    }

    Ok(Verdict::approve())
}

/// Scan Python source for functions/classes over the line limits.
///
/// Indentation-based: a def/class block runs from its header to the last
/// non-blank line indented deeper than the header. Source the scan cannot
/// make sense of passes through without violations.
fn analyze_python_source(content: &str, cfg: &Config) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let mut violations = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = def_class_re().captures(line) else {
            continue;
        };
        let header_indent = caps[1].len();
        let kind = &caps[2];
        let name = caps[3].to_string();

        let block_lines = block_length(&lines, i, header_indent);

        if kind == "class" {
            if block_lines > cfg.max_class_lines {
                violations.push(format!(
                    "Class '{}' at line {} is {} lines (max {})",
                    name,
                    i + 1,
                    block_lines,
                    cfg.max_class_lines
                ));
            }
        } else if block_lines > cfg.max_function_lines {
            violations.push(format!(
                "Function '{}' at line {} is {} lines (max {})",
                name,
                i + 1,
                block_lines,
                cfg.max_function_lines
            ));
        }
    }

    violations
}

/// Length of the block starting at `start`: header line through the last
/// non-blank line indented past `header_indent`.
fn block_length(lines: &[&str], start: usize, header_indent: usize) -> usize {
    let mut last = start;
    for (j, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if indent <= header_indent {
            break;
        }
        last = j;
    }
    last - start + 1
}

fn def_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(?:async\s+)?(def|class)\s+(\w+)").unwrap())
}
