use regex::Regex;
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// PreToolUse handler: enforce testing standards.
///
/// Test files live in `tests/` subdirectories and are named `test_*`; new
/// implementation files get a TDD reminder; pytest runs go through uv.
pub fn handle(input: &HookInput, _cfg: &Config) -> Result<Verdict, String> {
    let tool_name = input.tool_name();

    if matches!(tool_name, "Write" | "Edit" | "MultiEdit") {
        let file_path = input.input_str("file_path");

        if utils::is_test_file(file_path) {
            if !file_path.split('/').any(|part| part == "tests") {
                return Ok(Verdict::block(
                    "Test files must be in 'tests/' subdirectories! Per CLAUDE.md:\n\
                     Vertical slice architecture requires tests next to code:\n\n\
                     Example structure:\n\
                     \x20 features/user_management/\n\
                     \x20   handlers.py\n\
                     \x20   tests/\n\
                     \x20     test_handlers.py\n\n\
                     Move this test to the appropriate tests/ subdirectory.",
                ));
            }

            let filename = utils::basename(file_path);
            if !filename.starts_with("test_") {
                return Ok(Verdict::block(format!(
                    "Test files must start with 'test_'! Per CLAUDE.md:\n\
                     Proper naming: test_module.py, test_feature.py\n\
                     Rename '{}' to start with 'test_'",
                    filename
                )));
            }
        }

        if tool_name == "Write"
            && utils::is_python_file(file_path)
            && !file_path.contains("test")
        {
            let content = input.input_str("content");
            if def_or_class_re().is_match(content) {
                let suggested = suggested_test_path(file_path);
                return Ok(Verdict::approve_with(format!(
                    "REMINDER: Follow TDD! Per CLAUDE.md:\n\
                     Create test file: {}\n\
                     Write tests BEFORE implementation.",
                    suggested
                )));
            }
        }

        return Ok(Verdict::approve());
    }

    if tool_name != "Bash" {
        return Ok(Verdict::approve());
    }

    let command = input.input_str("command");

    // pytest as a command, not inside quoted strings
    if pytest_cmd_re().is_match(command) {
        if !command.starts_with("uv run") && !command.contains("venv_linux") {
            return Ok(Verdict::block(
                "Run pytest with UV! Per CLAUDE.md:\n\
                 \x20 uv run pytest\n\
                 \x20 uv run pytest tests/test_module.py -v\n\
                 \x20 uv run pytest --cov=src --cov-report=html",
            ));
        }

        if !command.contains("--cov") && !test_file_arg_re().is_match(command) {
            return Ok(Verdict::approve_with(
                "TIP: Run with coverage! Per CLAUDE.md:\n\
                 \x20 uv run pytest --cov=src --cov-report=html\n\
                 Aim for 80%+ coverage on critical paths.",
            ));
        }
    }

    if unittest_re().is_match(command) {
        return Ok(Verdict::block(
            "Use pytest instead of unittest! Per CLAUDE.md:\n\
             pytest is the standard testing framework.\n\
             \x20 uv run pytest\n\
             \x20 uv run pytest tests/ -v",
        ));
    }

    Ok(Verdict::approve())
}

/// Where a test for this implementation file belongs.
fn suggested_test_path(file_path: &str) -> String {
    let name = utils::basename(file_path);
    match file_path.rfind('/') {
        Some(idx) => format!("{}/tests/test_{}", &file_path[..idx], name),
        None => format!("tests/test_{}", name),
    }
}

fn def_or_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(def|class)\s+\w+").unwrap())
}

fn pytest_cmd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^pytest\s|[;&|]\s*pytest\s").unwrap())
}

fn test_file_arg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"test_\w+\.py").unwrap())
}

fn unittest_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"python.*-m\s+unittest").unwrap())
}
