use std::path::{Path, PathBuf};

use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// Edits where both sides are under this many characters are too minor to
/// warrant a reminder.
const MINOR_EDIT_CHARS: usize = 50;

/// PostToolUse handler: remind about running tests after code changes.
///
/// Advisory only. Looks for the corresponding test file next to (or one
/// level above) the modified implementation file and reminds to run it,
/// or to create one if none exists.
pub fn handle(input: &HookInput, _cfg: &Config) -> Result<Verdict, String> {
    if !matches!(input.tool_name(), "Write" | "Edit" | "MultiEdit") {
        return Ok(Verdict::approve());
    }

    let file_path = input.input_str("file_path");
    if !utils::is_python_file(file_path) {
        return Ok(Verdict::approve());
    }

    // Test files and package markers don't need their own reminders
    if utils::basename(file_path).starts_with("test_") || file_path.contains("__init__.py") {
        return Ok(Verdict::approve());
    }

    // Skip minor edits (comments, docstrings, small tweaks)
    if input.tool_name() == "Edit" {
        let old_string = input.input_str("old_string");
        let new_string = input.input_str("new_string");
        if old_string.len() < MINOR_EDIT_CHARS && new_string.len() < MINOR_EDIT_CHARS {
            return Ok(Verdict::approve());
        }
    }

    let name = utils::basename(file_path);

    match find_test_file(file_path) {
        Some(test_file) => Ok(Verdict::approve_with(format!(
            "🧪 TEST REMINDER for {}!\n\n\
             Test file found: {}\n\n\
             Per CLAUDE.md (TDD practices), run tests:\n\
             \x20 uv run pytest {} -v\n\n\
             Or run all tests:\n\
             \x20 uv run pytest\n\n\
             Ensure all tests pass after your changes!",
            name,
            test_file.display(),
            test_file.display()
        ))),
        None => {
            let suggested = Path::new(file_path)
                .parent()
                .unwrap_or(Path::new("."))
                .join("tests")
                .join(format!("test_{}", name));
            Ok(Verdict::approve_with(format!(
                "⚠️ NO TESTS FOUND for {}!\n\n\
                 Per CLAUDE.md (TDD requirement):\n\
                 1. Create test file: {}\n\
                 2. Write tests for your implementation\n\
                 3. Run: uv run pytest\n\n\
                 Remember: No feature is complete without tests!",
                name,
                suggested.display()
            )))
        }
    }
}

/// Find the corresponding test file for an implementation file: first
/// `<dir>/tests/test_<name>`, then `<dir>/../tests/test_<name>`.
fn find_test_file(file_path: &str) -> Option<PathBuf> {
    let path = Path::new(file_path);
    let name = path.file_name()?.to_string_lossy().to_string();
    let parent = path.parent()?;

    let candidate = parent.join("tests").join(format!("test_{}", name));
    if candidate.exists() {
        return Some(candidate);
    }

    let candidate = parent.parent()?.join("tests").join(format!("test_{}", name));
    if candidate.exists() {
        return Some(candidate);
    }

    None
}
