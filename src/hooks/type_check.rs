use regex::Regex;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// How mypy is reachable in this project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MypyMode {
    Uv,
    Direct,
}

/// PostToolUse handler: type-safety advisories after Python file edits.
///
/// Advisory only. Flags function signatures without return-type hints;
/// when mypy is installed, runs it and surfaces up to 10 errors. Skips
/// `__init__.py` and test files.
pub fn handle(input: &HookInput, cfg: &Config) -> Result<Verdict, String> {
    if !matches!(input.tool_name(), "Write" | "Edit" | "MultiEdit") {
        return Ok(Verdict::approve());
    }

    let file_path = input.input_str("file_path");
    if !utils::is_python_file(file_path) {
        return Ok(Verdict::approve());
    }
    if file_path.contains("__init__.py") || utils::basename(file_path).starts_with("test_") {
        return Ok(Verdict::approve());
    }
    if !Path::new(file_path).exists() {
        return Ok(Verdict::approve());
    }

    if let Ok(content) = fs::read_to_string(file_path)
        && has_unhinted_function(&content)
    {
        return Ok(Verdict::approve_with(
            "⚠️ MISSING TYPE HINTS! Per CLAUDE.md:\n\
             Always use type hints for function signatures.\n\n\
             Example:\n\
             \x20 def calculate(price: Decimal, tax: float) -> Decimal:\n\
             \x20     return price * Decimal(1 + tax)\n\n\
             Add type hints to all functions!",
        ));
    }

    if !cfg.run_linters {
        return Ok(Verdict::approve());
    }

    // mypy is optional; no reminder when absent
    let Some(mode) = detect_mypy() else {
        return Ok(Verdict::approve());
    };

    let errors = run_mypy_check(file_path, mode);
    if errors.is_empty() {
        return Ok(Verdict::approve());
    }

    let error_text = errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    let prefix = match mode {
        MypyMode::Uv => "uv run ",
        MypyMode::Direct => "",
    };
    Ok(Verdict::approve_with(format!(
        "⚠️ TYPE ERRORS DETECTED in {}!\n\n\
         {}\n\n\
         Per CLAUDE.md, fix type errors:\n\
         \x20 {}mypy {}\n\n\
         Ensure all type hints are correct!",
        utils::basename(file_path),
        error_text,
        prefix,
        file_path
    )))
}

/// True when some function signature lacks a return-type hint.
/// Single-line signatures only; anything the regex cannot see passes.
fn has_unhinted_function(content: &str) -> bool {
    no_return_hint_re().is_match(content)
}

fn no_return_hint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*def\s+\w+\s*\([^)]*\)\s*:").unwrap())
}

/// Probe for mypy, uv-managed first.
fn detect_mypy() -> Option<MypyMode> {
    if version_check("uv", &["run", "mypy", "--version"]) {
        return Some(MypyMode::Uv);
    }
    if version_check("mypy", &["--version"]) {
        return Some(MypyMode::Direct);
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

/// Run mypy on one file; returns up to 10 error lines, empty when clean
/// or when mypy itself fails.
fn run_mypy_check(file_path: &str, mode: MypyMode) -> Vec<String> {
    let output = match mode {
        MypyMode::Uv => Command::new("uv")
            .args(["run", "mypy", file_path, "--no-error-summary"])
            .output(),
        MypyMode::Direct => Command::new("mypy")
            .args([file_path, "--no-error-summary"])
            .output(),
    };

    let Ok(output) = output else {
        return Vec::new();
    };
    if output.status.success() {
        return Vec::new();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("Found"))
        .take(10)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cfg() -> Config {
        Config::default()
    }

    fn write(path: &str) -> HookInput {
        HookInput {
            data: json!({
                "tool_name": "Write",
                "tool_input": { "file_path": path, "content": "" }
            }),
        }
    }

    #[test]
    fn test_has_unhinted_function_detects() {
        assert!(has_unhinted_function("def f(x):\n    return x\n"));
        assert!(has_unhinted_function(
            "class A:\n    def method(self, y):\n        pass\n"
        ));
    }

    #[test]
    fn test_has_unhinted_function_passes_hinted() {
        assert!(!has_unhinted_function("def f(x: int) -> int:\n    return x\n"));
        assert!(!has_unhinted_function("x = 1\ny = 2\n"));
    }

    #[test]
    fn test_missing_hints_advisory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("calc.py");
        fs::write(&path, "def add(a, b):\n    return a + b\n").unwrap();

        let v = handle(&write(path.to_str().unwrap()), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
        assert!(v.reason.unwrap().contains("MISSING TYPE HINTS"));
    }

    #[test]
    fn test_skip_init_py() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("__init__.py");
        fs::write(&path, "def f(x):\n    return x\n").unwrap();

        let v = handle(&write(path.to_str().unwrap()), &cfg()).unwrap();
        assert!(v.reason.is_none());
    }

    #[test]
    fn test_skip_test_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test_calc.py");
        fs::write(&path, "def test_add():\n    assert True\n").unwrap();

        let v = handle(&write(path.to_str().unwrap()), &cfg()).unwrap();
        assert!(v.reason.is_none());
    }

    #[test]
    fn test_skip_missing_file() {
        let v = handle(&write("/tmp/guardrail-missing-types.py"), &cfg()).unwrap();
        assert!(v.reason.is_none());
    }

    #[test]
    fn test_skip_non_python() {
        let v = handle(&write("/project/Makefile"), &cfg()).unwrap();
        assert!(v.reason.is_none());
    }

    #[test]
    fn test_hinted_file_with_linters_disabled_silent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("calc.py");
        fs::write(&path, "def add(a: int, b: int) -> int:\n    return a + b\n").unwrap();

        let hermetic = Config {
            run_linters: false,
            ..Config::default()
        };
        let v = handle(&write(path.to_str().unwrap()), &hermetic).unwrap();
        assert_eq!(v.exit_code(), 0);
        assert!(v.reason.is_none());
    }
}
