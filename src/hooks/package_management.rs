use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use crate::config::Config;

/// Patterns that mark a pyproject.toml change as dependency-related.
const DEP_PATTERNS: &[&str] = &[
    r"\[tool\.uv\.dependencies\]",
    r"\[project\.dependencies\]",
    r"\[tool\.uv\.dev-dependencies\]",
    r"dependencies\s*=\s*\[",
    r"requires\s*=\s*\[",
    r#""[^"]+==[\d\.]+""#,
    r#""[^"]+>=[\d\.]+""#,
    r#""[^"]+~=[\d\.]+""#,
];

/// PreToolUse handler: enforce uv for Python package management.
///
/// Dependency edits go through `uv add`/`uv remove`, never directly into
/// pyproject.toml; pip and poetry are blocked; Python tooling runs under
/// `uv run` or the project virtualenv.
pub fn handle(input: &HookInput, _cfg: &Config) -> Result<Verdict, String> {
    let tool_name = input.tool_name();

    if matches!(tool_name, "Write" | "Edit" | "MultiEdit") {
        let file_path = input.input_str("file_path");
        if file_path.ends_with("pyproject.toml") {
            let content = edited_content(input);
            for pattern in dep_res() {
                if pattern.is_match(&content) {
                    return Ok(Verdict::block(
                        "NEVER update dependencies directly in pyproject.toml! \
                         Per CLAUDE.md: Always use UV commands:\n\
                         \x20 - Add package: uv add <package>\n\
                         \x20 - Add dev dependency: uv add --dev <package>\n\
                         \x20 - Remove package: uv remove <package>\n\
                         \x20 - Update all: uv sync",
                    ));
                }
            }
        }
        return Ok(Verdict::approve());
    }

    if tool_name != "Bash" {
        return Ok(Verdict::approve());
    }

    let command = input.input_str("command");

    if pip_install_re().is_match(command) {
        return Ok(Verdict::block(
            "Use UV instead of pip! Per CLAUDE.md:\n\
             \x20 - Install packages: uv add <package>\n\
             \x20 - Install dev dependencies: uv add --dev <package>\n\
             \x20 - Sync all dependencies: uv sync",
        ));
    }

    if poetry_re().is_match(command) {
        return Ok(Verdict::block(
            "Use UV instead of Poetry! Per CLAUDE.md:\n\
             \x20 - Add package: uv add <package>\n\
             \x20 - Remove package: uv remove <package>\n\
             \x20 - Install all: uv sync",
        ));
    }

    if python_exec_re().is_match(command)
        && !command.starts_with("uv run")
        && !command.contains("venv_linux")
        && !command.contains("./venv_linux")
    {
        return Ok(Verdict::block(
            "Use UV or venv_linux for Python commands! Per CLAUDE.md:\n\
             \x20 Preferred: uv run python script.py\n\
             \x20 Or: uv run pytest\n\
             \x20 Or: ./venv_linux/bin/python script.py\n\
             Always use the virtual environment.",
        ));
    }

    if manual_venv_re().is_match(command) {
        return Ok(Verdict::block(
            "Use UV to manage virtual environments! Per CLAUDE.md:\n\
             \x20 Create venv: uv venv\n\
             \x20 Use specific Python: uv python install 3.12",
        ));
    }

    Ok(Verdict::approve())
}

/// Concatenate the text a Write/Edit/MultiEdit would introduce.
fn edited_content(input: &HookInput) -> String {
    match input.tool_name() {
        "Write" => input.input_str("content").to_string(),
        "Edit" => input.input_str("new_string").to_string(),
        "MultiEdit" => {
            let edits = input
                .tool_input()
                .and_then(|ti| ti.get("edits"))
                .and_then(|v| v.as_array());
            match edits {
                Some(edits) => edits
                    .iter()
                    .filter_map(|e| e.get("new_string").and_then(|v| v.as_str()))
                    .collect::<Vec<_>>()
                    .join(" "),
                None => String::new(),
            }
        }
        _ => String::new(),
    }
}

fn dep_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        DEP_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect()
    })
}

fn pip_install_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bpip\s+install\b").unwrap())
}

fn poetry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bpoetry\s+(add|install|remove)\b").unwrap())
}

fn python_exec_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(python3?|pytest|mypy|ruff)\s+").unwrap())
}

fn manual_venv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"python\s+-m\s+venv\b").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bash(command: &str) -> HookInput {
        HookInput {
            data: json!({ "tool_name": "Bash", "tool_input": { "command": command } }),
        }
    }

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn test_block_pip_install() {
        let v = handle(&bash("pip install requests"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("uv add"));
    }

    #[test]
    fn test_block_pip_install_mid_command() {
        let v = handle(&bash("cd app && pip install -r requirements.txt"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_block_poetry_add() {
        let v = handle(&bash("poetry add requests"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("UV instead of Poetry"));
    }

    #[test]
    fn test_allow_poetry_show() {
        let v = handle(&bash("poetry show"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_block_bare_python() {
        let v = handle(&bash("python script.py"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("uv run"));
    }

    #[test]
    fn test_block_bare_pytest() {
        let v = handle(&bash("pytest tests/"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_block_bare_mypy() {
        let v = handle(&bash("mypy src/"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_allow_uv_run_python() {
        let v = handle(&bash("uv run python script.py"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_allow_venv_linux_python() {
        let v = handle(&bash("./venv_linux/bin/python script.py"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_block_manual_venv() {
        let v = handle(&bash("cd app && python -m venv .venv"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("uv venv"));
    }

    #[test]
    fn test_block_pyproject_dependency_write() {
        let input = HookInput {
            data: json!({
                "tool_name": "Write",
                "tool_input": {
                    "file_path": "/project/pyproject.toml",
                    "content": "[project]\ndependencies = [\n  \"requests>=2.31\",\n]"
                }
            }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("uv add"));
    }

    #[test]
    fn test_block_pyproject_pinned_edit() {
        let input = HookInput {
            data: json!({
                "tool_name": "Edit",
                "tool_input": {
                    "file_path": "pyproject.toml",
                    "old_string": "\"requests==2.30.0\"",
                    "new_string": "\"requests==2.31.0\""
                }
            }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_block_pyproject_multiedit() {
        let input = HookInput {
            data: json!({
                "tool_name": "MultiEdit",
                "tool_input": {
                    "file_path": "pyproject.toml",
                    "edits": [
                        { "old_string": "name = \"app\"", "new_string": "name = \"myapp\"" },
                        { "old_string": "x", "new_string": "requires = [\n  \"hatchling\"\n]" }
                    ]
                }
            }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_allow_pyproject_metadata_edit() {
        let input = HookInput {
            data: json!({
                "tool_name": "Edit",
                "tool_input": {
                    "file_path": "pyproject.toml",
                    "old_string": "name = \"app\"",
                    "new_string": "name = \"renamed-app\""
                }
            }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_allow_other_toml_write() {
        let input = HookInput {
            data: json!({
                "tool_name": "Write",
                "tool_input": {
                    "file_path": "config.toml",
                    "content": "dependencies = [\"something\"]"
                }
            }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_allow_unrelated_bash() {
        let v = handle(&bash("ls -la"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_edited_content_multiedit_missing_edits() {
        let input = HookInput {
            data: json!({
                "tool_name": "MultiEdit",
                "tool_input": { "file_path": "pyproject.toml" }
            }),
        };
        assert_eq!(edited_content(&input), "");
        let v = handle(&input, &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }
}
