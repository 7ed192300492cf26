use regex::Regex;
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use crate::config::Config;

/// Phrases that must never appear in a commit command (matched lowercase).
const PROHIBITED_PHRASES: &[&str] = &[
    r"claude\s+code",
    r"written\s+by\s+claude",
    r"generated\s+by\s+claude",
    r"claude\s+ai",
    r"anthropic",
    "🤖",
];

/// PreToolUse handler: enforce git commit and push standards.
///
/// Blocks AI-attribution phrases in commit commands, too-short
/// non-conventional commit messages, pushes to protected branches, and
/// bare force pushes (`--force-with-lease` stays allowed).
pub fn handle(input: &HookInput, _cfg: &Config) -> Result<Verdict, String> {
    if input.tool_name() != "Bash" {
        return Ok(Verdict::approve());
    }

    let command = input.input_str("command");

    if git_commit_re().is_match(command) {
        let lower = command.to_lowercase();
        for phrase in prohibited_res() {
            if phrase.is_match(&lower) {
                return Ok(Verdict::block(
                    "Never include 'Claude Code' or AI references in commit messages! \
                     Per CLAUDE.md: Write professional commit messages without \
                     mentioning AI assistance.\n\n\
                     Format: <type>(<scope>): <subject>\n\
                     Types: feat, fix, docs, style, refactor, test, chore",
                ));
            }
        }

        if command.contains("-m")
            && let Some(message) = extract_commit_message(command)
            && !conventional_re().is_match(&message)
            && message.len() < 10
        {
            return Ok(Verdict::block(
                "Commit message too short or incorrect format! Per CLAUDE.md:\n\
                 Format: <type>(<scope>): <subject>\n\n\
                 Examples:\n\
                 \x20 feat(auth): add two-factor authentication\n\
                 \x20 fix(api): resolve timeout issue in payment endpoint\n\
                 \x20 docs: update API documentation\n\
                 \x20 refactor(database): optimize query performance",
            ));
        }
    }

    if git_push_re().is_match(command) && protected_branch_re().is_match(command) {
        return Ok(Verdict::block(
            "Don't push directly to main/master! Per CLAUDE.md:\n\
             Follow GitHub Flow:\n\
             \x20 1. Create feature branch: git checkout -b feature/name\n\
             \x20 2. Push feature branch: git push origin feature/name\n\
             \x20 3. Create Pull Request\n\
             \x20 4. Review and merge via PR",
        ));
    }

    if is_bare_force_push(command) {
        return Ok(Verdict::block(
            "Never use 'git push --force'!\n\
             Use 'git push --force-with-lease' instead for safety.\n\
             This prevents overwriting others' work.",
        ));
    }

    Ok(Verdict::approve())
}

/// Extract the `-m` message from a commit command.
fn extract_commit_message(command: &str) -> Option<String> {
    message_re()
        .captures(command)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detect `--force` on a push that is not `--force-with-lease`.
/// The regex crate has no lookahead, so lease flags are removed first.
fn is_bare_force_push(command: &str) -> bool {
    if !force_push_re().is_match(command) {
        return false;
    }
    command.replace("--force-with-lease", "").contains("--force")
}

fn git_commit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bgit\s+commit\b").unwrap())
}

fn git_push_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^git\s+push\s+").unwrap())
}

fn protected_branch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(main|master|production)\b").unwrap())
}

fn force_push_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"git\s+push\s+.*--force").unwrap())
}

fn message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"-m\s+["']([^"']+)["']"#).unwrap())
}

fn conventional_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(feat|fix|docs|style|refactor|test|chore)(\([^)]+\))?:\s+.+").unwrap()
    })
}

fn prohibited_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        PROHIBITED_PHRASES
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    })
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
    fn test_block_claude_code_reference() {
        let v = handle(
            &bash("git commit -m 'feat(x): done with Claude Code'"),
            &cfg(),
        )
        .unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("AI references"));
    }

    #[test]
    fn test_block_generated_by_claude() {
        let v = handle(
            &bash("git commit -m 'fix: patch generated by claude'"),
            &cfg(),
        )
        .unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_block_anthropic_reference() {
        let v = handle(&bash("git commit -m 'chore: anthropic cleanup'"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_block_robot_emoji() {
        let v = handle(&bash("git commit -m 'feat(ui): add button 🤖'"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_allow_conventional_commit() {
        let v = handle(
            &bash("git commit -m 'feat(auth): add two-factor authentication'"),
            &cfg(),
        )
        .unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_allow_long_plain_message() {
        // Non-conventional but descriptive messages pass
        let v = handle(
            &bash("git commit -m 'update parser to handle nested blocks'"),
            &cfg(),
        )
        .unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_block_short_message() {
        let v = handle(&bash("git commit -m 'wip'"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("too short"));
    }

    #[test]
    fn test_block_push_to_main() {
        let v = handle(&bash("git push origin main"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("GitHub Flow"));
    }

    #[test]
    fn test_block_push_to_master() {
        let v = handle(&bash("git push origin master"), &cfg()).unwrap();
        assert!(v.is_block());
    }

    #[test]
    fn test_allow_push_feature_branch() {
        let v = handle(&bash("git push origin feature/login"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_block_force_push() {
        let v = handle(&bash("git push --force origin feature/x"), &cfg()).unwrap();
        assert!(v.is_block());
        assert!(v.reason.unwrap().contains("force-with-lease"));
    }

    #[test]
    fn test_allow_force_with_lease() {
        let v = handle(
            &bash("git push --force-with-lease origin feature/x"),
            &cfg(),
        )
        .unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_allow_non_git_command() {
        let v = handle(&bash("cargo build --release"), &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_non_bash_tool_approves() {
        let input = HookInput {
            data: json!({ "tool_name": "Edit", "tool_input": { "file_path": "a.py" } }),
        };
        let v = handle(&input, &cfg()).unwrap();
        assert_eq!(v.exit_code(), 0);
    }

    #[test]
    fn test_extract_commit_message() {
        assert_eq!(
            extract_commit_message("git commit -m 'fix: typo'"),
            Some("fix: typo".to_string())
        );
        assert_eq!(
            extract_commit_message(r#"git commit -m "docs: readme""#),
            Some("docs: readme".to_string())
        );
        assert_eq!(extract_commit_message("git commit"), None);
    }

    #[test]
    fn test_is_bare_force_push() {
        assert!(is_bare_force_push("git push --force origin x"));
        assert!(!is_bare_force_push("git push --force-with-lease origin x"));
        assert!(!is_bare_force_push("git push origin x"));
    }
}
