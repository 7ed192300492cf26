use regex::Regex;
use std::sync::OnceLock;

use super::types::{HookInput, Verdict};
use crate::config::Config;

/// PreToolUse handler: enforce ripgrep over traditional search commands.
///
/// Blocks `grep` (unless the command pipes), `find -name`, `ack`/`ag`, and
/// `locate` in Bash commands, each with an `rg` equivalent in the reason.
pub fn handle(input: &HookInput, _cfg: &Config) -> Result<Verdict, String> {
    if input.tool_name() != "Bash" {
        return Ok(Verdict::approve());
    }

    let command = input.input_str("command");

    // grep at command start is blocked, but grep as a pipeline stage is fine
    if grep_re().is_match(command) && !command.contains('|') {
        return Ok(Verdict::block(
            "Use 'rg' (ripgrep) instead of 'grep'! Per CLAUDE.md:\n\
             \x20 - Search pattern: rg 'pattern'\n\
             \x20 - Search in files: rg 'pattern' *.py\n\
             \x20 - Case insensitive: rg -i 'pattern'\n\
             \x20 - Show context: rg -C 3 'pattern'\n\
             ripgrep is faster and has better features.",
        ));
    }

    if find_name_re().is_match(command) {
        return Ok(Verdict::block(
            "Use 'rg' instead of 'find -name'! Per CLAUDE.md:\n\
             \x20 - Find Python files: rg --files -g '*.py'\n\
             \x20 - Find all files: rg --files\n\
             \x20 - Filter by pattern: rg --files | rg 'pattern'\n\
             ripgrep is much faster for file searches.",
        ));
    }

    if ack_ag_re().is_match(command) {
        return Ok(Verdict::block(
            "Use 'rg' (ripgrep) for searching! Per CLAUDE.md:\n\
             ripgrep is the standard search tool for this project.\n\
             It's faster and more feature-rich than ack or ag.",
        ));
    }

    if locate_re().is_match(command) {
        return Ok(Verdict::block(
            "Use 'rg --files' instead of 'locate'!\n\
             locate uses a database that may be outdated.\n\
             rg --files gives real-time results.",
        ));
    }

    Ok(Verdict::approve())
}

fn grep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^grep\b").unwrap())
}

fn find_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^find\s+\S+\s+-name\b").unwrap())
}

fn ack_ag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(ack|ag)\b").unwrap())
}

fn locate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^locate\b").unwrap())
}
