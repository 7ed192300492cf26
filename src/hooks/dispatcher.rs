use super::file_limits;
use super::git_commit;
use super::lint_check;
use super::package_management;
use super::quality_reminder;
use super::search_commands;
use super::test_reminder;
use super::testing_standards;
use super::type_check;
use super::types::{HookEvent, HookInput, Verdict};
use super::utils;
use crate::config::Config;

/// Signature every hook handler conforms to.
pub type HookFn = fn(&HookInput, &Config) -> Result<Verdict, String>;

/// A registered hook: addressable name, the event it binds to, handler.
pub struct HookEntry {
    pub name: &'static str,
    pub event: HookEvent,
    pub handler: HookFn,
}

/// All hooks, in evaluation order. PreToolUse hooks are blocking policy
/// checks; PostToolUse hooks are advisory.
pub const REGISTRY: &[HookEntry] = &[
    HookEntry {
        name: "search-commands",
        event: HookEvent::PreToolUse,
        handler: search_commands::handle,
    },
    HookEntry {
        name: "git-commit",
        event: HookEvent::PreToolUse,
        handler: git_commit::handle,
    },
    HookEntry {
        name: "package-management",
        event: HookEvent::PreToolUse,
        handler: package_management::handle,
    },
    HookEntry {
        name: "file-limits",
        event: HookEvent::PreToolUse,
        handler: file_limits::handle,
    },
    HookEntry {
        name: "testing-standards",
        event: HookEvent::PreToolUse,
        handler: testing_standards::handle,
    },
    HookEntry {
        name: "lint-check",
        event: HookEvent::PostToolUse,
        handler: lint_check::handle,
    },
    HookEntry {
        name: "type-check",
        event: HookEvent::PostToolUse,
        handler: type_check::handle,
    },
    HookEntry {
        name: "test-reminder",
        event: HookEvent::PostToolUse,
        handler: test_reminder::handle,
    },
    HookEntry {
        name: "quality-reminder",
        event: HookEvent::PostToolUse,
        handler: quality_reminder::handle,
    },
];

/// Dispatch a hook event to its ordered chain of handlers.
///
/// - Parses `stdin_json` into a `HookInput`
/// - PreToolUse: first block verdict wins; otherwise the first advisory
///   reason is surfaced
/// - PostToolUse: always approves; the first advisory reason is surfaced
/// - Malformed input or a handler error degrades to approve (exit 0)
/// - Never panics
pub fn dispatch(event: HookEvent, stdin_json: &str, cfg: &Config) -> (String, i32) {
    let input = match parse_input(stdin_json, &format!("{:?}", event)) {
        Ok(input) => input,
        Err(verdict) => return finish(verdict),
    };

    let chain = REGISTRY.iter().filter(|e| e.event == event);
    let mut advisory: Option<String> = None;

    for entry in chain {
        match (entry.handler)(&input, cfg) {
            Ok(verdict) => {
                if verdict.is_block() {
                    return finish(verdict);
                }
                if advisory.is_none() {
                    advisory = verdict.reason;
                }
            }
            Err(err_msg) => {
                // Handler error — log and degrade gracefully
                log_error(entry.name, &err_msg);
            }
        }
    }

    match advisory {
        Some(reason) => finish(Verdict::approve_with(reason)),
        None => finish(Verdict::approve()),
    }
}

/// Run a single hook by its registry name, same degradation rules.
pub fn run_named(entry: &HookEntry, stdin_json: &str, cfg: &Config) -> (String, i32) {
    let input = match parse_input(stdin_json, entry.name) {
        Ok(input) => input,
        Err(verdict) => return finish(verdict),
    };

    match (entry.handler)(&input, cfg) {
        Ok(verdict) => finish(verdict),
        Err(err_msg) => {
            log_error(entry.name, &err_msg);
            finish(Verdict::approve())
        }
    }
}

/// Dispatch from a raw CLI argument: an event name runs the full chain,
/// a hook name runs that hook alone.
pub fn dispatch_from_cli(arg: &str, stdin_json: &str, cfg: &Config) -> Result<(String, i32), String> {
    if let Some(event) = HookEvent::from_arg(arg) {
        return Ok(dispatch(event, stdin_json, cfg));
    }
    if let Some(entry) = find_hook(arg) {
        return Ok(run_named(entry, stdin_json, cfg));
    }
    Err(format!("Unknown hook event or hook name: {}", arg))
}

/// Look up a hook by registry name.
pub fn find_hook(name: &str) -> Option<&'static HookEntry> {
    REGISTRY.iter().find(|e| e.name == name)
}

fn parse_input(stdin_json: &str, context: &str) -> Result<HookInput, Verdict> {
    serde_json::from_str::<HookInput>(stdin_json).map_err(|e| {
        log_error(context, &format!("Failed to parse hook stdin: {}", e));
        Verdict::approve_with(format!("Failed to parse input: {}", e))
    })
}

fn finish(verdict: Verdict) -> (String, i32) {
    if verdict.is_block()
        && let Some(reason) = &verdict.reason
    {
        eprintln!("{}", reason);
    }
    (verdict.to_stdout(), verdict.exit_code())
}

fn log_error(hook_name: &str, message: &str) {
    let Ok(cwd) = std::env::current_dir() else {
        return;
    };
    if let Some(state_dir) = utils::find_state_dir(&cwd) {
        utils::log_hook_error(&state_dir, hook_name, message);
    }
}
