//! Native Rust hook handlers for coding-assistant tool events.
//!
//! Supported hook events and their handlers:
//!   - **PreToolUse** (blocking, first block wins): `search_commands`,
//!     `git_commit`, `package_management`, `file_limits`, `testing_standards`
//!   - **PostToolUse** (advisory, always exit 0): `lint_check`, `type_check`,
//!     `test_reminder`, `quality_reminder`
//!
//! All events are dispatched via `dispatcher::dispatch()`.
//! Entry point: `guardrail hook <event-or-hook-name>` (reads JSON from stdin).

// Hook infrastructure modules
pub mod dispatcher;
pub mod types;
pub mod utils;

// PreToolUse policy hooks
pub mod file_limits;
pub mod git_commit;
pub mod package_management;
pub mod search_commands;
pub mod testing_standards;

// PostToolUse advisory hooks
pub mod lint_check;
pub mod quality_reminder;
pub mod test_reminder;
pub mod type_check;
