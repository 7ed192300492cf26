use crate::config::Config;
use crate::hooks::dispatcher;

/// Run the CLI against already-collected args and stdin.
///
/// Returns `(stdout_output, exit_code)` on a recognized command; usage and
/// routing errors come back as `Err` and belong on stderr.
pub fn run_cli(args: &[String], stdin_json: &str) -> Result<(String, i32), String> {
    if args.len() < 2 {
        return Err("Usage: guardrail <hook|list-hooks> [args...]".to_string());
    }

    match args[1].as_str() {
        "hook" => {
            if args.len() < 3 {
                return Err("Usage: guardrail hook <event-or-hook-name>".to_string());
            }
            let cfg = Config::load_from_cwd();
            dispatcher::dispatch_from_cli(&args[2], stdin_json, &cfg)
        }
        "list-hooks" => Ok((list_hooks(), 0)),
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// One line per registered hook: `<name>  <event>`.
fn list_hooks() -> String {
    let mut out = String::new();
    for entry in dispatcher::REGISTRY {
        out.push_str(&format!("{:<22}{:?}\n", entry.name, entry.event));
    }
    out
}
