use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// True for paths the Python policy rules apply to.
pub fn is_python_file(path: &str) -> bool {
    path.ends_with(".py")
}

/// True when the basename follows either pytest test-file convention.
pub fn is_test_file(path: &str) -> bool {
    let name = basename(path);
    name.starts_with("test_") || name.ends_with("_test.py")
}

/// Final path component, or the whole string if there is none.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Count lines the way Python's splitlines() does: a trailing newline does
/// not open an extra empty line.
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}

/// Walk up from `start` to find a directory containing `.guardrail/`.
/// Returns the `.guardrail` directory path if found.
pub fn find_state_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(".guardrail");
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Find the project root for a file: the nearest ancestor holding a
/// `pyproject.toml` or `.git`. Falls back to the file's own directory.
pub fn find_project_root(file_path: &str) -> PathBuf {
    let file = Path::new(file_path);
    let fallback = file.parent().unwrap_or(Path::new(".")).to_path_buf();

    let mut current = fallback.clone();
    for _ in 0..10 {
        if current.join("pyproject.toml").exists() || current.join(".git").exists() {
            return current;
        }
        if !current.pop() {
            break;
        }
    }

    fallback
}

/// Log a hook failure to `.guardrail/hook-errors.log`.
/// Trims to 50 entries (keeps last 30) to prevent unbounded growth.
pub fn log_hook_error(state_dir: &Path, hook_name: &str, message: &str) {
    let log_path = state_dir.join("hook-errors.log");
    let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let entry = format!("[{}] {}: {}\n", ts, hook_name, message);

    if let Ok(mut f) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = f.write_all(entry.as_bytes());
    }

    trim_log_file(&log_path, 50, 30);
}

/// Trim a log file: if it exceeds `max_lines`, keep only the last `keep_lines`.
fn trim_log_file(path: &Path, max_lines: usize, keep_lines: usize) {
    if let Ok(content) = fs::read_to_string(path) {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() > max_lines {
            let trimmed: Vec<&str> = lines[lines.len() - keep_lines..].to_vec();
            let mut output = trimmed.join("\n");
            output.push('\n');
            let _ = fs::write(path, output);
        }
    }
}
