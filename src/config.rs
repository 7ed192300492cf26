use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::hooks::utils;

/// Policy thresholds, overridable from `.guardrail/config.json`.
/// Defaults are the limits the rules were written against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Maximum lines for a Python file written via Write.
    pub max_file_lines: usize,
    /// Maximum lines for a single function body.
    pub max_function_lines: usize,
    /// Maximum lines for a single class body.
    pub max_class_lines: usize,
    /// Maximum lines a single Edit may add.
    pub max_edit_lines: usize,
    /// Minimum payload size (lines) before the quality checklist fires.
    pub quality_reminder_lines: usize,
    /// Whether advisory hooks may shell out to ruff/mypy.
    pub run_linters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_lines: 500,
            max_function_lines: 50,
            max_class_lines: 100,
            max_edit_lines: 50,
            quality_reminder_lines: 30,
            run_linters: true,
        }
    }
}

impl Config {
    /// Load config by walking up from `start` to the nearest `.guardrail/`
    /// directory. Missing or malformed config falls back to defaults —
    /// a broken config file must never change hook outcomes to blocks.
    pub fn load(start: &Path) -> Config {
        let Some(state_dir) = utils::find_state_dir(start) else {
            return Config::default();
        };
        Self::load_from(&state_dir.join("config.json"))
    }

    /// Load config from an explicit path, defaulting on any failure.
    pub fn load_from(path: &Path) -> Config {
        fs::read_to_string(path)
            .ok()
            .and_then(|c| serde_json::from_str(&c).ok())
            .unwrap_or_default()
    }

    /// Load from the current working directory.
    pub fn load_from_cwd() -> Config {
        match std::env::current_dir() {
            Ok(cwd) => Config::load(&cwd),
            Err(_) => Config::default(),
        }
    }
}
