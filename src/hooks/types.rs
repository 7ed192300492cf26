use serde::{Deserialize, Serialize};

/// Hook events the dispatcher can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
}

impl HookEvent {
    /// Parse an event name from CLI argument (case-insensitive).
    pub fn from_arg(s: &str) -> Option<HookEvent> {
        match s.to_lowercase().as_str() {
            "pretooluse" | "pre-tool-use" | "pre_tool_use" => Some(HookEvent::PreToolUse),
            "posttooluse" | "post-tool-use" | "post_tool_use" => Some(HookEvent::PostToolUse),
            _ => None,
        }
    }
}

/// Raw JSON input from host hook stdin.
/// Kept as a serde_json::Value so each handler destructures only the
/// fields it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookInput {
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl HookInput {
    /// The `tool_name` field, empty string if absent.
    pub fn tool_name(&self) -> &str {
        self.data
            .get("tool_name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// The `tool_input` object, if present.
    pub fn tool_input(&self) -> Option<&serde_json::Value> {
        self.data.get("tool_input")
    }

    /// A string field of `tool_input`, empty string if absent.
    pub fn input_str(&self, key: &str) -> &str {
        self.tool_input()
            .and_then(|ti| ti.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

/// The verdict side of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Block,
}

/// Verdict written to stdout: a decision plus an optional human-readable
/// reason. Approvals may carry a reason (advisory warnings); blocks always
/// do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn approve() -> Self {
        Self {
            decision: Decision::Approve,
            reason: None,
        }
    }

    pub fn approve_with(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Approve,
            reason: Some(reason.into()),
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Block,
            reason: Some(reason.into()),
        }
    }

    pub fn is_block(&self) -> bool {
        self.decision == Decision::Block
    }

    /// Exit code convention: 0 = approve, 1 = block.
    pub fn exit_code(&self) -> i32 {
        match self.decision {
            Decision::Approve => 0,
            Decision::Block => 1,
        }
    }

    /// Serialize to the stdout JSON line.
    pub fn to_stdout(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"decision":"approve"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_event_from_arg_all_spellings() {
        assert_eq!(HookEvent::from_arg("PreToolUse"), Some(HookEvent::PreToolUse));
        assert_eq!(HookEvent::from_arg("pre-tool-use"), Some(HookEvent::PreToolUse));
        assert_eq!(HookEvent::from_arg("pre_tool_use"), Some(HookEvent::PreToolUse));
        assert_eq!(HookEvent::from_arg("PostToolUse"), Some(HookEvent::PostToolUse));
        assert_eq!(HookEvent::from_arg("post-tool-use"), Some(HookEvent::PostToolUse));
        assert_eq!(HookEvent::from_arg("post_tool_use"), Some(HookEvent::PostToolUse));
        assert_eq!(HookEvent::from_arg("bogus"), None);
        assert_eq!(HookEvent::from_arg(""), None);
    }

    #[test]
    fn test_hook_input_accessors() {
        let json_str = r#"{"tool_name":"Bash","tool_input":{"command":"ls"}}"#;
        let input: HookInput = serde_json::from_str(json_str).unwrap();
        assert_eq!(input.tool_name(), "Bash");
        assert_eq!(input.input_str("command"), "ls");
        assert_eq!(input.input_str("file_path"), "");
    }

    #[test]
    fn test_hook_input_missing_fields() {
        let input: HookInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.tool_name(), "");
        assert!(input.tool_input().is_none());
        assert_eq!(input.input_str("command"), "");
    }

    #[test]
    fn test_verdict_constructors() {
        let a = Verdict::approve();
        assert_eq!(a.exit_code(), 0);
        assert!(a.reason.is_none());

        let w = Verdict::approve_with("heads up");
        assert_eq!(w.exit_code(), 0);
        assert_eq!(w.reason.as_deref(), Some("heads up"));

        let b = Verdict::block("denied");
        assert!(b.is_block());
        assert_eq!(b.exit_code(), 1);
    }

    #[test]
    fn test_verdict_serialization() {
        let a = Verdict::approve();
        assert_eq!(a.to_stdout(), r#"{"decision":"approve"}"#);

        let b = Verdict::block("nope");
        let parsed: serde_json::Value = serde_json::from_str(&b.to_stdout()).unwrap();
        assert_eq!(parsed["decision"], "block");
        assert_eq!(parsed["reason"], "nope");
    }

    #[test]
    fn test_hook_event_serde_roundtrip() {
        let event = HookEvent::PreToolUse;
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, "\"PreToolUse\"");
        let back: HookEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HookEvent::PreToolUse);
    }
}
