//! Transcript content blocks.
//!
//! A closed sum type over the block kinds the backend emits. Both the search
//! predicate and the render path dispatch on it with exhaustive matches;
//! kinds the backend grows later land in [`ContentBlock::Unknown`] and are
//! matched and rendered through their full JSON serialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content block within a transcript message.
///
/// Order within a message is preserved; blocks are never reordered or merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Natural language text.
    Text {
        /// The text content.
        text: String,
    },

    /// Extended reasoning.
    Thinking {
        /// Reasoning text.
        thinking: String,
    },

    /// Tool invocation request.
    ToolUse {
        /// Tool name.
        name: String,
        /// Tool input parameters.
        #[serde(default)]
        input: Value,
    },

    /// Tool execution outcome.
    ToolResult {
        /// Result content.
        #[serde(default)]
        content: String,
        /// Whether the tool reported an error.
        #[serde(default)]
        is_error: bool,
    },

    /// A recorded file operation.
    FileOperation {
        /// Operation kind, e.g. "create" or "edit".
        operation: String,
        /// File the operation touched.
        file_path: String,
    },

    /// A shell command with optional captured output.
    Command {
        /// The command line.
        command: String,
        /// Captured output, when recorded.
        #[serde(default)]
        output: Option<String>,
    },

    /// A code snippet.
    Code {
        /// The code text.
        code: String,
    },

    /// Any block kind this client does not know.
    #[serde(untagged)]
    Unknown(Value),
}

impl ContentBlock {
    /// The wire name of this block kind.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Thinking { .. } => "thinking",
            Self::ToolUse { .. } => "tool_use",
            Self::ToolResult { .. } => "tool_result",
            Self::FileOperation { .. } => "file_operation",
            Self::Command { .. } => "command",
            Self::Code { .. } => "code",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Case-insensitive substring match of `query` against this block's
    /// textual fields. An empty query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        let hit = |s: &str| s.to_lowercase().contains(&needle);

        match self {
            Self::Text { text } => hit(text),
            Self::Thinking { thinking } => hit(thinking),
            Self::ToolUse { name, input } => hit(name) || hit(&input.to_string()),
            Self::ToolResult { content, .. } => hit(content),
            Self::FileOperation { file_path, .. } => hit(file_path),
            Self::Command { command, output } => {
                hit(command) || output.as_deref().is_some_and(hit)
            }
            Self::Code { code } => hit(code),
            Self::Unknown(value) => hit(&value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tagged_deserialization() {
        let block: ContentBlock =
            serde_json::from_str(r#"{"type":"text","text":"hi"}"#).unwrap();
        assert_eq!(block, ContentBlock::Text { text: "hi".to_string() });

        let block: ContentBlock = serde_json::from_str(
            r#"{"type":"tool_use","name":"Edit","input":{"file_path":"x.py"}}"#,
        )
        .unwrap();
        assert_eq!(block.type_name(), "tool_use");
    }

    #[test]
    fn test_unknown_kind_falls_through() {
        let block: ContentBlock =
            serde_json::from_str(r#"{"type":"hologram","payload":42}"#).unwrap();
        assert_eq!(block.type_name(), "unknown");
        assert!(block.matches("hologram"));
        assert!(block.matches("42"));
    }

    #[test]
    fn test_matches_empty_query_is_true() {
        let block = ContentBlock::Code { code: "let x = 1;".to_string() };
        assert!(block.matches(""));
    }

    #[test]
    fn test_matches_is_case_insensitive_per_kind() {
        assert!(ContentBlock::Text { text: "Deploy Done".to_string() }.matches("deploy"));
        assert!(ContentBlock::Thinking { thinking: "check DNS".to_string() }.matches("dns"));
        assert!(ContentBlock::ToolUse {
            name: "Bash".to_string(),
            input: json!({"command": "cargo fmt"})
        }
        .matches("cargo"));
        assert!(ContentBlock::Command {
            command: "ls".to_string(),
            output: Some("main.rs".to_string())
        }
        .matches("MAIN"));
        assert!(ContentBlock::FileOperation {
            operation: "edit".to_string(),
            file_path: "src/App.tsx".to_string()
        }
        .matches("app.tsx"));
        assert!(!ContentBlock::Code { code: "let x = 1;".to_string() }.matches("deploy"));
    }
}
