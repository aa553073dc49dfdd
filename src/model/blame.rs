//! Blamed-line payloads returned by the backend.

use serde::{Deserialize, Serialize};

/// The recorded agent edit responsible for a line of code.
///
/// `session_id` is a weak reference into the transcript space used for
/// cross-navigation; it is never dereferenced locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Model identifier recorded with the edit.
    pub model: String,
    /// Edit timestamp (RFC 3339 as produced by the backend).
    pub timestamp: String,
    /// Session the edit belongs to.
    pub session_id: String,
    /// Agent tool that performed the edit.
    #[serde(default)]
    pub agent_tool: String,
    /// Agent tool version, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
}

impl Attribution {
    /// Short badge label: the first whitespace/hyphen-separated token of the
    /// model name (e.g. "claude" out of "claude-opus-4").
    #[must_use]
    pub fn badge(&self) -> &str {
        self.model
            .split(|c: char| c.is_whitespace() || c == '-')
            .next()
            .unwrap_or(&self.model)
    }

    /// The session reference, if usable for navigation.
    #[must_use]
    pub fn session_ref(&self) -> Option<&str> {
        let id = self.session_id.trim();
        (!id.is_empty() && id != "—").then_some(id)
    }
}

/// One line of a blamed file.
///
/// A full blamed file is an ordered sequence indexed 1..N with no gaps;
/// `meta` is present only when a recorded edit produced the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameLine {
    /// 1-based line number.
    pub line_no: usize,
    /// Line text as currently on disk.
    pub text: String,
    /// Attribution, absent for lines with no recorded edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Attribution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(model: &str, session: &str) -> Attribution {
        Attribution {
            model: model.to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            session_id: session.to_string(),
            agent_tool: "claude-code".to_string(),
            agent_version: None,
        }
    }

    #[test]
    fn test_badge_is_first_model_token() {
        assert_eq!(attr("claude-opus-4", "s1").badge(), "claude");
        assert_eq!(attr("gpt 4o", "s1").badge(), "gpt");
        assert_eq!(attr("solo", "s1").badge(), "solo");
    }

    #[test]
    fn test_session_ref_rejects_placeholder() {
        assert_eq!(attr("m", "s1").session_ref(), Some("s1"));
        assert_eq!(attr("m", "").session_ref(), None);
        assert_eq!(attr("m", "—").session_ref(), None);
        assert_eq!(attr("m", "  ").session_ref(), None);
    }
}
