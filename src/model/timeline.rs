//! Edit-timeline payloads returned by the backend.

use serde::{Deserialize, Serialize};

/// One recorded file-edit event.
///
/// Ordering is backend-provided; the client never re-sorts. Every field may
/// be absent except that the backend is trusted to order by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event timestamp (RFC 3339).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Edit action, e.g. "CREATED" or "EDITED".
    #[serde(default)]
    pub action: Option<String>,
    /// File the event touched, relative to the project directory.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Model recorded with the edit.
    #[serde(default)]
    pub model: Option<String>,
    /// Agent tool recorded with the edit.
    #[serde(default)]
    pub agent_tool: Option<String>,
    /// Agent tool version, when recorded.
    #[serde(default)]
    pub agent_version: Option<String>,
    /// Size of the change in bytes, when recorded.
    #[serde(default)]
    pub change_size: Option<usize>,
}

impl TimelineEvent {
    /// Combined agent label, "tool@version" when the version is known.
    #[must_use]
    pub fn agent_label(&self) -> Option<String> {
        let tool = self.agent_tool.as_deref()?;
        Some(match self.agent_version.as_deref() {
            Some(version) => format!("{tool}@{version}"),
            None => tool.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_label() {
        let mut event = TimelineEvent {
            agent_tool: Some("claude-code".to_string()),
            ..Default::default()
        };
        assert_eq!(event.agent_label().as_deref(), Some("claude-code"));

        event.agent_version = Some("2.1".to_string());
        assert_eq!(event.agent_label().as_deref(), Some("claude-code@2.1"));

        event.agent_tool = None;
        assert_eq!(event.agent_label(), None);
    }
}
