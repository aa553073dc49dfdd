//! Transcript payloads: summaries, metadata, and full message sequences.

use serde::{Deserialize, Serialize};

use super::content::ContentBlock;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Human turn.
    User,
    /// Agent turn.
    Assistant,
    /// Injected system turn.
    System,
}

impl Role {
    /// Lowercase wire/display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// Token accounting attached to a message, when the backend recorded it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens.
    #[serde(default)]
    pub input_tokens: Option<u64>,
    /// Output tokens.
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

/// A single transcript message: a role plus an ordered block sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable message identifier.
    #[serde(default)]
    pub id: String,
    /// Author role.
    pub role: Role,
    /// Message timestamp (RFC 3339).
    #[serde(default)]
    pub timestamp: String,
    /// Ordered content blocks; never reordered or merged.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Model that produced the message, for assistant turns.
    #[serde(default)]
    pub model: Option<String>,
    /// Token accounting, when recorded.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl Message {
    /// Case-insensitive substring match against role, model, or any block.
    /// An empty query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.role.as_str().contains(&needle) {
            return true;
        }
        if let Some(model) = &self.model {
            if model.to_lowercase().contains(&needle) {
                return true;
            }
        }
        self.content.iter().any(|block| block.matches(query))
    }
}

/// One row in the transcript index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    /// Unique, stable session identifier.
    pub session_id: String,
    /// Agent tool that produced the session.
    #[serde(default)]
    pub agent_tool: String,
    /// Human-readable slug, when the trace carried one.
    #[serde(default)]
    pub slug: Option<String>,
    /// Session start time (RFC 3339).
    #[serde(default)]
    pub start_time: String,
    /// Session end time, when known.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Number of messages in the session.
    #[serde(default)]
    pub message_count: usize,
    /// Number of distinct files the session touched.
    #[serde(default)]
    pub files_touched: usize,
    /// Most-used model in the session, when known.
    #[serde(default)]
    pub primary_model: Option<String>,
    /// Trace file the session was parsed from.
    #[serde(default)]
    pub source_file: String,
}

impl TranscriptSummary {
    /// Display title: the slug when present, else a truncated session ID.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.is_empty() => slug.clone(),
            _ => crate::text::truncate(&self.session_id, 12).into_owned(),
        }
    }
}

/// Session-level metadata on a full transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMeta {
    /// Unique, stable session identifier.
    pub session_id: String,
    /// Agent tool that produced the session.
    #[serde(default)]
    pub agent_tool: String,
    /// Agent tool version, when recorded.
    #[serde(default)]
    pub agent_version: Option<String>,
    /// Working directory recorded with the session.
    #[serde(default)]
    pub cwd: Option<String>,
    /// Git branch recorded with the session.
    #[serde(default)]
    pub git_branch: Option<String>,
    /// Human-readable slug, when the trace carried one.
    #[serde(default)]
    pub slug: Option<String>,
    /// Session start time (RFC 3339).
    #[serde(default)]
    pub start_time: String,
    /// Session end time, when known.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Trace file the session was parsed from.
    #[serde(default)]
    pub source_file: Option<String>,
}

/// A full transcript. At most one is resident in the client at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Session-level metadata.
    pub meta: TranscriptMeta,
    /// Ordered message sequence.
    #[serde(default)]
    pub messages: Vec<Message>,
}
