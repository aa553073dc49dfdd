//! Core data structures for the client layer.
//!
//! These mirror the backend's wire payloads: the client never computes blame
//! or parses traces itself, it only deserializes what the backend returns.

mod blame;
mod content;
mod project;
mod timeline;
mod transcript;

pub use blame::{Attribution, BlameLine};
pub use content::ContentBlock;
pub use project::Project;
pub use timeline::TimelineEvent;
pub use transcript::{
    Message, Role, TokenUsage, Transcript, TranscriptMeta, TranscriptSummary,
};
