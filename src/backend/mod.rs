//! The remote-invocation boundary.
//!
//! Blame computation, trace scanning, transcript parsing, and full-text
//! search all live behind this trait; the client only consumes the results.
//! The [`stdio`] implementation talks to a helper subprocess over
//! newline-delimited JSON. The *absence* of a configured channel is the
//! distinct `BackendUnavailable` condition, separate from a call that was
//! attempted and rejected.

pub mod stdio;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BlameLine, TimelineEvent, Transcript, TranscriptSummary};

pub use stdio::StdioBackend;

/// Response to `list_project_files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFiles {
    /// Relative file paths, sorted by the backend.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Response to `list_agent_touched_files`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentTouchedFiles {
    /// Relative paths of files with at least one recorded agent edit.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Response to `blame_file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlamedFile {
    /// The file that was blamed.
    pub file_path: String,
    /// Total line count.
    #[serde(default)]
    pub line_count: usize,
    /// Ordered lines, indexed 1..N with no gaps.
    #[serde(default)]
    pub lines: Vec<BlameLine>,
}

/// Response to `scan_traces`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceScan {
    /// Number of trace files found.
    #[serde(default)]
    pub trace_count: usize,
    /// Resolved trace directory, when known.
    #[serde(default)]
    pub trace_dir: Option<String>,
}

/// Response to `list_timeline`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinePage {
    /// Ordered events as returned by the backend; never re-sorted here.
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    /// Total matching events, which may exceed `events.len()`.
    #[serde(default)]
    pub total_count: usize,
}

/// Response to `list_transcripts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptPage {
    /// Ordered transcript summaries.
    #[serde(default)]
    pub transcripts: Vec<TranscriptSummary>,
    /// Total transcripts, which may exceed `transcripts.len()`.
    #[serde(default)]
    pub total_count: usize,
}

/// One match snippet inside a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSnippet {
    /// Kind of the content block the match was found in.
    #[serde(default)]
    pub block_type: String,
    /// Matching text excerpt.
    #[serde(default)]
    pub snippet: String,
    /// Role of the containing message.
    #[serde(default)]
    pub role: Option<String>,
    /// Timestamp of the containing message.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One matching transcript with its snippets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Summary of the matching transcript.
    pub transcript: TranscriptSummary,
    /// Ordered match snippets.
    #[serde(default)]
    pub matches: Vec<SearchSnippet>,
}

/// Response to `search_transcripts`.
///
/// While active this is a complete replacement of the transcript list's
/// render source; it is cleared, not merged, when the query drops below the
/// minimum length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total matching transcripts.
    #[serde(default)]
    pub total_matches: usize,
    /// Ordered matches.
    #[serde(default)]
    pub matching_transcripts: Vec<SearchMatch>,
}

/// Backend collaborator operations consumed by the client.
///
/// All calls are asynchronous and may fail with `RequestFailed`; preflight
/// conditions (`BackendUnavailable`, `NoProjectSelected`) are checked by the
/// caller before a call is issued.
pub trait Backend {
    /// Map each line of `file_path` to the agent edit that last touched it.
    fn blame_file(
        &self,
        project_dir: &str,
        file_path: &str,
    ) -> impl std::future::Future<Output = Result<BlamedFile>>;

    /// Enumerate the project's files.
    fn list_project_files(
        &self,
        project_dir: &str,
    ) -> impl std::future::Future<Output = Result<ProjectFiles>>;

    /// Enumerate files with at least one recorded agent edit.
    fn list_agent_touched_files(
        &self,
        project_dir: &str,
    ) -> impl std::future::Future<Output = Result<AgentTouchedFiles>>;

    /// Count trace files for the project (or the default trace location).
    fn scan_traces(
        &self,
        project_dir: Option<&str>,
    ) -> impl std::future::Future<Output = Result<TraceScan>>;

    /// List recorded edit events, newest first, bounded by `limit`.
    fn list_timeline(
        &self,
        project_dir: &str,
        limit: usize,
        skip_noise: bool,
    ) -> impl std::future::Future<Output = Result<TimelinePage>>;

    /// List transcript summaries, bounded by `limit`.
    fn list_transcripts(
        &self,
        project_dir: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<TranscriptPage>>;

    /// Fetch a full transcript by session identifier or trace path.
    fn get_transcript(
        &self,
        session_or_path: &str,
        project_dir: &str,
    ) -> impl std::future::Future<Output = Result<Transcript>>;

    /// Search all transcripts' content for `query`.
    fn search_transcripts(
        &self,
        project_dir: &str,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<SearchResults>>;
}
