//! Session state store.
//!
//! One [`SessionState`] value owns everything project-scoped: the file list,
//! the agent-touched set, blame detail, timeline page, transcript index, the
//! current transcript, both search queries, and the cross-session result set.
//! It is mutated only on the control thread, so there is no lock; staleness
//! checks substitute for cancellation.
//!
//! Every load keyed by a changeable selector goes through a `begin_*` /
//! `complete_*` pair. `begin_*` bumps a generation counter and hands back a
//! ticket capturing it; `complete_*` commits only while the ticket is still
//! current. Switching projects bumps every counter, so a response for the
//! previous project is discarded no matter when it arrives.

use std::collections::HashSet;

use tracing::debug;

use crate::backend::SearchResults;
use crate::model::{BlameLine, Project, TimelineEvent, Transcript, TranscriptSummary};
use crate::text::MIN_QUERY_LEN;

/// Default cap on timeline events requested per load.
pub const DEFAULT_TIMELINE_LIMIT: usize = 50;
/// Default cap on transcript summaries requested per load.
pub const DEFAULT_TRANSCRIPT_LIMIT: usize = 50;
/// Default cap on matching transcripts requested per search.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// The single active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// File list plus per-line attribution.
    #[default]
    Blame,
    /// Recorded edit events.
    Timeline,
    /// Transcript index, search, and the open transcript.
    Transcripts,
    /// Recent projects and the home-directory override.
    Settings,
}

/// Lifecycle of one view's data.
///
/// The two preflight conditions are states of their own so the views can
/// render a dedicated message instead of the generic failure path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Data committed.
    Loaded,
    /// No backend channel is configured.
    BackendMissing,
    /// No project is selected.
    NoProject,
    /// The backend rejected the call.
    Failed(String),
}

/// Ticket for a load whose only selector is the active project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Ticket for a blame request, pinned to the file it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameTicket {
    generation: u64,
    file: String,
}

/// Ticket for a transcript open, pinned to the requested session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTicket {
    generation: u64,
    session: String,
}

/// Ticket for a cross-session search, pinned to the query it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    /// The query this search was issued for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// All client-side state for one session of the tool.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Active project. Exactly one at a time.
    pub project: Option<Project>,
    /// Active view.
    pub view: View,

    /// Project file list, backend order preserved.
    pub files: Vec<String>,
    /// Paths with at least one recorded agent edit.
    pub agent_touched: HashSet<String>,
    /// Show only agent-touched files.
    pub agent_touched_only: bool,
    /// Substring filter over the file list. No minimum length.
    pub file_filter: String,
    pub files_state: LoadState,

    /// Selected file in the blame view.
    pub selected_file: Option<String>,
    /// Blamed lines of the selected file, indexed 1..N.
    pub blame_lines: Vec<BlameLine>,
    /// Selected line number within `blame_lines`.
    pub selected_line: Option<usize>,
    pub blame_state: LoadState,

    pub timeline_events: Vec<TimelineEvent>,
    /// Total matching events; may exceed `timeline_events.len()`.
    pub timeline_total: usize,
    pub timeline_limit: usize,
    /// Ask the backend to drop noise events (vendored deps, lockfiles).
    pub skip_noise: bool,
    pub timeline_state: LoadState,

    pub transcripts: Vec<TranscriptSummary>,
    pub transcripts_total: usize,
    pub transcript_limit: usize,
    pub transcripts_state: LoadState,

    /// The one resident transcript.
    pub current_transcript: Option<Transcript>,
    /// Selected summary in the transcript index.
    pub selected_transcript: Option<String>,
    pub transcript_state: LoadState,

    /// Client-side filter over the open transcript's messages.
    pub transcript_query: String,
    /// Backend full-text search over all transcripts.
    pub cross_session_query: String,
    /// Result set superseding the transcript index while present.
    pub search_results: Option<SearchResults>,

    /// One-line status surfaced in the footer.
    pub status: Option<String>,

    files_gen: u64,
    blame_gen: u64,
    timeline_gen: u64,
    transcripts_gen: u64,
    transcript_gen: u64,
    search_gen: u64,
}

impl SessionState {
    /// A fresh store with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent_touched_only: true,
            timeline_limit: DEFAULT_TIMELINE_LIMIT,
            transcript_limit: DEFAULT_TRANSCRIPT_LIMIT,
            skip_noise: true,
            ..Self::default()
        }
    }

    /// Switch the active project, invalidating every project-scoped field
    /// in one step. In-flight loads for the old project become stale.
    pub fn set_project(&mut self, project: Option<Project>) {
        self.project = project;

        self.files.clear();
        self.agent_touched.clear();
        self.file_filter.clear();
        self.files_state = LoadState::Idle;

        self.selected_file = None;
        self.blame_lines.clear();
        self.selected_line = None;
        self.blame_state = LoadState::Idle;

        self.timeline_events.clear();
        self.timeline_total = 0;
        self.timeline_state = LoadState::Idle;

        self.transcripts.clear();
        self.transcripts_total = 0;
        self.transcripts_state = LoadState::Idle;

        self.current_transcript = None;
        self.selected_transcript = None;
        self.transcript_state = LoadState::Idle;
        self.search_results = None;

        self.files_gen += 1;
        self.blame_gen += 1;
        self.timeline_gen += 1;
        self.transcripts_gen += 1;
        self.transcript_gen += 1;
        self.search_gen += 1;
    }

    /// Path of the active project, when one is selected.
    #[must_use]
    pub fn project_dir(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.path.as_str())
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // --- file list ---------------------------------------------------------

    pub fn begin_files(&mut self) -> LoadTicket {
        self.files_gen += 1;
        self.files_state = LoadState::Loading;
        LoadTicket(self.files_gen)
    }

    /// Commit a file-list load. The agent-touched fetch may have degraded to
    /// an empty set; that is not an error here. Clears the text filter.
    pub fn complete_files(
        &mut self,
        ticket: LoadTicket,
        files: Vec<String>,
        agent_touched: HashSet<String>,
    ) -> bool {
        if ticket.0 != self.files_gen {
            debug!("discarding stale file-list response");
            return false;
        }
        self.files = files;
        self.agent_touched = agent_touched;
        self.file_filter.clear();
        self.files_state = LoadState::Loaded;
        true
    }

    pub fn fail_files(&mut self, ticket: LoadTicket, state: LoadState) -> bool {
        if ticket.0 != self.files_gen {
            return false;
        }
        self.files_state = state;
        true
    }

    // --- blame -------------------------------------------------------------

    /// Start a blame request for `file`. Deselects the previous file first,
    /// so there is never an intermediate state with two selections.
    pub fn begin_blame(&mut self, file: &str) -> BlameTicket {
        self.blame_gen += 1;
        self.selected_file = Some(file.to_string());
        self.blame_lines.clear();
        self.selected_line = None;
        self.blame_state = LoadState::Loading;
        BlameTicket {
            generation: self.blame_gen,
            file: file.to_string(),
        }
    }

    pub fn complete_blame(&mut self, ticket: &BlameTicket, lines: Vec<BlameLine>) -> bool {
        if ticket.generation != self.blame_gen
            || self.selected_file.as_deref() != Some(ticket.file.as_str())
        {
            debug!(file = %ticket.file, "discarding stale blame response");
            return false;
        }
        self.blame_lines = lines;
        self.blame_state = LoadState::Loaded;
        true
    }

    pub fn fail_blame(&mut self, ticket: &BlameTicket, state: LoadState) -> bool {
        if ticket.generation != self.blame_gen {
            return false;
        }
        self.blame_state = state;
        true
    }

    /// Select a line in the blamed file. Pure and synchronous.
    pub fn select_line(&mut self, line_no: usize) {
        if self.blame_lines.iter().any(|l| l.line_no == line_no) {
            self.selected_line = Some(line_no);
        }
    }

    // --- timeline ----------------------------------------------------------

    pub fn begin_timeline(&mut self) -> LoadTicket {
        self.timeline_gen += 1;
        self.timeline_state = LoadState::Loading;
        LoadTicket(self.timeline_gen)
    }

    pub fn complete_timeline(
        &mut self,
        ticket: LoadTicket,
        events: Vec<TimelineEvent>,
        total: usize,
    ) -> bool {
        if ticket.0 != self.timeline_gen {
            debug!("discarding stale timeline response");
            return false;
        }
        self.timeline_events = events;
        self.timeline_total = total;
        self.timeline_state = LoadState::Loaded;
        true
    }

    pub fn fail_timeline(&mut self, ticket: LoadTicket, state: LoadState) -> bool {
        if ticket.0 != self.timeline_gen {
            return false;
        }
        self.timeline_state = state;
        true
    }

    // --- transcript index --------------------------------------------------

    pub fn begin_transcripts(&mut self) -> LoadTicket {
        self.transcripts_gen += 1;
        self.transcripts_state = LoadState::Loading;
        LoadTicket(self.transcripts_gen)
    }

    /// Commit a transcript-index load. An active cross-session query keeps
    /// its result set; a reload must not cancel an in-flight search intent.
    pub fn complete_transcripts(
        &mut self,
        ticket: LoadTicket,
        transcripts: Vec<TranscriptSummary>,
        total: usize,
    ) -> bool {
        if ticket.0 != self.transcripts_gen {
            debug!("discarding stale transcript-index response");
            return false;
        }
        self.transcripts = transcripts;
        self.transcripts_total = total;
        self.transcripts_state = LoadState::Loaded;
        if !self.has_active_search_query() {
            self.search_results = None;
        }
        true
    }

    pub fn fail_transcripts(&mut self, ticket: LoadTicket, state: LoadState) -> bool {
        if ticket.0 != self.transcripts_gen {
            return false;
        }
        self.transcripts_state = state;
        true
    }

    // --- open transcript ---------------------------------------------------

    /// Start opening a transcript. Deselects the previous one first.
    pub fn begin_transcript_open(&mut self, session: &str) -> TranscriptTicket {
        self.transcript_gen += 1;
        self.selected_transcript = Some(session.to_string());
        self.current_transcript = None;
        self.transcript_state = LoadState::Loading;
        TranscriptTicket {
            generation: self.transcript_gen,
            session: session.to_string(),
        }
    }

    /// Commit an opened transcript. An active cross-session query is copied
    /// into the in-transcript query so filtering applies immediately;
    /// otherwise the in-transcript query resets.
    pub fn complete_transcript_open(
        &mut self,
        ticket: &TranscriptTicket,
        transcript: Transcript,
    ) -> bool {
        if ticket.generation != self.transcript_gen
            || self.selected_transcript.as_deref() != Some(ticket.session.as_str())
        {
            debug!(session = %ticket.session, "discarding stale transcript response");
            return false;
        }
        if self.has_active_search_query() {
            self.transcript_query = self.cross_session_query.trim().to_string();
        } else {
            self.transcript_query.clear();
        }
        self.current_transcript = Some(transcript);
        self.transcript_state = LoadState::Loaded;
        true
    }

    pub fn fail_transcript_open(&mut self, ticket: &TranscriptTicket, state: LoadState) -> bool {
        if ticket.generation != self.transcript_gen {
            return false;
        }
        self.transcript_state = state;
        true
    }

    /// Drop the open transcript and return to the index.
    pub fn close_transcript(&mut self) {
        self.transcript_gen += 1;
        self.current_transcript = None;
        self.selected_transcript = None;
        self.transcript_query.clear();
        self.transcript_state = LoadState::Idle;
    }

    // --- cross-session search ----------------------------------------------

    /// Whether the cross-session query is long enough to search and
    /// highlight with.
    #[must_use]
    pub fn has_active_search_query(&self) -> bool {
        self.cross_session_query.trim().chars().count() >= MIN_QUERY_LEN
    }

    /// Start a cross-session search for the current query.
    ///
    /// Returns `None`, and clears any existing result set, when the trimmed
    /// query is below the minimum length; the unfiltered index shows again.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        self.search_gen += 1;
        let query = self.cross_session_query.trim().to_string();
        if query.chars().count() < MIN_QUERY_LEN {
            self.search_results = None;
            return None;
        }
        Some(SearchTicket {
            generation: self.search_gen,
            query,
        })
    }

    /// Commit a search result set. Stale if the generation moved on or the
    /// query has since been edited; an older query's response must never
    /// overwrite a newer query's display.
    pub fn complete_search(&mut self, ticket: &SearchTicket, results: SearchResults) -> bool {
        if ticket.generation != self.search_gen
            || ticket.query != self.cross_session_query.trim()
        {
            debug!(query = %ticket.query, "discarding stale search response");
            return false;
        }
        self.search_results = Some(results);
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::backend::SearchResults;
    use crate::model::{Attribution, TranscriptMeta};

    use super::*;

    fn project(path: &str) -> Project {
        Project::from_path(path)
    }

    fn blame_line(line_no: usize, session: &str) -> BlameLine {
        BlameLine {
            line_no,
            text: "x".to_string(),
            meta: Some(Attribution {
                model: "gpt".to_string(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
                session_id: session.to_string(),
                agent_tool: String::new(),
                agent_version: None,
            }),
        }
    }

    fn transcript(session: &str) -> Transcript {
        Transcript {
            meta: TranscriptMeta {
                session_id: session.to_string(),
                agent_tool: "claude-code".to_string(),
                agent_version: None,
                cwd: None,
                git_branch: None,
                slug: None,
                start_time: String::new(),
                end_time: None,
                source_file: None,
            },
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_later_file_selection_wins_regardless_of_arrival_order() {
        let mut state = SessionState::new();
        state.set_project(Some(project("/p")));

        let ticket_a = state.begin_blame("a.py");
        let ticket_b = state.begin_blame("b.py");

        // b's response lands first, then a's stale one.
        assert!(state.complete_blame(&ticket_b, vec![blame_line(1, "s-b")]));
        assert!(!state.complete_blame(&ticket_a, vec![blame_line(1, "s-a")]));

        assert_eq!(state.selected_file.as_deref(), Some("b.py"));
        let meta = state.blame_lines[0].meta.as_ref().unwrap();
        assert_eq!(meta.session_id, "s-b");

        // Same race, opposite arrival order.
        let ticket_a = state.begin_blame("a.py");
        let ticket_b = state.begin_blame("b.py");
        assert!(!state.complete_blame(&ticket_a, vec![blame_line(1, "s-a")]));
        assert!(state.complete_blame(&ticket_b, vec![blame_line(1, "s-b")]));
        assert_eq!(state.selected_file.as_deref(), Some("b.py"));
    }

    #[test]
    fn test_project_switch_discards_in_flight_loads() {
        let mut state = SessionState::new();
        state.set_project(Some(project("/old")));

        let files = state.begin_files();
        let timeline = state.begin_timeline();

        state.set_project(Some(project("/new")));

        assert!(!state.complete_files(files, vec!["a.py".to_string()], HashSet::new()));
        assert!(!state.complete_timeline(timeline, vec![TimelineEvent::default()], 1));
        assert!(state.files.is_empty());
        assert!(state.timeline_events.is_empty());
        assert_eq!(state.files_state, LoadState::Idle);
    }

    #[test]
    fn test_stale_search_never_overwrites_newer_query() {
        let mut state = SessionState::new();
        state.set_project(Some(project("/p")));

        state.cross_session_query = "deploy".to_string();
        let old = state.begin_search().unwrap();

        state.cross_session_query = "rollback".to_string();
        let new = state.begin_search().unwrap();

        let mut old_results = SearchResults::default();
        old_results.total_matches = 7;
        assert!(!state.complete_search(&old, old_results));
        assert!(state.search_results.is_none());

        let mut new_results = SearchResults::default();
        new_results.total_matches = 2;
        assert!(state.complete_search(&new, new_results));
        assert_eq!(state.search_results.as_ref().unwrap().total_matches, 2);
    }

    #[test]
    fn test_editing_query_after_issue_discards_response() {
        let mut state = SessionState::new();
        state.cross_session_query = "deploy".to_string();
        let ticket = state.begin_search().unwrap();

        // Same generation would match, but the query text moved on.
        state.cross_session_query = "deployment".to_string();
        assert!(!state.complete_search(&ticket, SearchResults::default()));
    }

    #[test]
    fn test_short_query_clears_results_and_skips_search() {
        let mut state = SessionState::new();
        state.cross_session_query = "deploy".to_string();
        let ticket = state.begin_search().unwrap();
        assert!(state.complete_search(&ticket, SearchResults::default()));
        assert!(state.search_results.is_some());

        state.cross_session_query = "d".to_string();
        assert!(state.begin_search().is_none());
        assert!(state.search_results.is_none());
    }

    #[test]
    fn test_index_reload_preserves_results_while_query_active() {
        let mut state = SessionState::new();
        state.cross_session_query = "deploy".to_string();
        state.search_results = Some(SearchResults::default());

        let ticket = state.begin_transcripts();
        assert!(state.complete_transcripts(ticket, Vec::new(), 0));
        assert!(state.search_results.is_some());

        state.cross_session_query.clear();
        let ticket = state.begin_transcripts();
        assert!(state.complete_transcripts(ticket, Vec::new(), 0));
        assert!(state.search_results.is_none());
    }

    #[test]
    fn test_open_transcript_copies_active_query() {
        let mut state = SessionState::new();
        state.cross_session_query = "  deploy ".to_string();

        let ticket = state.begin_transcript_open("s1");
        assert!(state.complete_transcript_open(&ticket, transcript("s1")));
        assert_eq!(state.transcript_query, "deploy");

        // Without an active query the in-transcript query resets.
        state.cross_session_query.clear();
        state.transcript_query = "leftover".to_string();
        let ticket = state.begin_transcript_open("s2");
        assert!(state.complete_transcript_open(&ticket, transcript("s2")));
        assert_eq!(state.transcript_query, "");
    }

    #[test]
    fn test_later_transcript_open_wins() {
        let mut state = SessionState::new();
        let t1 = state.begin_transcript_open("s1");
        let t2 = state.begin_transcript_open("s2");

        assert!(state.complete_transcript_open(&t2, transcript("s2")));
        assert!(!state.complete_transcript_open(&t1, transcript("s1")));
        let meta = &state.current_transcript.as_ref().unwrap().meta;
        assert_eq!(meta.session_id, "s2");
    }

    #[test]
    fn test_select_line_requires_existing_line() {
        let mut state = SessionState::new();
        let ticket = state.begin_blame("a.py");
        state.complete_blame(&ticket, vec![blame_line(1, "s1"), blame_line(2, "s1")]);

        state.select_line(2);
        assert_eq!(state.selected_line, Some(2));
        state.select_line(99);
        assert_eq!(state.selected_line, Some(2));
    }

    #[test]
    fn test_stale_failure_does_not_clobber_state() {
        let mut state = SessionState::new();
        let old = state.begin_timeline();
        let new = state.begin_timeline();
        assert!(state.complete_timeline(new, Vec::new(), 0));
        assert!(!state.fail_timeline(old, LoadState::Failed("boom".to_string())));
        assert_eq!(state.timeline_state, LoadState::Loaded);
    }
}
