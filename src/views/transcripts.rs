//! Transcript browser and search engine.
//!
//! Two search paths feed one render path. The cross-session search is
//! backend-delegated and replaces the index list while its result set is
//! present; the in-transcript search is a client-side substring filter over
//! the one resident transcript's messages. A message either matches as a
//! whole or is dropped; its blocks are never filtered individually.

use tracing::warn;

use crate::backend::{Backend, SearchMatch};
use crate::model::{ContentBlock, Message, TranscriptSummary};
use crate::store::{LoadState, SessionState, DEFAULT_SEARCH_LIMIT};
use crate::text::{highlight, truncate};

/// Preview budgets, in codepoints, per block kind.
const THINKING_PREVIEW: usize = 500;
const TOOL_INPUT_PREVIEW: usize = 300;
const TOOL_RESULT_PREVIEW: usize = 300;
const COMMAND_OUTPUT_PREVIEW: usize = 300;
const CODE_PREVIEW: usize = 500;
/// Snippet budget and cap in the search result list.
const SNIPPET_PREVIEW: usize = 80;
const MAX_SNIPPETS: usize = 2;

/// One highlighted match excerpt in the result list.
#[derive(Debug, PartialEq, Eq)]
pub struct SnippetLine {
    pub block_type: String,
    pub text: String,
}

/// One row in the transcript index or result list.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRow<'a> {
    pub session_id: &'a str,
    pub title: String,
    pub agent_tool: &'a str,
    pub start_time: &'a str,
    pub message_count: usize,
    /// Match excerpts, present only for search result rows.
    pub snippets: Vec<SnippetLine>,
    pub selected: bool,
}

/// The transcript index pane: either the plain index or search results.
#[derive(Debug, PartialEq, Eq)]
pub struct TranscriptListView<'a> {
    pub rows: Vec<ListRow<'a>>,
    pub header: String,
    pub from_search: bool,
}

/// One rendered content block.
#[derive(Debug, PartialEq, Eq)]
pub struct BlockView {
    /// Wire name of the block kind.
    pub kind: &'static str,
    /// Kind-specific heading (tool name, operation, command line).
    pub heading: Option<String>,
    /// Truncated, escaped, and highlighted body text.
    pub body: String,
    pub is_error: bool,
}

/// One rendered message with all of its blocks.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageView<'a> {
    pub role: &'static str,
    pub timestamp: &'a str,
    pub model: Option<&'a str>,
    pub blocks: Vec<BlockView>,
}

/// The open-transcript pane.
#[derive(Debug, PartialEq, Eq)]
pub enum TranscriptView<'a> {
    /// No transcript is open.
    NotOpen,
    /// The transcript has no messages at all.
    NoMessages,
    /// The filter matched no message; distinct from an empty transcript.
    NoMatch { query: &'a str },
    Messages(Vec<MessageView<'a>>),
}

/// Load the transcript index for the active project.
pub async fn load_transcripts<B: Backend>(state: &mut SessionState, backend: Option<&B>) {
    let Some(backend) = backend else {
        state.transcripts_state = LoadState::BackendMissing;
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.transcripts_state = LoadState::NoProject;
        return;
    };

    let ticket = state.begin_transcripts();
    match backend.list_transcripts(&project, state.transcript_limit).await {
        Ok(page) => {
            state.complete_transcripts(ticket, page.transcripts, page.total_count);
        }
        Err(err) => {
            warn!(%err, "transcript index load failed");
            state.set_status(format!("Failed to load transcripts: {err}"));
            state.fail_transcripts(ticket, LoadState::Failed(err.to_string()));
        }
    }
}

/// Run a cross-session search for the store's current query.
///
/// A trimmed query below the minimum length clears any result set and issues
/// nothing. The caller is expected to have already debounced keystrokes.
pub async fn run_search<B: Backend>(state: &mut SessionState, backend: Option<&B>) {
    let Some(ticket) = state.begin_search() else {
        return;
    };
    let Some(backend) = backend else {
        state.set_status("Search requires the desktop backend");
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.set_status("Select a project to search");
        return;
    };

    match backend
        .search_transcripts(&project, ticket.query(), DEFAULT_SEARCH_LIMIT)
        .await
    {
        Ok(results) => {
            state.complete_search(&ticket, results);
        }
        Err(err) => {
            warn!(%err, query = ticket.query(), "search failed");
            state.set_status(format!("Search failed: {err}"));
        }
    }
}

/// Fetch a full transcript by session identifier or trace path and make it
/// current.
pub async fn open_transcript<B: Backend>(
    state: &mut SessionState,
    backend: Option<&B>,
    session_or_path: &str,
) {
    let Some(backend) = backend else {
        state.transcript_state = LoadState::BackendMissing;
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.transcript_state = LoadState::NoProject;
        return;
    };

    let ticket = state.begin_transcript_open(session_or_path);
    match backend.get_transcript(session_or_path, &project).await {
        Ok(transcript) => {
            state.complete_transcript_open(&ticket, transcript);
        }
        Err(err) => {
            warn!(%err, session = session_or_path, "transcript open failed");
            state.set_status(format!("Failed to open transcript: {err}"));
            state.fail_transcript_open(&ticket, LoadState::Failed(err.to_string()));
        }
    }
}

fn summary_row<'a>(
    summary: &'a TranscriptSummary,
    snippets: Vec<SnippetLine>,
    selected: bool,
) -> ListRow<'a> {
    ListRow {
        session_id: &summary.session_id,
        title: summary.title(),
        agent_tool: &summary.agent_tool,
        start_time: &summary.start_time,
        message_count: summary.message_count,
        snippets,
        selected,
    }
}

fn snippet_lines(search_match: &SearchMatch, query: &str) -> Vec<SnippetLine> {
    search_match
        .matches
        .iter()
        .take(MAX_SNIPPETS)
        .map(|snippet| SnippetLine {
            block_type: snippet.block_type.clone(),
            text: highlight(&truncate(&snippet.snippet, SNIPPET_PREVIEW), query),
        })
        .collect()
}

/// The index pane view model. A present search result set supersedes the
/// plain index entirely.
#[must_use]
pub fn transcript_list_view(state: &SessionState) -> TranscriptListView<'_> {
    let selected = state.selected_transcript.as_deref();

    if let Some(results) = &state.search_results {
        let query = state.cross_session_query.trim();
        let rows = results
            .matching_transcripts
            .iter()
            .map(|m| {
                summary_row(
                    &m.transcript,
                    snippet_lines(m, query),
                    selected == Some(m.transcript.session_id.as_str()),
                )
            })
            .collect();
        return TranscriptListView {
            rows,
            header: format!("{} matching transcripts", results.total_matches),
            from_search: true,
        };
    }

    let rows = state
        .transcripts
        .iter()
        .map(|summary| {
            summary_row(
                summary,
                Vec::new(),
                selected == Some(summary.session_id.as_str()),
            )
        })
        .collect();
    let shown = state.transcripts.len();
    let header = if state.transcripts_total > shown {
        format!("{shown} of {} transcripts", state.transcripts_total)
    } else {
        format!("{shown} transcripts")
    };
    TranscriptListView {
        rows,
        header,
        from_search: false,
    }
}

fn render_block(block: &ContentBlock, query: &str) -> BlockView {
    let kind = block.type_name();
    match block {
        ContentBlock::Text { text } => BlockView {
            kind,
            heading: None,
            body: highlight(text, query),
            is_error: false,
        },
        ContentBlock::Thinking { thinking } => BlockView {
            kind,
            heading: None,
            body: highlight(&truncate(thinking, THINKING_PREVIEW), query),
            is_error: false,
        },
        ContentBlock::ToolUse { name, input } => {
            let input_text = serde_json::to_string_pretty(input).unwrap_or_default();
            BlockView {
                kind,
                heading: Some(highlight(name, query)),
                body: highlight(&truncate(&input_text, TOOL_INPUT_PREVIEW), query),
                is_error: false,
            }
        }
        ContentBlock::ToolResult { content, is_error } => BlockView {
            kind,
            heading: None,
            body: highlight(&truncate(content, TOOL_RESULT_PREVIEW), query),
            is_error: *is_error,
        },
        ContentBlock::FileOperation {
            operation,
            file_path,
        } => BlockView {
            kind,
            heading: Some(highlight(operation, query)),
            body: highlight(file_path, query),
            is_error: false,
        },
        ContentBlock::Command { command, output } => BlockView {
            kind,
            heading: Some(highlight(command, query)),
            body: output
                .as_deref()
                .map(|out| highlight(&truncate(out, COMMAND_OUTPUT_PREVIEW), query))
                .unwrap_or_default(),
            is_error: false,
        },
        ContentBlock::Code { code } => BlockView {
            kind,
            heading: None,
            body: highlight(&truncate(code, CODE_PREVIEW), query),
            is_error: false,
        },
        ContentBlock::Unknown(value) => BlockView {
            kind,
            heading: None,
            body: highlight(&truncate(&value.to_string(), TOOL_RESULT_PREVIEW), query),
            is_error: false,
        },
    }
}

fn render_message<'a>(message: &'a Message, query: &str) -> MessageView<'a> {
    MessageView {
        role: message.role.as_str(),
        timestamp: &message.timestamp,
        model: message.model.as_deref(),
        blocks: message
            .content
            .iter()
            .map(|block| render_block(block, query))
            .collect(),
    }
}

/// The open-transcript view model, filtered and highlighted by the
/// in-transcript query.
///
/// Filtering applies for any non-empty query; highlighting disables itself
/// below the minimum query length. A matched message keeps all of its
/// blocks.
#[must_use]
pub fn transcript_view(state: &SessionState) -> TranscriptView<'_> {
    let Some(transcript) = &state.current_transcript else {
        return TranscriptView::NotOpen;
    };
    if transcript.messages.is_empty() {
        return TranscriptView::NoMessages;
    }

    let query = state.transcript_query.trim();
    let messages: Vec<MessageView<'_>> = transcript
        .messages
        .iter()
        .filter(|message| message.matches(query))
        .map(|message| render_message(message, query))
        .collect();

    if messages.is_empty() {
        TranscriptView::NoMatch { query }
    } else {
        TranscriptView::Messages(messages)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::backend::{SearchResults, SearchSnippet};
    use crate::model::{Project, Role, Transcript, TranscriptMeta};

    use super::*;

    fn summary(session: &str) -> TranscriptSummary {
        TranscriptSummary {
            session_id: session.to_string(),
            agent_tool: "claude-code".to_string(),
            slug: None,
            start_time: "2026-02-01T10:00:00Z".to_string(),
            end_time: None,
            message_count: 3,
            files_touched: 1,
            primary_model: None,
            source_file: String::new(),
        }
    }

    fn message(role: Role, blocks: Vec<ContentBlock>) -> Message {
        Message {
            id: String::new(),
            role,
            timestamp: "2026-02-01T10:00:00Z".to_string(),
            content: blocks,
            model: None,
            usage: None,
        }
    }

    fn open(state: &mut SessionState, messages: Vec<Message>) {
        let ticket = state.begin_transcript_open("s1");
        state.complete_transcript_open(
            &ticket,
            Transcript {
                meta: TranscriptMeta {
                    session_id: "s1".to_string(),
                    agent_tool: "claude-code".to_string(),
                    agent_version: None,
                    cwd: None,
                    git_branch: None,
                    slug: None,
                    start_time: String::new(),
                    end_time: None,
                    source_file: None,
                },
                messages,
            },
        );
    }

    #[test]
    fn test_search_results_supersede_index() {
        let mut state = SessionState::new();
        state.set_project(Some(Project::from_path("/p")));
        let ticket = state.begin_transcripts();
        state.complete_transcripts(ticket, vec![summary("s1"), summary("s2")], 2);

        state.cross_session_query = "deploy".to_string();
        let ticket = state.begin_search().unwrap();
        state.complete_search(
            &ticket,
            SearchResults {
                total_matches: 1,
                matching_transcripts: vec![SearchMatch {
                    transcript: summary("s2"),
                    matches: vec![
                        SearchSnippet {
                            block_type: "text".to_string(),
                            snippet: "about to deploy the fix".to_string(),
                            role: Some("assistant".to_string()),
                            timestamp: None,
                        },
                        SearchSnippet {
                            block_type: "command".to_string(),
                            snippet: "deploy --prod".to_string(),
                            role: None,
                            timestamp: None,
                        },
                        SearchSnippet {
                            block_type: "text".to_string(),
                            snippet: "third snippet is dropped".to_string(),
                            role: None,
                            timestamp: None,
                        },
                    ],
                }],
            },
        );

        let view = transcript_list_view(&state);
        assert!(view.from_search);
        assert_eq!(view.header, "1 matching transcripts");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].snippets.len(), 2);
        assert_eq!(
            view.rows[0].snippets[0].text,
            "about to <mark>deploy</mark> the fix"
        );
    }

    #[test]
    fn test_index_view_without_search() {
        let mut state = SessionState::new();
        let ticket = state.begin_transcripts();
        state.complete_transcripts(ticket, vec![summary("s1")], 5);

        let view = transcript_list_view(&state);
        assert!(!view.from_search);
        assert_eq!(view.header, "1 of 5 transcripts");
        assert!(view.rows[0].snippets.is_empty());
    }

    #[test]
    fn test_snippets_are_truncated_before_highlighting() {
        let long = format!("{} deploy", "x".repeat(200));
        let m = SearchMatch {
            transcript: summary("s1"),
            matches: vec![SearchSnippet {
                block_type: "text".to_string(),
                snippet: long,
                role: None,
                timestamp: None,
            }],
        };
        let lines = snippet_lines(&m, "deploy");
        // The match fell past the 80-codepoint cut, so nothing highlights.
        assert!(!lines[0].text.contains("<mark>"));
        assert!(lines[0].text.ends_with('…'));
    }

    #[test]
    fn test_transcript_view_states() {
        let mut state = SessionState::new();
        assert_eq!(transcript_view(&state), TranscriptView::NotOpen);

        open(&mut state, Vec::new());
        assert_eq!(transcript_view(&state), TranscriptView::NoMessages);

        open(
            &mut state,
            vec![message(
                Role::User,
                vec![ContentBlock::Text {
                    text: "hello".to_string(),
                }],
            )],
        );
        state.transcript_query = "deploy".to_string();
        assert_eq!(
            transcript_view(&state),
            TranscriptView::NoMatch { query: "deploy" }
        );
    }

    #[test]
    fn test_matched_message_keeps_all_blocks() {
        let mut state = SessionState::new();
        open(
            &mut state,
            vec![
                message(
                    Role::Assistant,
                    vec![
                        ContentBlock::Text {
                            text: "deploying now".to_string(),
                        },
                        ContentBlock::Code {
                            code: "fn unrelated() {}".to_string(),
                        },
                    ],
                ),
                message(
                    Role::User,
                    vec![ContentBlock::Text {
                        text: "unrelated".to_string(),
                    }],
                ),
            ],
        );
        state.transcript_query = "deploy".to_string();

        let TranscriptView::Messages(messages) = transcript_view(&state) else {
            panic!("expected messages");
        };
        assert_eq!(messages.len(), 1);
        // The non-matching code block rides along with its matched message.
        assert_eq!(messages[0].blocks.len(), 2);
        assert_eq!(messages[0].blocks[0].body, "<mark>deploy</mark>ing now");
        assert_eq!(messages[0].blocks[1].body, "fn unrelated() {}");
    }

    #[test]
    fn test_one_char_query_filters_without_highlighting() {
        let mut state = SessionState::new();
        open(
            &mut state,
            vec![
                message(
                    Role::User,
                    vec![ContentBlock::Text {
                        text: "zebra".to_string(),
                    }],
                ),
                message(
                    Role::User,
                    vec![ContentBlock::Text {
                        text: "apple".to_string(),
                    }],
                ),
            ],
        );
        state.transcript_query = "z".to_string();

        let TranscriptView::Messages(messages) = transcript_view(&state) else {
            panic!("expected messages");
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].blocks[0].body, "zebra");
    }

    #[test]
    fn test_render_block_truncates_per_kind() {
        let block = ContentBlock::Thinking {
            thinking: "t".repeat(600),
        };
        let view = render_block(&block, "");
        assert_eq!(view.body.chars().count(), THINKING_PREVIEW);

        let block = ContentBlock::ToolResult {
            content: "r".repeat(600),
            is_error: true,
        };
        let view = render_block(&block, "");
        assert_eq!(view.body.chars().count(), TOOL_RESULT_PREVIEW);
        assert!(view.is_error);
    }

    #[test]
    fn test_render_block_escapes_markup() {
        let block = ContentBlock::Text {
            text: "a < b".to_string(),
        };
        assert_eq!(render_block(&block, "").body, "a &lt; b");
    }
}
