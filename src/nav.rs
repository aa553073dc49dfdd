//! Cross-view navigation.
//!
//! Both bridges are strictly sequential: the target view's load completes
//! before a selection is attempted. A missing target degrades to a status
//! message, never a hard failure.

use tracing::debug;

use crate::backend::Backend;
use crate::store::{SessionState, View};
use crate::views::{blame, transcripts};

/// Timeline row → blame view, selecting `path` if the project lists it.
pub async fn go_to_file_in_blame<B: Backend>(
    state: &mut SessionState,
    backend: Option<&B>,
    path: &str,
) {
    state.set_view(View::Blame);
    blame::load_files(state, backend).await;

    if state.files.iter().any(|f| f == path) {
        blame::select_file(state, backend, path).await;
    } else {
        debug!(file = path, "navigation target not in file list");
        state.set_status(format!("File not in project list: {path}"));
    }
}

/// Blame line → transcript view, opening `session_id`.
///
/// Prefers selecting the matching summary from the loaded index; when the
/// session is outside the listed page, falls back to opening it directly.
pub async fn go_to_transcript<B: Backend>(
    state: &mut SessionState,
    backend: Option<&B>,
    session_id: &str,
) {
    state.set_view(View::Transcripts);
    transcripts::load_transcripts(state, backend).await;

    let listed = state
        .transcripts
        .iter()
        .any(|summary| summary.session_id == session_id);
    if !listed {
        debug!(session = session_id, "session not in listed page, opening directly");
    }
    transcripts::open_transcript(state, backend, session_id).await;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::backend::{
        AgentTouchedFiles, BlamedFile, ProjectFiles, SearchResults, TimelinePage, TraceScan,
        TranscriptPage,
    };
    use crate::error::{LensError, Result};
    use crate::model::{Project, Transcript, TranscriptMeta};

    use super::*;

    struct FixedBackend {
        files: Vec<String>,
    }

    impl Backend for FixedBackend {
        async fn blame_file(&self, _: &str, file_path: &str) -> Result<BlamedFile> {
            Ok(BlamedFile {
                file_path: file_path.to_string(),
                line_count: 0,
                lines: Vec::new(),
            })
        }

        async fn list_project_files(&self, _: &str) -> Result<ProjectFiles> {
            Ok(ProjectFiles {
                files: self.files.clone(),
            })
        }

        async fn list_agent_touched_files(&self, _: &str) -> Result<AgentTouchedFiles> {
            Ok(AgentTouchedFiles { files: Vec::new() })
        }

        async fn scan_traces(&self, _: Option<&str>) -> Result<TraceScan> {
            Ok(TraceScan::default())
        }

        async fn list_timeline(&self, _: &str, _: usize, _: bool) -> Result<TimelinePage> {
            Ok(TimelinePage::default())
        }

        async fn list_transcripts(&self, _: &str, _: usize) -> Result<TranscriptPage> {
            Ok(TranscriptPage::default())
        }

        async fn get_transcript(&self, session: &str, _: &str) -> Result<Transcript> {
            if session == "missing" {
                return Err(LensError::not_found(session));
            }
            Ok(Transcript {
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
            })
        }

        async fn search_transcripts(&self, _: &str, _: &str, _: usize) -> Result<SearchResults> {
            Ok(SearchResults::default())
        }
    }

    #[tokio::test]
    async fn test_go_to_file_selects_when_listed() {
        let backend = FixedBackend {
            files: vec!["x.py".to_string()],
        };
        let mut state = SessionState::new();
        state.set_project(Some(Project::from_path("/p")));

        go_to_file_in_blame(&mut state, Some(&backend), "x.py").await;
        assert_eq!(state.view, View::Blame);
        assert_eq!(state.selected_file.as_deref(), Some("x.py"));
    }

    #[tokio::test]
    async fn test_go_to_file_degrades_when_missing() {
        let backend = FixedBackend { files: Vec::new() };
        let mut state = SessionState::new();
        state.set_project(Some(Project::from_path("/p")));

        go_to_file_in_blame(&mut state, Some(&backend), "gone.py").await;
        assert_eq!(state.selected_file, None);
        assert!(state.status.as_deref().is_some_and(|s| s.contains("gone.py")));
    }

    #[tokio::test]
    async fn test_go_to_transcript_opens_unlisted_session_directly() {
        let backend = FixedBackend { files: Vec::new() };
        let mut state = SessionState::new();
        state.set_project(Some(Project::from_path("/p")));

        go_to_transcript(&mut state, Some(&backend), "s-unlisted").await;
        assert_eq!(state.view, View::Transcripts);
        let meta = &state.current_transcript.as_ref().unwrap().meta;
        assert_eq!(meta.session_id, "s-unlisted");
    }

    #[tokio::test]
    async fn test_go_to_transcript_degrades_on_open_failure() {
        let backend = FixedBackend { files: Vec::new() };
        let mut state = SessionState::new();
        state.set_project(Some(Project::from_path("/p")));

        go_to_transcript(&mut state, Some(&backend), "missing").await;
        assert!(state.current_transcript.is_none());
        assert!(state.status.is_some());
    }
}
