//! Blame browser: file list, per-line attribution, and line detail.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::model::Attribution;
use crate::store::{LoadState, SessionState};
use crate::text::highlight;

/// Why the visible file list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileListEmpty {
    /// No project is selected.
    NoProject,
    /// The project has no files at all.
    EmptyFolder,
    /// No file carries a recorded agent edit and the toggle is on.
    NoAgentTouched,
    /// The text filter matched nothing.
    NoMatches,
}

/// The filtered file list, or the reason it is empty.
#[derive(Debug, PartialEq, Eq)]
pub enum FileListView<'a> {
    Files(Vec<&'a str>),
    Empty(FileListEmpty),
}

/// One rendered blame line.
#[derive(Debug, PartialEq, Eq)]
pub struct BlameRow<'a> {
    pub line_no: usize,
    pub text: &'a str,
    /// Short model badge, absent for unattributed lines.
    pub badge: Option<&'a str>,
    pub selected: bool,
}

/// Detail panel content for the selected line.
#[derive(Debug, PartialEq, Eq)]
pub struct LineDetail<'a> {
    pub line_no: usize,
    pub text: &'a str,
    /// Full attribution, absent for unattributed lines.
    pub attribution: Option<&'a Attribution>,
    /// Navigable session reference, when the attribution carries one.
    pub session_ref: Option<&'a str>,
}

/// Load the project's file list and agent-touched set.
///
/// The agent-touched fetch failing is a non-fatal degradation: the set is
/// treated as empty and only a diagnostic is logged.
pub async fn load_files<B: Backend>(state: &mut SessionState, backend: Option<&B>) {
    let Some(backend) = backend else {
        state.files_state = LoadState::BackendMissing;
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.files_state = LoadState::NoProject;
        return;
    };

    let ticket = state.begin_files();
    let files = match backend.list_project_files(&project).await {
        Ok(page) => page.files,
        Err(err) => {
            warn!(%err, "file list load failed");
            state.set_status(format!("Failed to load files: {err}"));
            state.fail_files(ticket, LoadState::Failed(err.to_string()));
            return;
        }
    };

    let agent_touched: HashSet<String> = match backend.list_agent_touched_files(&project).await {
        Ok(page) => page.files.into_iter().collect(),
        Err(err) => {
            debug!(%err, "agent-touched fetch failed, treating set as empty");
            HashSet::new()
        }
    };

    state.complete_files(ticket, files, agent_touched);
}

/// The file list after the agent-touched toggle and the text filter.
///
/// Filter order is fixed: agent-touched first, then a case-insensitive
/// substring match on the path. The text filter has no minimum length.
#[must_use]
pub fn visible_files(state: &SessionState) -> FileListView<'_> {
    if state.project.is_none() {
        return FileListView::Empty(FileListEmpty::NoProject);
    }
    if state.files.is_empty() {
        return FileListView::Empty(FileListEmpty::EmptyFolder);
    }

    let touched: Vec<&str> = state
        .files
        .iter()
        .map(String::as_str)
        .filter(|path| !state.agent_touched_only || state.agent_touched.contains(*path))
        .collect();
    if touched.is_empty() {
        return FileListView::Empty(FileListEmpty::NoAgentTouched);
    }

    let needle = state.file_filter.to_lowercase();
    let matched: Vec<&str> = touched
        .into_iter()
        .filter(|path| needle.is_empty() || path.to_lowercase().contains(&needle))
        .collect();
    if matched.is_empty() {
        return FileListView::Empty(FileListEmpty::NoMatches);
    }
    FileListView::Files(matched)
}

/// Request attribution for `path` and make it the selected file.
pub async fn select_file<B: Backend>(state: &mut SessionState, backend: Option<&B>, path: &str) {
    let Some(backend) = backend else {
        state.blame_state = LoadState::BackendMissing;
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.blame_state = LoadState::NoProject;
        return;
    };

    let ticket = state.begin_blame(path);
    match backend.blame_file(&project, path).await {
        Ok(blamed) => {
            state.complete_blame(&ticket, blamed.lines);
        }
        Err(err) => {
            warn!(%err, file = path, "blame request failed");
            state.set_status(format!("Failed to blame {path}: {err}"));
            state.fail_blame(&ticket, LoadState::Failed(err.to_string()));
        }
    }
}

/// Rows for the blamed-file pane.
#[must_use]
pub fn blame_rows(state: &SessionState) -> Vec<BlameRow<'_>> {
    state
        .blame_lines
        .iter()
        .map(|line| BlameRow {
            line_no: line.line_no,
            text: &line.text,
            badge: line.meta.as_ref().map(Attribution::badge),
            selected: state.selected_line == Some(line.line_no),
        })
        .collect()
}

/// Detail for the selected line, if any. Pure.
#[must_use]
pub fn line_detail(state: &SessionState) -> Option<LineDetail<'_>> {
    let line_no = state.selected_line?;
    let line = state.blame_lines.iter().find(|l| l.line_no == line_no)?;
    let attribution = line.meta.as_ref();
    Some(LineDetail {
        line_no,
        text: &line.text,
        attribution,
        session_ref: attribution.and_then(Attribution::session_ref),
    })
}

/// Highlighted file-path label for list rendering.
#[must_use]
pub fn file_label(path: &str, filter: &str) -> String {
    highlight(path, filter)
}
