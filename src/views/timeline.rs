//! Timeline browser: the recorded edit-event list.

use tracing::warn;

use crate::backend::Backend;
use crate::store::{LoadState, SessionState};

/// One rendered timeline event.
#[derive(Debug, PartialEq, Eq)]
pub struct TimelineRow<'a> {
    pub timestamp: Option<&'a str>,
    pub action: Option<&'a str>,
    pub model: Option<&'a str>,
    /// Combined "tool@version" label.
    pub agent: Option<String>,
    pub change_size: Option<usize>,
    /// Cross-reference into the blame view, present whenever the event
    /// names a file.
    pub file_link: Option<&'a str>,
}

/// Load the bounded edit-event list for the active project.
pub async fn load_timeline<B: Backend>(state: &mut SessionState, backend: Option<&B>) {
    let Some(backend) = backend else {
        state.timeline_state = LoadState::BackendMissing;
        return;
    };
    let Some(project) = state.project_dir().map(str::to_string) else {
        state.timeline_state = LoadState::NoProject;
        return;
    };

    let ticket = state.begin_timeline();
    match backend
        .list_timeline(&project, state.timeline_limit, state.skip_noise)
        .await
    {
        Ok(page) => {
            state.complete_timeline(ticket, page.events, page.total_count);
        }
        Err(err) => {
            warn!(%err, "timeline load failed");
            state.set_status(format!("Failed to load timeline: {err}"));
            state.fail_timeline(ticket, LoadState::Failed(err.to_string()));
        }
    }
}

/// Rows in backend order; this layer never re-sorts.
#[must_use]
pub fn timeline_rows(state: &SessionState) -> Vec<TimelineRow<'_>> {
    state
        .timeline_events
        .iter()
        .map(|event| TimelineRow {
            timestamp: event.timestamp.as_deref(),
            action: event.action.as_deref(),
            model: event.model.as_deref(),
            agent: event.agent_label(),
            change_size: event.change_size,
            file_link: event.file_path.as_deref(),
        })
        .collect()
}

/// Footer line indicating truncation when the total exceeds the page.
#[must_use]
pub fn timeline_status(state: &SessionState) -> String {
    let shown = state.timeline_events.len();
    if state.timeline_total > shown {
        format!("{shown} of {} events", state.timeline_total)
    } else {
        format!("{shown} events")
    }
}
