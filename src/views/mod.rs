//! View operations and view models.
//!
//! Each view contributes async load operations that drive the session store
//! through its `begin_*`/`complete_*` pairs, plus pure functions from state
//! to a render-agnostic view model. All backend failures are absorbed here:
//! preflight conditions become dedicated load states, rejected calls become
//! a terse status message, and the previously rendered data stays intact.

pub mod blame;
pub mod timeline;
pub mod transcripts;

pub use blame::{blame_rows, line_detail, load_files, select_file, visible_files};
pub use blame::{BlameRow, FileListEmpty, FileListView, LineDetail};
pub use timeline::{load_timeline, timeline_rows, timeline_status, TimelineRow};
pub use transcripts::{
    load_transcripts, open_transcript, run_search, transcript_list_view, transcript_view,
    BlockView, ListRow, MessageView, TranscriptListView, TranscriptView,
};
