//! TUI application main loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::backend::StdioBackend;
use crate::config::{ClientConfig, RecentProject};
use crate::error::{LensError, Result};
use crate::model::Project;
use crate::nav;
use crate::search::Debouncer;
use crate::store::{LoadState, SessionState, View};
use crate::views::{blame, timeline, transcripts, visible_files, FileListView};

use super::events::{Event, EventHandler};
use super::render;

/// Startup options carried in from the CLI.
#[derive(Debug, Default)]
pub struct TuiOptions {
    /// Project directory to select on startup.
    pub project: Option<String>,
    /// Command line spawning the backend helper.
    pub backend_cmd: Option<String>,
    /// Override for the timeline/transcript page size.
    pub limit: Option<usize>,
}

/// Active text-input target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputMode {
    Normal,
    /// Editing the file-path filter.
    FileFilter,
    /// Editing the cross-session search query.
    CrossSearch,
    /// Editing the in-transcript filter.
    TranscriptFilter,
}

pub(super) struct App {
    pub state: SessionState,
    pub backend: Option<StdioBackend>,
    pub config: ClientConfig,
    pub debouncer: Debouncer,
    pub input_mode: InputMode,
    pub file_cursor: usize,
    pub timeline_cursor: usize,
    pub list_cursor: usize,
    pub transcript_scroll: u16,
    pub should_quit: bool,
}

impl App {
    fn new(options: &TuiOptions) -> Result<Self> {
        let backend = match options.backend_cmd.as_deref() {
            Some(cmd) => Some(StdioBackend::spawn(cmd)?),
            None => None,
        };

        let mut state = SessionState::new();
        if let Some(limit) = options.limit {
            state.timeline_limit = limit;
            state.transcript_limit = limit;
        }

        let mut config = ClientConfig::load();
        if let Some(path) = &options.project {
            let project = Project::from_path(path);
            config.remember_project(RecentProject {
                name: project.label.clone(),
                path: project.path.clone(),
                tag: None,
            });
            if let Err(err) = config.save() {
                debug!(%err, "could not persist recent projects");
            }
            state.set_project(Some(project));
        }

        Ok(Self {
            state,
            backend,
            config,
            debouncer: Debouncer::default(),
            input_mode: InputMode::Normal,
            file_cursor: 0,
            timeline_cursor: 0,
            list_cursor: 0,
            transcript_scroll: 0,
            should_quit: false,
        })
    }
}

/// Run the TUI application.
pub fn run(options: TuiOptions) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LensError::io("Failed to build async runtime", e))?;

    let mut app = App::new(&options)?;
    rt.block_on(blame::load_files(&mut app.state, app.backend.as_ref()));

    enable_raw_mode().map_err(|e| {
        LensError::io(
            "Cannot launch TUI, no interactive terminal available",
            e,
        )
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| LensError::io("Failed to enter alternate screen", e))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| LensError::io("Failed to create terminal", e))?;

    let result = run_loop(&mut terminal, &rt, &mut app);

    disable_raw_mode().map_err(|e| LensError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| LensError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| LensError::io("Failed to show cursor", e))?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    rt: &Runtime,
    app: &mut App,
) -> Result<()> {
    let events = EventHandler::new(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| render::draw(f, app))
            .map_err(|e| LensError::io("Failed to draw TUI", e))?;

        match events.next() {
            Ok(Event::Tick) => {
                // The debounced search fires from the tick, not per keystroke.
                if app.debouncer.due(Instant::now()).is_some() {
                    rt.block_on(transcripts::run_search(&mut app.state, app.backend.as_ref()));
                    app.list_cursor = 0;
                }
            }
            Ok(Event::Key(key)) => {
                handle_key(rt, app, key);
                if app.should_quit {
                    return Ok(());
                }
            }
            Ok(Event::Resize(..)) => {}
            Err(_) => return Ok(()),
        }
    }
}

fn handle_key(rt: &Runtime, app: &mut App, key: KeyEvent) {
    if app.input_mode == InputMode::Normal {
        app.state.status = None;
    }

    match app.input_mode {
        InputMode::FileFilter => handle_file_filter_key(app, key),
        InputMode::CrossSearch => handle_search_key(rt, app, key),
        InputMode::TranscriptFilter => handle_transcript_filter_key(app, key),
        InputMode::Normal => handle_normal_key(rt, app, key),
    }
}

fn handle_file_filter_key(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Esc | KeyCode::Enter) => {
            app.input_mode = InputMode::Normal;
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            app.state.file_filter.pop();
            app.file_cursor = 0;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.state.file_filter.push(c);
            app.file_cursor = 0;
        }
        _ => {}
    }
}

fn handle_search_key(rt: &Runtime, app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Esc) => {
            app.input_mode = InputMode::Normal;
        }
        (KeyModifiers::NONE, KeyCode::Enter) => {
            // Commit: skip the remaining quiet window.
            app.debouncer.cancel();
            rt.block_on(transcripts::run_search(&mut app.state, app.backend.as_ref()));
            app.list_cursor = 0;
            app.input_mode = InputMode::Normal;
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            app.state.cross_session_query.pop();
            app.debouncer
                .schedule(app.state.cross_session_query.clone(), Instant::now());
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.state.cross_session_query.push(c);
            app.debouncer
                .schedule(app.state.cross_session_query.clone(), Instant::now());
        }
        _ => {}
    }
}

fn handle_transcript_filter_key(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Esc | KeyCode::Enter) => {
            app.input_mode = InputMode::Normal;
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            app.state.transcript_query.pop();
            app.transcript_scroll = 0;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.state.transcript_query.push(c);
            app.transcript_scroll = 0;
        }
        _ => {}
    }
}

fn handle_normal_key(rt: &Runtime, app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (KeyModifiers::NONE, KeyCode::Char('1')) => switch_view(rt, app, View::Blame),
        (KeyModifiers::NONE, KeyCode::Char('2')) => switch_view(rt, app, View::Timeline),
        (KeyModifiers::NONE, KeyCode::Char('3')) => switch_view(rt, app, View::Transcripts),
        (KeyModifiers::NONE, KeyCode::Char('4')) => switch_view(rt, app, View::Settings),
        (KeyModifiers::NONE, KeyCode::Tab) => {
            let next = match app.state.view {
                View::Blame => View::Timeline,
                View::Timeline => View::Transcripts,
                View::Transcripts => View::Settings,
                View::Settings => View::Blame,
            };
            switch_view(rt, app, next);
        }
        (KeyModifiers::NONE, KeyCode::Char('r')) => reload_current(rt, app),
        (KeyModifiers::NONE, KeyCode::Char('/')) => match app.state.view {
            View::Blame => app.input_mode = InputMode::FileFilter,
            View::Transcripts if app.state.current_transcript.is_some() => {
                app.input_mode = InputMode::TranscriptFilter;
            }
            View::Transcripts => app.input_mode = InputMode::CrossSearch,
            _ => {}
        },
        (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => move_cursor(app, 1),
        (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => move_cursor(app, -1),
        (KeyModifiers::NONE, KeyCode::Enter) => activate(rt, app),
        (KeyModifiers::NONE, KeyCode::Esc) => {
            if app.state.view == View::Transcripts && app.state.current_transcript.is_some() {
                app.state.close_transcript();
                app.transcript_scroll = 0;
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) if app.state.view == View::Blame => {
            app.state.agent_touched_only = !app.state.agent_touched_only;
            app.file_cursor = 0;
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) if app.state.view == View::Blame => {
            move_line_selection(app, 1);
        }
        (KeyModifiers::NONE, KeyCode::Char('p')) if app.state.view == View::Blame => {
            move_line_selection(app, -1);
        }
        (KeyModifiers::NONE, KeyCode::Char('s')) if app.state.view == View::Blame => {
            let session = crate::views::line_detail(&app.state)
                .and_then(|d| d.session_ref.map(str::to_string));
            if let Some(session) = session {
                rt.block_on(nav::go_to_transcript(
                    &mut app.state,
                    app.backend.as_ref(),
                    &session,
                ));
                app.list_cursor = 0;
            }
        }
        _ => {}
    }
}

fn switch_view(rt: &Runtime, app: &mut App, view: View) {
    app.state.set_view(view);
    // Lazy load on first activation.
    let needs_load = match view {
        View::Blame => app.state.files_state == LoadState::Idle,
        View::Timeline => app.state.timeline_state == LoadState::Idle,
        View::Transcripts => app.state.transcripts_state == LoadState::Idle,
        View::Settings => false,
    };
    if needs_load {
        reload_current(rt, app);
    }
}

fn reload_current(rt: &Runtime, app: &mut App) {
    let backend = app.backend.as_ref();
    match app.state.view {
        View::Blame => {
            rt.block_on(blame::load_files(&mut app.state, backend));
            app.file_cursor = 0;
        }
        View::Timeline => {
            rt.block_on(timeline::load_timeline(&mut app.state, backend));
            app.timeline_cursor = 0;
        }
        View::Transcripts => {
            rt.block_on(transcripts::load_transcripts(&mut app.state, backend));
            app.list_cursor = 0;
        }
        View::Settings => {}
    }
}

fn list_len(app: &App) -> usize {
    match app.state.view {
        View::Blame => match visible_files(&app.state) {
            FileListView::Files(files) => files.len(),
            FileListView::Empty(_) => 0,
        },
        View::Timeline => app.state.timeline_events.len(),
        View::Transcripts => crate::views::transcript_list_view(&app.state).rows.len(),
        View::Settings => 0,
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    if app.state.view == View::Transcripts && app.state.current_transcript.is_some() {
        app.transcript_scroll = app.transcript_scroll.saturating_add_signed(delta as i16);
        return;
    }
    let len = list_len(app);
    if len == 0 {
        return;
    }
    let cursor = match app.state.view {
        View::Blame => &mut app.file_cursor,
        View::Timeline => &mut app.timeline_cursor,
        View::Transcripts => &mut app.list_cursor,
        View::Settings => return,
    };
    *cursor = cursor.saturating_add_signed(delta).min(len - 1);
}

fn move_line_selection(app: &mut App, delta: isize) {
    if app.state.blame_lines.is_empty() {
        return;
    }
    let position = app
        .state
        .selected_line
        .and_then(|no| app.state.blame_lines.iter().position(|l| l.line_no == no));
    let next = match position {
        Some(i) => i.saturating_add_signed(delta).min(app.state.blame_lines.len() - 1),
        None => 0,
    };
    let line_no = app.state.blame_lines[next].line_no;
    app.state.select_line(line_no);
}

fn activate(rt: &Runtime, app: &mut App) {
    match app.state.view {
        View::Blame => {
            let path = match visible_files(&app.state) {
                FileListView::Files(files) => files.get(app.file_cursor).map(|p| p.to_string()),
                FileListView::Empty(_) => None,
            };
            if let Some(path) = path {
                rt.block_on(blame::select_file(&mut app.state, app.backend.as_ref(), &path));
            }
        }
        View::Timeline => {
            let file = app
                .state
                .timeline_events
                .get(app.timeline_cursor)
                .and_then(|e| e.file_path.clone());
            match file {
                Some(file) => {
                    rt.block_on(nav::go_to_file_in_blame(
                        &mut app.state,
                        app.backend.as_ref(),
                        &file,
                    ));
                    app.file_cursor = 0;
                }
                None => app.state.set_status("This event has no file"),
            }
        }
        View::Transcripts => {
            let view = crate::views::transcript_list_view(&app.state);
            let session = view
                .rows
                .get(app.list_cursor)
                .map(|row| row.session_id.to_string());
            if let Some(session) = session {
                app.transcript_scroll = 0;
                rt.block_on(transcripts::open_transcript(
                    &mut app.state,
                    app.backend.as_ref(),
                    &session,
                ));
            }
        }
        View::Settings => {}
    }
}
