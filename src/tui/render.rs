//! Rendering of the view models.
//!
//! View models carry display-escaped text with `<mark>` markers around
//! search matches; [`markup_spans`] converts that into styled spans and
//! undoes the display escaping for terminal output.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::{LoadState, View};
use crate::text::{MARK_CLOSE, MARK_OPEN};
use crate::util::format_timestamp;
use crate::views::{
    blame_rows, line_detail, timeline_rows, timeline_status, transcript_list_view,
    transcript_view, visible_files, FileListEmpty, FileListView, TranscriptView,
};

use super::app::{App, InputMode};
use super::theme;

/// Undo display escaping for terminal output.
fn unescape_display(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Split marked-up text into styled spans.
///
/// Segments between [`MARK_OPEN`] and [`MARK_CLOSE`] get the highlight
/// style; everything else keeps `base`. An unclosed marker is rendered
/// literally rather than dropped.
pub(super) fn markup_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(MARK_OPEN) {
        let Some(close) = rest[open + MARK_OPEN.len()..].find(MARK_CLOSE) else {
            break;
        };
        if open > 0 {
            spans.push(Span::styled(unescape_display(&rest[..open]), base));
        }
        let start = open + MARK_OPEN.len();
        spans.push(Span::styled(
            unescape_display(&rest[start..start + close]),
            theme::mark(),
        ));
        rest = &rest[start + close + MARK_CLOSE.len()..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(unescape_display(rest), base));
    }
    spans
}

fn load_state_message(state: &LoadState) -> Option<String> {
    match state {
        LoadState::BackendMissing => {
            Some("Desktop backend required. Start with --backend <command>".to_string())
        }
        LoadState::NoProject => Some("No project selected. Pass --project <dir>".to_string()),
        LoadState::Loading => Some("Loading...".to_string()),
        LoadState::Failed(msg) => Some(format!("Load failed: {msg}")),
        LoadState::Idle | LoadState::Loaded => None,
    }
}

pub(super) fn draw(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);
    match app.state.view {
        View::Blame => draw_blame(frame, app, chunks[1]),
        View::Timeline => draw_timeline(frame, app, chunks[1]),
        View::Transcripts => draw_transcripts(frame, app, chunks[1]),
        View::Settings => draw_settings(frame, app, chunks[1]),
    }
    draw_footer(frame, app, chunks[2]);
}

fn draw_tabs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let tabs = [
        (View::Blame, "1 Blame"),
        (View::Timeline, "2 Timeline"),
        (View::Transcripts, "3 Transcripts"),
        (View::Settings, "4 Settings"),
    ];
    let mut spans = Vec::new();
    for (view, label) in tabs {
        let style = if app.state.view == view {
            theme::active_tab()
        } else {
            theme::dim()
        };
        spans.push(Span::styled(format!(" {label} "), style));
    }
    if let Some(project) = &app.state.project {
        spans.push(Span::styled(format!("  {}", project.label), theme::dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let text = match app.input_mode {
        InputMode::FileFilter => format!("filter: {}_", app.state.file_filter),
        InputMode::CrossSearch => format!("search: {}_", app.state.cross_session_query),
        InputMode::TranscriptFilter => format!("in-transcript: {}_", app.state.transcript_query),
        InputMode::Normal => app
            .state
            .status
            .clone()
            .unwrap_or_else(|| "q quit  1-4 views  / search  j/k move  Enter select".to_string()),
    };
    frame.render_widget(Paragraph::new(Span::styled(text, theme::status())), area);
}

fn empty_list(message: &str, title: &str) -> Paragraph<'static> {
    Paragraph::new(message.to_string())
        .style(theme::dim())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
}

fn draw_blame(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    match visible_files(&app.state) {
        FileListView::Files(files) => {
            let items: Vec<ListItem<'_>> = files
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let base = if i == app.file_cursor {
                        theme::selection()
                    } else {
                        Style::default()
                    };
                    let label = crate::views::blame::file_label(path, &app.state.file_filter);
                    ListItem::new(Line::from(markup_spans(&label, base)))
                })
                .collect();
            let title = format!("Files ({})", files.len());
            frame.render_widget(
                List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
                panes[0],
            );
        }
        FileListView::Empty(reason) => {
            let message = match load_state_message(&app.state.files_state) {
                Some(msg) => msg,
                None => match reason {
                    FileListEmpty::NoProject => "No project selected".to_string(),
                    FileListEmpty::EmptyFolder => "No files in this project".to_string(),
                    FileListEmpty::NoAgentTouched => {
                        "No agent-touched files. Press t to show all files".to_string()
                    }
                    FileListEmpty::NoMatches => "No files match the filter".to_string(),
                },
            };
            frame.render_widget(empty_list(&message, "Files"), panes[0]);
        }
    }

    let detail_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(panes[1]);

    if let Some(message) = load_state_message(&app.state.blame_state) {
        frame.render_widget(empty_list(&message, "Blame"), detail_split[0]);
    } else {
        let items: Vec<ListItem<'_>> = blame_rows(&app.state)
            .into_iter()
            .map(|row| {
                let base = if row.selected {
                    theme::selection()
                } else {
                    Style::default()
                };
                let mut spans = vec![Span::styled(format!("{:>5} ", row.line_no), theme::dim())];
                match row.badge {
                    Some(badge) => spans.push(Span::styled(format!("[{badge:<8}] "), theme::badge())),
                    None => spans.push(Span::raw(" ".repeat(11))),
                }
                spans.push(Span::styled(row.text.to_string(), base));
                ListItem::new(Line::from(spans))
            })
            .collect();
        let title = app
            .state
            .selected_file
            .clone()
            .unwrap_or_else(|| "Blame".to_string());
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
            detail_split[0],
        );
    }

    let detail = match line_detail(&app.state) {
        Some(detail) => {
            let mut lines = vec![Line::from(format!("Line {}: {}", detail.line_no, detail.text))];
            match detail.attribution {
                Some(meta) => {
                    lines.push(Line::from(format!("Model: {}", meta.model)));
                    lines.push(Line::from(format!("When:  {}", format_timestamp(&meta.timestamp))));
                    match detail.session_ref {
                        Some(session) => lines.push(Line::from(vec![
                            Span::raw("Session: "),
                            Span::styled(session.to_string(), theme::badge()),
                            Span::styled("  (s to open transcript)", theme::dim()),
                        ])),
                        None => lines.push(Line::from(Span::styled("No session recorded", theme::dim()))),
                    }
                }
                None => lines.push(Line::from(Span::styled(
                    "No recorded agent edit for this line",
                    theme::dim(),
                ))),
            }
            Paragraph::new(lines)
        }
        None => Paragraph::new(Span::styled("Select a line with Up/Down", theme::dim())),
    };
    frame.render_widget(
        detail.block(Block::default().borders(Borders::ALL).title("Attribution")),
        detail_split[1],
    );
}

fn draw_timeline(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(message) = load_state_message(&app.state.timeline_state) {
        frame.render_widget(empty_list(&message, "Timeline"), area);
        return;
    }

    let items: Vec<ListItem<'_>> = timeline_rows(&app.state)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let base = if i == app.timeline_cursor {
                theme::selection()
            } else {
                Style::default()
            };
            let timestamp = row.timestamp.map(format_timestamp);
            let mut spans = vec![
                Span::styled(
                    format!("{:<17} ", timestamp.as_deref().unwrap_or("-")),
                    theme::dim(),
                ),
                Span::styled(format!("{:<8} ", row.action.unwrap_or("-")), base),
            ];
            if let Some(file) = row.file_link {
                spans.push(Span::styled(file.to_string(), theme::badge()));
            }
            if let Some(model) = row.model {
                spans.push(Span::styled(format!("  {model}"), theme::dim()));
            }
            if let Some(agent) = row.agent {
                spans.push(Span::styled(format!("  {agent}"), theme::dim()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!("Timeline ({})", timeline_status(&app.state));
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_transcripts(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if app.state.current_transcript.is_some() {
        draw_open_transcript(frame, app, area);
        return;
    }

    if let Some(message) = load_state_message(&app.state.transcripts_state) {
        frame.render_widget(empty_list(&message, "Transcripts"), area);
        return;
    }

    let view = transcript_list_view(&app.state);
    let items: Vec<ListItem<'_>> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let base = if i == app.list_cursor {
                theme::selection()
            } else {
                Style::default()
            };
            let mut lines = vec![Line::from(vec![
                Span::styled(row.title.clone(), base),
                Span::styled(
                    format!(
                        "  {} msgs  {}  {}",
                        row.message_count,
                        row.agent_tool,
                        format_timestamp(row.start_time)
                    ),
                    theme::dim(),
                ),
            ])];
            for snippet in &row.snippets {
                let mut spans = vec![Span::styled(format!("    [{}] ", snippet.block_type), theme::dim())];
                spans.extend(markup_spans(&snippet.text, Style::default()));
                lines.push(Line::from(spans));
            }
            ListItem::new(lines)
        })
        .collect();

    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(view.header)),
        area,
    );
}

fn draw_open_transcript(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = app
        .state
        .selected_transcript
        .clone()
        .unwrap_or_else(|| "Transcript".to_string());

    let lines: Vec<Line<'_>> = match transcript_view(&app.state) {
        TranscriptView::NotOpen => vec![Line::from(Span::styled("No transcript open", theme::dim()))],
        TranscriptView::NoMessages => {
            vec![Line::from(Span::styled("This transcript has no messages", theme::dim()))]
        }
        TranscriptView::NoMatch { query } => vec![Line::from(Span::styled(
            format!("No messages match \"{query}\""),
            theme::dim(),
        ))],
        TranscriptView::Messages(messages) => {
            let mut lines = Vec::new();
            for message in &messages {
                let mut header = vec![Span::styled(message.role.to_string(), theme::role(message.role))];
                if let Some(model) = message.model {
                    header.push(Span::styled(format!("  {model}"), theme::dim()));
                }
                header.push(Span::styled(
                    format!("  {}", format_timestamp(message.timestamp)),
                    theme::dim(),
                ));
                lines.push(Line::from(header));

                for block in &message.blocks {
                    let mut first = vec![Span::styled(format!("  [{}] ", block.kind), theme::dim())];
                    if let Some(heading) = &block.heading {
                        first.extend(markup_spans(heading, theme::badge()));
                    }
                    lines.push(Line::from(first));

                    let body_style = if block.is_error {
                        theme::error_text()
                    } else {
                        Style::default()
                    };
                    for body_line in block.body.lines() {
                        let mut spans = vec![Span::raw("    ")];
                        spans.extend(markup_spans(body_line, body_style));
                        lines.push(Line::from(spans));
                    }
                }
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.transcript_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn draw_settings(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = vec![Line::from("Recent projects:")];
    if app.config.recent_projects.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", theme::dim())));
    }
    for project in &app.config.recent_projects {
        let tag = project.tag.as_deref().unwrap_or("");
        lines.push(Line::from(format!("  {}  {}  {tag}", project.name, project.path)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Home directory: {}",
        app.config.home_directory.as_deref().unwrap_or("(default)")
    )));
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Settings")),
        area,
    );
}
