//! Styles shared by the render path.

use ratatui::style::{Color, Modifier, Style};

/// Highlighted search match.
pub fn mark() -> Style {
    Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Selected list row.
pub fn selection() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

/// Attribution badge next to a blamed line.
pub fn badge() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Muted secondary text.
pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Message role label.
pub fn role(role: &str) -> Style {
    match role {
        "assistant" => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        "user" => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Magenta),
    }
}

/// Failed tool result.
pub fn error_text() -> Style {
    Style::default().fg(Color::Red)
}

/// Active tab in the view switcher.
pub fn active_tab() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

/// Footer status line.
pub fn status() -> Style {
    Style::default().fg(Color::Yellow)
}
