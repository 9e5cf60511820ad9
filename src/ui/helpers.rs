use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Movie, Poster};

/// Build the text shown inside a movie card: title, classification, year,
/// poster badge and the start of the description.
pub(crate) fn movie_card_lines(movie: &Movie, selected: bool) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", movie.title)
    } else {
        movie.title.clone()
    };

    let year = movie
        .release_year
        .clone()
        .unwrap_or_else(|| "Year unknown".to_string());

    let poster = movie.poster();
    let poster_style = match poster {
        Poster::Placeholder => Style::default().fg(Color::DarkGray),
        Poster::Embedded { .. } => Style::default().fg(Color::Cyan),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} • {}", movie.genre, movie.priority),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::raw(format!("{year}  ")),
            Span::styled(poster.to_string(), poster_style),
        ]),
    ];

    if let Some(first) = movie.description.lines().next() {
        if !first.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                first.trim().to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
