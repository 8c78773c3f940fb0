use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::form::{FormField, MediaForm};

fn title_span(title: &str) -> Span<'static> {
    Span::styled(
        format!(" {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

/// Render a centered confirmation popup: [y]es / [n]o
pub fn render_confirm(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green)),
            Span::raw("es  "),
            Span::styled("[n]", Style::default().fg(Color::Red)),
            Span::raw("o"),
        ]),
    ];

    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title_span(title)))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(popup, area);
}

/// Render the add/edit form
pub fn render_form(frame: &mut Frame, form: &MediaForm) {
    // one line per field, plus borders, blank line, error and hint
    let height = FormField::ALL.len() as u16 + 5;
    let area = centered_rect(70, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = field == form.field;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut value = form.value(field);
            if field == FormField::Category {
                value = format!("< {} >", value);
            } else if focused {
                value.push('▏');
            }
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.label()), label_style),
                Span::raw(value),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    });
    lines.push(if form.submitting {
        Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            "Tab: next field | Space/←/→: type | Enter: save | Esc: cancel",
            Style::default().fg(Color::DarkGray),
        ))
    });

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title_span(form.title())),
    );
    frame.render_widget(popup, area);
}

/// Render the poster popup. Terminals cannot show the image itself, so this
/// shows where it lives and offers to open it.
pub fn render_poster(frame: &mut Frame, title: &str, url: &str) {
    let area = centered_rect(70, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(url.to_string(), Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(
            "o: open in browser | Esc: close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title_span("Poster")),
        )
        .alignment(Alignment::Center);
    frame.render_widget(popup, area);
}

/// Create a centered rect of the given size, clamped to the outer rect
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
