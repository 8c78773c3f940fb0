mod media_table;
mod popup;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Popup};
use crate::list::Viewport;
use crate::notification::NotificationKind;

/// Draw the whole screen and report which table rows ended up visible.
pub fn render(frame: &mut Frame, app: &App) -> Viewport {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    let viewport = media_table::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    match &app.popup {
        Some(Popup::Form(form)) => popup::render_form(frame, form),
        Some(Popup::ConfirmDelete { title, .. }) => popup::render_confirm(
            frame,
            "Confirm Deletion",
            &format!(
                "Delete \"{}\"? This action cannot be undone.",
                title
            ),
        ),
        Some(Popup::Poster { title, url }) => popup::render_poster(frame, title, url),
        None => {}
    }

    viewport
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "marquee - Favorite Movies & TV Shows",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if !app.list.records().is_empty() {
        spans.push(Span::styled(
            format!("  page {}", app.list.page()),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(note) = &app.notification {
        let color = match note.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
            NotificationKind::Info => Color::Blue,
        };
        Line::from(vec![Span::styled(
            note.message.clone(),
            Style::default().fg(color),
        )])
    } else if app.list.is_loading() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.popup {
            Some(_) => "Esc: close",
            None => "j/k/g/G: nav | Ctrl+d/u: page | a: add | e: edit | d: delete | p: poster | r: reload | q: quit",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
