use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::app::App;
use crate::list::Viewport;
use crate::types::Category;

const HEADERS: [&str; 8] = [
    "Title",
    "Type",
    "Director",
    "Budget",
    "Location",
    "Duration",
    "Year/Time",
    "Poster",
];

/// Top row index that keeps `selected` on screen.
pub fn scroll_offset(selected: usize, height: usize) -> usize {
    selected.saturating_sub(height.saturating_sub(1))
}

/// Message shown under the last row, if any.
fn footer(app: &App) -> Option<(&'static str, Color)> {
    let list = &app.list;
    if list.is_loading() {
        Some(("Loading...", Color::Yellow))
    } else if list.records().is_empty() && list.error().is_none() {
        Some((
            "No entries found. Press 'a' to add your first movie or TV show!",
            Color::Gray,
        ))
    } else if !list.has_more() && !list.records().is_empty() {
        Some(("You've reached the end of the list.", Color::Gray))
    } else {
        None
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) -> Viewport {
    let area = match app.list.error() {
        Some(error) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            let banner = Paragraph::new(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(banner, chunks[0]);
            chunks[1]
        }
        None => area,
    };

    // borders + header row
    let height = area.height.saturating_sub(3) as usize;
    let records = app.list.records();
    let selected = app.list.selected();
    let offset = scroll_offset(selected, height);

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let type_color = match record.category {
                Category::Movie => Color::Cyan,
                Category::TvShow => Color::Magenta,
            };
            let poster = if record.poster_url.is_some() { "✓" } else { "-" };

            Row::new(vec![
                Cell::from(truncate(&record.title, 40))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(record.category.to_string()).style(Style::default().fg(type_color)),
                Cell::from(truncate(&record.director, 24)),
                Cell::from(record.budget.clone()),
                Cell::from(truncate(&record.location, 24)),
                Cell::from(record.duration.clone()),
                Cell::from(record.release_info.clone()),
                Cell::from(poster).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let header = Row::new(HEADERS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let widths = [
        Constraint::Percentage(22),
        Constraint::Length(8),
        Constraint::Percentage(16),
        Constraint::Percentage(10),
        Constraint::Percentage(14),
        Constraint::Percentage(10),
        Constraint::Percentage(10),
        Constraint::Length(6),
    ];

    let title = if app.list.has_more() {
        format!(" Favorite Movies & TV Shows ({}+) ", records.len())
    } else {
        format!(" Favorite Movies & TV Shows ({}) ", records.len())
    };

    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some((message, color)) = footer(app) {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} ", message),
                Style::default().fg(color),
            ))
            .alignment(Alignment::Center),
        );
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_offset(offset);
    if !records.is_empty() {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(table, area, &mut state);

    Viewport { offset, height }
}
