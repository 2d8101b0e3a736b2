//! Dashboard menu

use super::components::{render_menu_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(View::MENU.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    frame.render_widget(Paragraph::new(summary_line(app)), chunks[0]);

    for (idx, view) in View::MENU.iter().enumerate() {
        render_menu_button(
            frame,
            chunks[idx + 1],
            &(idx + 1).to_string(),
            view.title(),
            view.description(),
            idx == app.state.selected_index,
        );
    }
}

fn summary_line(app: &App) -> Line<'static> {
    let connection = if app.state.api_connected {
        Span::styled("Database reachable", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            "Database unreachable, submissions will fail",
            Style::default().fg(Color::Red),
        )
    };
    let mut spans = vec![connection];
    if app.state.registry_loaded {
        spans.push(Span::styled(
            format!("  |  {} registered clients", app.state.clients.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
