//! Client registry table

use crate::api::ClientRecord;
use crate::app::App;
use crate::state::DATE_FORMAT;
use crate::ui::components::{render_dialog, DialogConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

const COLUMNS: [&str; 7] = [
    "Name",
    "Gender",
    "Born",
    "Contact",
    "Address",
    "Status",
    "Registered",
];

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Page indicator
        ])
        .split(area);

    draw_search(frame, chunks[0], app);
    draw_table(frame, chunks[1], app);
    draw_page_indicator(frame, chunks[2], app);

    if let Some(client) = &app.state.client_details {
        draw_details(frame, client);
    }
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App) {
    let filter = &app.state.registry_filter;
    let content = if filter.is_empty() {
        Line::from(vec![
            Span::styled("▌", Style::default().fg(Color::Cyan)),
            Span::styled(
                "Search by name, contact or address",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(vec![
            Span::raw(filter.as_str()),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
        ])
    };
    let status = Line::from(vec![
        Span::raw(" Status: "),
        Span::styled(
            app.state.status_filter.label(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
    ])
    .right_aligned();
    let block = Block::default()
        .title(" Search ")
        .title_top(status)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Clients ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let rows = app.state.page_clients();
    if rows.is_empty() {
        let message = if !app.state.registry_loaded {
            "Loading clients..."
        } else if app.state.clients.is_empty() {
            "No clients registered yet."
        } else {
            "No clients match your search."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c))).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows.iter().map(|client| client_row(client)),
        [
            Constraint::Percentage(22),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(16),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("▸");

    let mut state = TableState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn client_row(client: &ClientRecord) -> Row<'static> {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    Row::new(vec![
        Cell::from(client.full_name()),
        Cell::from(or_dash(&client.gender)),
        Cell::from(date(client.birth_date())),
        Cell::from(or_dash(&client.contact_number)),
        Cell::from(or_dash(&client.address)),
        Cell::from(Span::styled(
            client.status_label(),
            Style::default().fg(status_color(client.status_label())),
        )),
        Cell::from(date(client.created_on())),
    ])
}

/// Badge color of a record status
fn status_color(label: &str) -> Color {
    match label {
        "Active" => Color::Green,
        "Pending" => Color::Yellow,
        "Inactive" => Color::DarkGray,
        _ => Color::Gray,
    }
}

fn draw_page_indicator(frame: &mut Frame, area: Rect, app: &App) {
    let matching = app.state.filtered_clients().len();
    let text = format!(
        "Page {} of {}  ({} client{})",
        app.state.registry_page + 1,
        app.state.page_count(),
        matching,
        if matching == 1 { "" } else { "s" }
    );
    let indicator = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(indicator, area);
}

fn draw_details(frame: &mut Frame, client: &ClientRecord) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let message = details_message(client);
    render_dialog(
        frame,
        DialogConfig {
            title: "Client Details",
            accent: status_color(client.status_label()),
            message: &message,
            hint: Some(Line::from(vec![
                Span::styled("Enter", key),
                Span::raw("/"),
                Span::styled("Esc", key),
                Span::raw(" to close"),
            ])),
            max_width: 64,
        },
    );
}

/// One `label: value` line per detail, dates spelled out
fn details_message(client: &ClientRecord) -> String {
    let long_date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let or_dash = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    [
        ("Full Name", client.full_name()),
        ("Date of Birth", long_date(client.birth_date())),
        ("Gender", or_dash(&client.gender)),
        ("Status", client.status_label().to_string()),
        ("Contact Number", or_dash(&client.contact_number)),
        ("Address", or_dash(&client.address)),
        ("Registered", long_date(client.created_on())),
    ]
    .iter()
    .map(|(label, value)| format!("{label}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}
