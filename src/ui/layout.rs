//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{BACK_SHORTCUT, NEXT_SHORTCUT, REFRESH_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header: application name and the current view
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " HIS ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if app.state.current_view != View::Dashboard {
        spans.push(Span::styled(
            " Dashboard › ",
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            app.state.current_view.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            " Health Information System",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Connection status
    let conn_status = if app.state.api_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    match &app.state.status_message {
        Some(message) => spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        None => spans.push(Span::styled(
            view_hints(app.state.current_view),
            Style::default().fg(Color::Gray),
        )),
    }

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let quit_width = quit_hint.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(quit_width)])
        .split(area);

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, chunks[0]);

    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, chunks[1]);
}

/// Get keyboard hints for the current view
pub fn view_hints(view: View) -> String {
    match view {
        View::Dashboard => "j/k:nav  Enter:open  1-4:jump  q:quit".to_string(),
        View::Registration | View::ProgramCreate => format!(
            "Tab:next field  {NEXT_SHORTCUT}:next step  {BACK_SHORTCUT}:back  {SUBMIT_SHORTCUT}:submit  Esc:discard"
        ),
        View::Enrollment => format!("Tab:next field  {SUBMIT_SHORTCUT}:submit  Esc:discard"),
        View::Registry => {
            format!("type:search  Tab:status  Enter:details  ←/→:page  {REFRESH_SHORTCUT}:refresh  Esc:back")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wizard_views_mention_step_shortcuts() {
        assert!(view_hints(View::Registration).contains(NEXT_SHORTCUT));
        assert!(!view_hints(View::Enrollment).contains(NEXT_SHORTCUT));
        assert!(view_hints(View::Registry).contains(REFRESH_SHORTCUT));
    }

    #[test]
    fn test_layout_reserves_header_and_status() {
        let (header, content, status) = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(header.height, 1);
        assert_eq!(status.y, 23);
        assert_eq!(content.height, 22);
    }
}
