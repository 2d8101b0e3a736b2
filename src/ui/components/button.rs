//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

fn text_style(is_selected: bool, is_enabled: bool, accent: Color) -> Style {
    if !is_enabled {
        Style::default().fg(Color::DarkGray)
    } else if is_selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn border_style(is_selected: bool, accent: Color) -> Style {
    if is_selected {
        Style::default().fg(accent)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Render a dashboard menu entry: shortcut key, label and a dimmed description
pub fn render_menu_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    description: &str,
    is_selected: bool,
) {
    let line = Line::from(vec![
        Span::styled(format!(" {key} "), Style::default().fg(Color::Yellow)),
        Span::styled(label, text_style(is_selected, true, Color::Cyan)),
        Span::styled(
            format!("  {description}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_selected, Color::Cyan));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render an action panel button; disabled buttons stay visible but dimmed
pub fn render_action_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_selected: bool,
    is_enabled: bool,
    color: Color,
) {
    let marker = if is_selected { "▸" } else { " " };
    let paragraph = Paragraph::new(format!("{marker}{label}"))
        .style(text_style(is_selected, is_enabled, color));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_selected && is_enabled, color));

    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal.draw(draw).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_action_button_marks_selection() {
        let text = rendered(|f| {
            render_action_button(f, f.area(), "Submit", true, true, Color::Green)
        });
        assert!(text.contains("▸Submit"));
    }

    #[test]
    fn test_menu_button_shows_key_and_label() {
        let text = rendered(|f| {
            render_menu_button(f, f.area(), "1", "Register", "new client", false)
        });
        assert!(text.contains(" 1 Register"));
        assert!(text.contains("new client"));
    }
}
