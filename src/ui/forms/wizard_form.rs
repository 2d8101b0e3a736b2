//! Multi-step form rendering

use super::field_renderer::{draw_field, field_height};
use crate::app::App;
use crate::state::{FormAction, FormState};
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the active form with its action panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.state.form.as_ref() else {
        return;
    };

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(20), // Action panel
        ])
        .split(area);

    draw_form(frame, main_chunks[0], form);
    draw_action_panel(frame, main_chunks[1], form);
}

fn draw_form(frame: &mut Frame, area: Rect, form: &FormState) {
    let border_color = if form.is_action_row_active() && !form.current_step().is_summary() {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" {} ", form.wizard().schema().title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Step progress
            Constraint::Min(0),    // Fields
            Constraint::Length(1), // Hint
        ])
        .horizontal_margin(1)
        .split(inner);

    draw_progress(frame, chunks[0], form);
    if form.current_step().is_summary() {
        draw_review(frame, chunks[1], form);
    } else {
        draw_fields(frame, chunks[1], form);
    }
    draw_hint(frame, chunks[2], form);
}

fn draw_progress(frame: &mut Frame, area: Rect, form: &FormState) {
    let wizard = form.wizard();
    let current = wizard.step_index();
    let mut spans = Vec::new();
    for (idx, step) in wizard.schema().steps.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = if idx < current {
            ("✓", Style::default().fg(Color::Green))
        } else if idx == current {
            (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(format!("{marker} {}", step.title), style));
    }

    let counter = Line::from(Span::styled(
        format!("Step {} of {}", current + 1, wizard.step_count()),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(vec![Line::from(spans), counter]),
        area,
    );
}

fn draw_fields(frame: &mut Frame, area: Rect, form: &FormState) {
    let fields = form.step_fields();
    let heights: Vec<u16> = fields.iter().map(|spec| field_height(spec, form)).collect();
    let first = first_visible(&heights, form.active_field_index, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (idx, spec) in fields.iter().enumerate().skip(first) {
        // The active field is clipped rather than skipped when it cannot fit
        let height = heights[idx].min(bottom.saturating_sub(y));
        if height == 0 || (height < heights[idx] && idx != form.active_field_index) {
            break;
        }
        let field_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        draw_field(frame, field_area, spec, form, idx == form.active_field_index);
        y += height;
    }
}

/// First field to draw so that the active one fits in `available` rows
pub fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    let Some(last) = heights.len().checked_sub(1) else {
        return 0;
    };
    let active = active.min(last);
    let mut first = 0;
    let mut used: u16 = heights[..=active].iter().sum();
    while used > available && first < active {
        used -= heights[first];
        first += 1;
    }
    first
}

/// Read-only summary of everything entered so far
fn draw_review(frame: &mut Frame, area: Rect, form: &FormState) {
    let wizard = form.wizard();
    let schema = wizard.schema();
    let mut lines = Vec::new();
    for step in schema.steps.iter().filter(|s| !s.is_summary()) {
        lines.push(Line::from(Span::styled(
            step.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for name in step.fields {
            let label = schema.label_for(name);
            let value = wizard
                .draft()
                .get(name)
                .map(|v| v.display_value())
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("  {label}: "), Style::default().fg(Color::Gray)),
                Span::raw(value),
            ]));
        }
    }

    for (key, reason) in wizard.errors().iter() {
        lines.push(Line::from(Span::styled(
            format!("{}: {reason}", schema.label_for(key)),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_hint(frame: &mut Frame, area: Rect, form: &FormState) {
    let hint = match form.active_spec() {
        Some(spec) if !spec.hint.is_empty() => spec.hint.to_string(),
        Some(_) => String::new(),
        None => format!("Enter: {}", form.selected_action().label()),
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_action_panel(frame: &mut Frame, area: Rect, form: &FormState) {
    let is_focused = form.is_action_row_active();
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let actions = form.actions();
    let mut constraints: Vec<Constraint> = actions
        .iter()
        .map(|_| Constraint::Length(BUTTON_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let button_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner_area);

    let submitting = form.wizard().is_submitting();
    for (idx, action) in actions.iter().enumerate() {
        let (label, color, enabled) = match action {
            FormAction::Submit if submitting => ("Submitting...", Color::Green, false),
            FormAction::Submit => ("Submit", Color::Green, form.wizard().can_submit()),
            FormAction::Next => ("Next", Color::Blue, !submitting),
            FormAction::Back => ("Back", Color::Yellow, !submitting),
            FormAction::Cancel => ("Cancel", Color::Gray, true),
        };
        render_action_button(
            frame,
            button_chunks[idx],
            label,
            is_focused && idx == form.selected_button,
            enabled,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_visible_keeps_active_on_screen() {
        let heights = [3, 3, 7, 3];
        assert_eq!(first_visible(&heights, 0, 10), 0);
        assert_eq!(first_visible(&heights, 2, 13), 0);
        assert_eq!(first_visible(&heights, 2, 10), 1);
        assert_eq!(first_visible(&heights, 3, 10), 2);
    }

    #[test]
    fn test_first_visible_action_row_and_empty() {
        assert_eq!(first_visible(&[3, 3, 3], 5, 6), 1);
        assert_eq!(first_visible(&[], 0, 6), 0);
    }

    #[test]
    fn test_first_visible_oversized_active_field() {
        assert_eq!(first_visible(&[3, 8], 1, 5), 1);
    }
}
