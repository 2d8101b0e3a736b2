//! Field rendering utilities for forms

use crate::state::{FieldSpec, FieldValue, FormState, InputKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";

/// Item rows shown for a list field; older entries collapse into one line
const MAX_ITEM_ROWS: usize = 5;

/// Rows a field needs, borders included
pub fn field_height(spec: &FieldSpec, form: &FormState) -> u16 {
    let draft = form.wizard().draft();
    let content = match spec.input_kind() {
        InputKind::Selection => spec.options().len(),
        InputKind::List | InputKind::Activities => {
            draft
                .get(spec.name)
                .and_then(FieldValue::item_count)
                .unwrap_or(0)
                .min(MAX_ITEM_ROWS)
                + 1
        }
        _ => 1,
    };
    content as u16 + 2
}

/// Validation message for a field, including refinements reported on it
pub fn field_error<'a>(spec: &FieldSpec, form: &'a FormState) -> Option<&'a str> {
    let wizard = form.wizard();
    wizard
        .errors()
        .get(spec.name)
        .or_else(|| form.input_error(spec.name))
        .or_else(|| {
            wizard
                .schema()
                .refinements_on(spec.name)
                .filter(|r| r.fields().last() == Some(&spec.name))
                .find_map(|r| wizard.errors().get(r.key()))
        })
}

/// Draw one field of the active step
pub fn draw_field(frame: &mut Frame, area: Rect, spec: &FieldSpec, form: &FormState, is_active: bool) {
    let error = field_error(spec, form);
    let border_color = match (is_active, error.is_some()) {
        (_, true) => Color::Red,
        (true, false) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let required = if spec.is_required() { " *" } else { "" };
    let wizard = form.wizard();
    let complete = wizard.draft().contains(spec.name) && wizard.check_field(spec.name).is_valid();
    let mut title = vec![Span::raw(format!(" {}{} ", spec.label, required))];
    if complete && error.is_none() {
        title.push(Span::styled("✓ ", Style::default().fg(Color::Green)));
    }
    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(reason) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {reason} "),
            Style::default().fg(Color::Red),
        )));
    }

    let lines = field_lines(spec, form, is_active);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn field_lines(spec: &FieldSpec, form: &FormState, is_active: bool) -> Vec<Line<'static>> {
    let draft = form.wizard().draft();
    let value_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = || Span::styled(CURSOR, Style::default().fg(Color::Cyan));
    let placeholder = |text: &str| Span::styled(text.to_string(), Style::default().fg(Color::DarkGray));

    match spec.input_kind() {
        InputKind::Text | InputKind::Date | InputKind::DateRange => {
            let typed = form.input(spec.name);
            let mut spans = Vec::new();
            if typed.is_empty() && !is_active {
                spans.push(placeholder(if spec.hint.is_empty() { "(empty)" } else { spec.hint }));
            } else {
                spans.push(Span::styled(typed.to_string(), value_style));
            }
            if is_active {
                spans.push(cursor());
            }
            vec![Line::from(spans)]
        }
        InputKind::Flag => {
            let checked = draft.flag(spec.name).unwrap_or(false);
            let mark = if checked { "[x] Yes" } else { "[ ] No" };
            vec![Line::from(Span::styled(mark, value_style))]
        }
        InputKind::Choice => {
            let span = match draft.text(spec.name) {
                Some(value) => Span::styled(format!("‹ {value} ›"), value_style),
                None => placeholder("‹ choose ›"),
            };
            vec![Line::from(span)]
        }
        InputKind::Selection => {
            let selected = draft.list(spec.name).unwrap_or(&[]);
            spec.options()
                .into_iter()
                .enumerate()
                .map(|(idx, (id, label))| {
                    let checked = selected.iter().any(|s| s == id);
                    let highlighted = is_active && idx == form.option_cursor;
                    let style = if highlighted {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        value_style
                    };
                    let mark = if checked { "[x]" } else { "[ ]" };
                    let mut spans = vec![Span::styled(format!("{mark} {label}"), style)];
                    if let Some(detail) = spec.option_detail(id).filter(|d| !d.is_empty()) {
                        spans.push(Span::styled(
                            format!(" ({detail})"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    Line::from(spans)
                })
                .collect()
        }
        InputKind::List | InputKind::Activities => {
            let items: Vec<String> = match spec.input_kind() {
                InputKind::Activities => draft
                    .activities(spec.name)
                    .unwrap_or(&[])
                    .iter()
                    .map(|a| format!("{}: {}", a.name, a.description))
                    .collect(),
                _ => draft.list(spec.name).unwrap_or(&[]).to_vec(),
            };
            let mut lines: Vec<Line> = Vec::new();
            let mut shown = &items[..];
            if items.len() > MAX_ITEM_ROWS {
                let hidden = items.len() - (MAX_ITEM_ROWS - 1);
                lines.push(placeholder(&format!("… {hidden} more above")).into());
                shown = &items[hidden..];
            }
            lines.extend(
                shown
                    .iter()
                    .map(|item| Line::from(Span::styled(format!("• {item}"), value_style))),
            );
            let typed = form.input(spec.name);
            let mut entry = vec![Span::styled("+ ", Style::default().fg(Color::DarkGray))];
            if typed.is_empty() && !is_active {
                entry.push(placeholder("add entry"));
            } else {
                entry.push(Span::styled(typed.to_string(), value_style));
            }
            if is_active {
                entry.push(cursor());
            }
            lines.push(Line::from(entry));
            lines
        }
    }
}
