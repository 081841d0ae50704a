// src/ui/form_screen.rs
use crate::app::{App, FormField};
use fitdex_lib::i18n;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_form_screen(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    f.render_widget(Block::default().borders(Borders::ALL), area);
    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let mut constraints = vec![
        Constraint::Length(1), // Name label
        Constraint::Length(1), // Name input
        Constraint::Length(1), // Notes label
        Constraint::Length(1), // Notes input
        Constraint::Length(1), // Primary label
        Constraint::Length(1), // Primary input
        Constraint::Length(1), // Secondary label
        Constraint::Length(1), // Secondary input
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Buttons row
    ];
    if form.error_message.is_some() {
        constraints.push(Constraint::Length(1)); // Error Message
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner_area);

    let base_input_style = Style::default().fg(Color::White);
    let input_margin = Margin {
        vertical: 0,
        horizontal: 1,
    };
    let fields = [
        ("Name:", form.name_input.as_str(), FormField::Name),
        ("Notes:", form.notes_input.as_str(), FormField::Notes),
        (
            "Primary muscles (comma separated):",
            form.primary_input.as_str(),
            FormField::Primary,
        ),
        (
            "Secondary muscles (comma separated):",
            form.secondary_input.as_str(),
            FormField::Secondary,
        ),
    ];
    for (i, (label, value, field)) in fields.into_iter().enumerate() {
        let style = if form.focused_field == field {
            base_input_style.reversed()
        } else {
            base_input_style
        };
        f.render_widget(Paragraph::new(label), chunks[i * 2]);
        f.render_widget(
            Paragraph::new(value).style(style),
            chunks[i * 2 + 1].inner(&input_margin),
        );
    }

    let button_style = |field: FormField| {
        if form.focused_field == field {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    };
    let buttons = Line::from(vec![
        Span::styled(
            format!(" {} ", i18n::translate("save")),
            button_style(FormField::Confirm),
        ),
        Span::raw("   "),
        Span::styled(
            format!(" {} ", i18n::translate("cancel")),
            button_style(FormField::Cancel),
        ),
    ]);
    f.render_widget(Paragraph::new(buttons), chunks[9]);

    if let Some(error) = &form.error_message {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[10],
        );
    }

    // Cursor at the end of the focused text input
    let cursor = match form.focused_field {
        FormField::Name => Some((0, &form.name_input)),
        FormField::Notes => Some((1, &form.notes_input)),
        FormField::Primary => Some((2, &form.primary_input)),
        FormField::Secondary => Some((3, &form.secondary_input)),
        FormField::Confirm | FormField::Cancel => None,
    };
    if let Some((row, input)) = cursor {
        let input_area = chunks[row * 2 + 1].inner(&input_margin);
        let offset = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
        f.set_cursor(
            input_area.x.saturating_add(offset).min(input_area.right().saturating_sub(1)),
            input_area.y,
        );
    }
}
