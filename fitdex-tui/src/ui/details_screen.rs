// src/ui/details_screen.rs
use crate::app::App;
use crate::ui::layout::to_color;
use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_details_screen(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    f.render_widget(block, area);

    // Loading, deleting and not found all render an empty screen
    let Some(body) = app.details.as_ref().and_then(|d| d.body()) else {
        return;
    };
    let accent = to_color(app.service.config.theme.header());

    let mut lines = vec![
        Line::from(body.title).style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Line::from(""),
    ];
    if let Some(notes) = body.notes {
        lines.push(Line::from(notes).style(Style::new().italic()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(body.primary_caption).style(Style::new().bold()));
    lines.push(Line::from(body.primary_muscles));
    if let Some((caption, names)) = body.secondary {
        lines.push(Line::from(""));
        lines.push(Line::from(caption).style(Style::new().bold()));
        lines.push(Line::from(names));
    }

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 2,
        }),
    );
}
