// src/ui/list_screen.rs
use crate::app::App;
use fitdex_lib::i18n;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render_list_screen(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if app.exercises.is_empty() {
        f.render_widget(Paragraph::new("No exercises.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .exercises
        .iter()
        .map(|e| {
            // Custom exercises are marked so they can be told apart from built-ins
            let marker = if e.id.is_custom() { "* " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::raw(e.name.clone()),
                Span::styled(
                    format!("  {}", i18n::muscle_names(&e.primary)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.exercise_list_state);
}
