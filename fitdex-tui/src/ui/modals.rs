// src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::{centered_rect, centered_rect_fixed},
};
use fitdex_lib::i18n;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::OverflowMenu { selected } => render_overflow_menu(f, app, *selected),
        ActiveModal::None => {}
    }
    // The delete dialog belongs to the details screen, not the modal slot
    if let Some((title, description)) = app
        .details
        .as_ref()
        .and_then(fitdex_lib::DetailsScreen::delete_dialog)
    {
        render_delete_dialog(f, &title, &description);
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q: Quit Application"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(""),
        Line::from("--- Exercise List ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑: Navigate Up"),
        Line::from(" j / ↓: Navigate Down"),
        Line::from(" Enter / l: Open Exercise"),
        Line::from(" c: Create Custom Exercise"),
        Line::from(""),
        Line::from("--- Exercise Details ---").style(Style::new().bold().underlined()),
        Line::from(" e: Edit (custom exercises only)"),
        Line::from(" m: More Actions (Delete)"),
        Line::from(" y / n: Confirm or Dismiss Deletion"),
        Line::from(" Esc / h: Back"),
        Line::from(""),
        Line::from("--- Edit / Create ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / ↓: Next Field"),
        Line::from(" Shift+Tab / ↑: Previous Field"),
        Line::from(" Enter: Next Field / Press Button"),
        Line::from(" Esc: Cancel"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_overflow_menu(f: &mut Frame, app: &App, selected: usize) {
    let Some(controls) = app.details.as_ref().and_then(|d| d.header_controls()) else {
        return;
    };
    let items: Vec<ListItem> = controls
        .overflow_actions
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == controls.destructive_index {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            ListItem::new(label.as_str()).style(style)
        })
        .collect();

    let width = controls
        .overflow_actions
        .iter()
        .map(|a| a.chars().count())
        .max()
        .map_or(10, |w| u16::try_from(w).unwrap_or(u16::MAX).saturating_add(8));
    let height = u16::try_from(items.len()).unwrap_or(u16::MAX).saturating_add(2);
    let size = f.size();
    // Anchored under the header's right edge
    let area = ratatui::layout::Rect {
        x: size.right().saturating_sub(width.saturating_add(1)),
        y: size.y + 3,
        width: width.min(size.width),
        height: height.min(size.height.saturating_sub(3)),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_delete_dialog(f: &mut Frame, title: &str, description: &str) {
    let options = format!(
        "[Y] {} / [N] {} (Esc)",
        i18n::translate("delete"),
        i18n::translate("cancel")
    );

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::Red).add_modifier(Modifier::BOLD));

    let modal_width = 54;
    let modal_height = 7;
    let area = centered_rect_fixed(modal_width, modal_height, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(2),    // Description
            Constraint::Length(1), // Options
        ])
        .split(inner_area);

    f.render_widget(
        Paragraph::new(description)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(options).alignment(Alignment::Center),
        chunks[1],
    );
}
