// src/ui/status_bar.rs
use crate::app::{ActiveModal, App};
use fitdex_lib::Route;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let dialog_visible = app
        .details
        .as_ref()
        .is_some_and(fitdex_lib::DetailsScreen::is_delete_dialog_visible);
    let has_controls = app
        .details
        .as_ref()
        .is_some_and(|d| d.header_controls().is_some());

    let status_text = match app.active_modal {
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::OverflowMenu { .. } => " [↑↓/jk] Nav | [Enter] Select | [Esc] Close ",
        ActiveModal::None if dialog_visible => " [y] Delete | [n/Esc] Cancel | [e]dit ",
        ActiveModal::None => match app.nav.current() {
            Route::ExerciseList => " [↑↓/jk] Nav | [Enter] Open | [c]reate | [?] Help | [q]uit ",
            Route::ExerciseDetails(_) if has_controls => {
                " [e]dit | [m]ore | [Esc] Back | [?] Help | [q]uit "
            }
            Route::ExerciseDetails(_) => " [Esc] Back | [?] Help | [q]uit ",
            Route::EditExercise(_) | Route::CreateExercise => {
                " [Tab/↑↓] Navigate | [Enter] Next/Confirm | [Esc] Cancel "
            }
        },
    };

    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
