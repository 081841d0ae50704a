// src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{
        details_screen::render_details_screen, form_screen::render_form_screen,
        list_screen::render_list_screen, modals::render_modal, status_bar::render_status_bar,
    },
};
use fitdex_lib::{i18n, Route, StandardColor};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Header on top, content below, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    render_header(f, app, main_chunks[0]);
    let route = app.nav.current().clone();
    match route {
        Route::ExerciseList => render_list_screen(f, app, main_chunks[1]),
        Route::ExerciseDetails(_) => render_details_screen(f, app, main_chunks[1]),
        Route::EditExercise(_) | Route::CreateExercise => {
            render_form_screen(f, app, main_chunks[1]);
        }
    }
    render_status_bar(f, app, main_chunks[2]);

    // Render modal last if active
    let dialog_visible = app
        .details
        .as_ref()
        .is_some_and(fitdex_lib::DetailsScreen::is_delete_dialog_visible);
    if app.active_modal != ActiveModal::None || dialog_visible {
        render_modal(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header_color = to_color(app.service.config.theme.header());
    let title = match app.nav.current() {
        Route::ExerciseList => i18n::translate("exercises__title"),
        Route::ExerciseDetails(_) => i18n::translate("exercise_details__title"),
        Route::EditExercise(_) => i18n::translate("edit_exercise__title"),
        Route::CreateExercise => i18n::translate("new_exercise__title"),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(header_color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(header_color).add_modifier(Modifier::BOLD),
        ));

    let controls = app.details.as_ref().and_then(|d| d.header_controls());
    let right = controls.map_or_else(Line::default, |c| {
        Line::from(vec![
            Span::styled("[e] ", Style::default().fg(Color::DarkGray)),
            Span::raw(c.edit_label),
            Span::styled("  [m] ", Style::default().fg(Color::DarkGray)),
            Span::raw("⋮"),
        ])
    });
    f.render_widget(
        Paragraph::new(right).alignment(Alignment::Right).block(block),
        area,
    );
}

pub fn to_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::LightRed,
        StandardColor::Green => Color::LightGreen,
        StandardColor::Yellow => Color::LightYellow,
        StandardColor::Blue => Color::LightBlue,
        StandardColor::Magenta => Color::LightMagenta,
        StandardColor::Cyan => Color::LightCyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::DarkRed => Color::Red,
        StandardColor::DarkGreen => Color::Green,
        StandardColor::DarkYellow => Color::Yellow,
        StandardColor::DarkBlue => Color::Blue,
        StandardColor::DarkMagenta => Color::Magenta,
        StandardColor::DarkCyan => Color::Cyan,
        StandardColor::Grey => Color::Gray,
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rectangle of a fixed size, clamped to `r`.
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
