// src/app/actions.rs
use super::form::{AppInputError, FormOutcome};
use super::navigation_helpers::{index_next, index_previous, list_next, list_previous};
use super::state::{ActiveModal, App};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use fitdex_lib::{DbError, ExerciseId, ExerciseUpdate, Navigator, Route};

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
        } else {
            match self.nav.current().clone() {
                Route::ExerciseList => self.handle_list_input(key),
                Route::ExerciseDetails(_) => self.handle_details_input(key),
                Route::EditExercise(_) | Route::CreateExercise => self.handle_form_input(key),
            }
        }
        self.sync_route();
        Ok(())
    }

    // Keys shared by the non-form screens
    fn handle_global_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            _ => return false,
        }
        true
    }

    // --- Modal Input Handling ---
    fn handle_modal_input(&mut self, key: KeyEvent) {
        match self.active_modal {
            ActiveModal::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::OverflowMenu { selected } => self.handle_overflow_input(key, selected),
            ActiveModal::None => {}
        }
    }

    fn handle_overflow_input(&mut self, key: KeyEvent, selected: usize) {
        let action_count = self
            .details
            .as_ref()
            .and_then(|d| d.header_controls())
            .map_or(0, |c| c.overflow_actions.len());
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => {
                self.active_modal = ActiveModal::OverflowMenu {
                    selected: index_previous(selected, action_count),
                };
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.active_modal = ActiveModal::OverflowMenu {
                    selected: index_next(selected, action_count),
                };
            }
            KeyCode::Enter => {
                self.active_modal = ActiveModal::None;
                if let Some(actions) = self.details.as_mut().and_then(|d| d.actions_mut()) {
                    actions.select_overflow(selected);
                }
            }
            KeyCode::Esc | KeyCode::Char('m') => self.active_modal = ActiveModal::None,
            _ => {}
        }
    }

    // --- Screen Input Handling ---
    fn handle_list_input(&mut self, key: KeyEvent) {
        if self.handle_global_input(key) {
            return;
        }
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => {
                list_previous(&mut self.exercise_list_state, self.exercises.len());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                list_next(&mut self.exercise_list_state, self.exercises.len());
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(id) = self.selected_exercise().map(|e| e.id.clone()) {
                    self.nav.navigate(Route::ExerciseDetails(id));
                }
            }
            KeyCode::Char('c') => self.nav.navigate(Route::CreateExercise),
            _ => {}
        }
    }

    fn handle_details_input(&mut self, key: KeyEvent) {
        let Some(details) = self.details.as_mut() else {
            return;
        };

        // Edit stays available while the delete dialog is up
        if key.code == KeyCode::Char('e') {
            if let Some(actions) = details.actions() {
                actions.edit(&mut self.nav);
            }
            return;
        }

        if details.is_delete_dialog_visible() {
            let Some(actions) = details.actions_mut() else {
                return;
            };
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    let result = actions.confirm_delete(&self.service.store, &mut self.nav);
                    if let Some(Err(e)) = result {
                        self.set_error(delete_error_message(&e));
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    actions.dismiss_delete();
                }
                _ => {}
            }
            return;
        }

        if details.is_deleting() {
            return;
        }
        let has_controls = details.header_controls().is_some();
        if self.handle_global_input(key) {
            return;
        }
        match key.code {
            KeyCode::Char('m') if has_controls => {
                self.active_modal = ActiveModal::OverflowMenu { selected: 0 };
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                self.nav.go_back();
            }
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            FormOutcome::Continue => {}
            FormOutcome::Cancel => self.nav.go_back(),
            FormOutcome::Submit => match self.submit_form() {
                Ok(()) => self.nav.go_back(),
                Err(e) => {
                    if let Some(form) = self.form.as_mut() {
                        form.error_message = Some(e.to_string());
                    }
                }
            },
        }
    }

    fn submit_form(&mut self) -> Result<(), AppInputError> {
        let Some(form) = self.form.as_ref() else {
            return Ok(());
        };
        let values = form.values()?;
        let result = match form.editing {
            Some(custom_id) => self
                .service
                .edit_exercise(
                    &ExerciseId::Custom(custom_id),
                    ExerciseUpdate::from(values),
                )
                .map(|_| ()),
            None => self
                .service
                .create_exercise(
                    &values.name,
                    values.notes.as_deref(),
                    &values.primary,
                    &values.secondary,
                )
                .map(|id| log::info!("Created exercise {id}")),
        };
        result.map_err(|e| AppInputError::DbError(e.to_string()))
    }
}

fn delete_error_message(e: &DbError) -> String {
    match e {
        DbError::ExerciseNotFound(id) => format!("Exercise {id} was already gone"),
        other => format!("Delete failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitdex_lib::{
        AppService, Catalog, Config, DeleteState, ExerciseResolver, ExerciseStore, Muscle,
    };

    fn test_app() -> App {
        let service = AppService {
            config: Config::default(),
            store: ExerciseStore::open_in_memory().unwrap(),
            resolver: ExerciseResolver::new(Catalog::bundled().unwrap()),
            db_path: ":memory:".into(),
            config_path: "test_config.toml".into(),
        };
        App::new(service)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code)).unwrap();
    }

    fn open_custom(app: &mut App) -> ExerciseId {
        let id = app
            .service
            .create_exercise("Cable Curl", None, &[Muscle::Biceps], &[])
            .unwrap();
        app.nav.navigate(Route::ExerciseDetails(id.clone()));
        app.sync_route();
        wait_for_details(app);
        id
    }

    fn wait_for_details(app: &mut App) {
        for _ in 0..200 {
            if app.details.as_ref().is_some_and(|d| !d.is_resolving()) {
                return;
            }
            app.tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        panic!("details fetch did not finish");
    }

    fn delete_state(app: &App) -> Option<DeleteState> {
        app.details
            .as_ref()
            .and_then(|d| d.actions())
            .map(|a| a.state())
    }

    #[test]
    fn enter_opens_details_of_selected_exercise() {
        let mut app = test_app();
        let selected = app.selected_exercise().unwrap().id.clone();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.current(), &Route::ExerciseDetails(selected.clone()));
        assert_eq!(app.details.as_ref().map(|d| d.id().clone()), Some(selected));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.current(), &Route::ExerciseList);
        assert!(app.details.is_none());
    }

    #[test]
    fn built_in_details_ignore_overflow_and_edit() {
        let mut app = test_app();
        let plank: ExerciseId = "plank".parse().unwrap();
        app.nav.navigate(Route::ExerciseDetails(plank.clone()));
        app.sync_route();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.active_modal, ActiveModal::None);
        assert_eq!(app.nav.current(), &Route::ExerciseDetails(plank));
    }

    #[test]
    fn delete_dismiss_then_confirm() {
        let mut app = test_app();
        let id = open_custom(&mut app);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.active_modal, ActiveModal::OverflowMenu { selected: 0 });
        press(&mut app, KeyCode::Enter);
        assert_eq!(delete_state(&app), Some(DeleteState::ConfirmingDelete));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(delete_state(&app), Some(DeleteState::Idle));
        assert!(app.service.resolve_exercise(&id).is_some());

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.nav.current(), &Route::ExerciseList);
        assert!(app.exercises.iter().all(|e| e.id != id));
        assert!(app.last_error.is_none());
    }

    #[test]
    fn missing_exercise_keeps_delete_dialog_hidden() {
        let mut app = test_app();
        app.nav
            .navigate(Route::ExerciseDetails("custom_999".parse().unwrap()));
        app.sync_route();
        wait_for_details(&mut app);

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(delete_state(&app), Some(DeleteState::ConfirmingDelete));

        let details = app.details.as_ref().unwrap();
        assert!(details.body().is_none());
        assert!(!details.is_delete_dialog_visible());
        assert!(details.delete_dialog().is_none());

        // Confirm keys do nothing without a visible dialog
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(delete_state(&app), Some(DeleteState::ConfirmingDelete));
        assert!(matches!(app.nav.current(), Route::ExerciseDetails(_)));
    }

    #[test]
    fn edit_works_with_dialog_open() {
        let mut app = test_app();
        let id = open_custom(&mut app);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('e'));
        let custom_id = id.as_custom().unwrap();
        assert_eq!(app.nav.current(), &Route::EditExercise(custom_id));
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.editing, Some(custom_id));
        assert_eq!(form.name_input, "Cable Curl");
        assert_eq!(form.primary_input, "biceps");
    }

    #[test]
    fn create_form_submits_and_returns_to_list() {
        let mut app = test_app();
        let before = app.exercises.len();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.nav.current(), &Route::CreateExercise);

        for c in "Landmine Press".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab); // notes
        press(&mut app, KeyCode::Tab); // primary
        for c in "shoulders".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab); // secondary
        press(&mut app, KeyCode::Tab); // confirm
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.nav.current(), &Route::ExerciseList);
        assert_eq!(app.exercises.len(), before + 1);
        assert!(app.exercises.iter().any(|e| e.name == "Landmine Press"));
    }

    #[test]
    fn form_errors_stay_on_the_form() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'));
        for c in "Nameless".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // No primary muscle
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.current(), &Route::CreateExercise);
        let error = app.form.as_ref().unwrap().error_message.clone().unwrap();
        assert!(error.contains("primary muscle"));
    }
}
