//src/app/state.rs
use super::form::ExerciseForm;
use fitdex_lib::{AppService, DetailsScreen, ExerciseSummary, Navigator, OriginFilter, Route};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Route history. The bottom entry is always the exercise list.
#[derive(Debug)]
pub struct NavStack {
    routes: Vec<Route>,
    changed: bool,
}

impl NavStack {
    pub fn new() -> Self {
        Self {
            routes: vec![Route::ExerciseList],
            changed: false,
        }
    }

    pub fn current(&self) -> &Route {
        // Never empty: go_back keeps the root
        &self.routes[self.routes.len() - 1]
    }

    /// True once per batch of navigation calls.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Navigator for NavStack {
    fn navigate(&mut self, route: Route) {
        log::debug!("navigate {route:?}");
        self.routes.push(route);
        self.changed = true;
    }

    fn go_back(&mut self) {
        if self.routes.len() > 1 {
            self.routes.pop();
            self.changed = true;
        }
    }
}

// Represents the state of active modals
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    OverflowMenu { selected: usize },
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub nav: NavStack,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    // === List Screen State ===
    pub exercises: Vec<ExerciseSummary>,
    pub exercise_list_state: ListState,

    // === Details Screen State ===
    pub details: Option<DetailsScreen>,

    // === Edit/Create Screen State ===
    pub form: Option<ExerciseForm>,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let mut app = Self {
            service,
            nav: NavStack::new(),
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            error_clear_time: None,
            exercises: Vec::new(),
            exercise_list_state: ListState::default(),
            details: None,
            form: None,
        };
        app.refresh_exercise_list();
        app
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        log::warn!("{msg}");
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
    }

    // Method to clear expired error messages (called every tick)
    pub(crate) fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub fn refresh_exercise_list(&mut self) {
        match self.service.list_exercises(OriginFilter::All, None) {
            Ok(exercises) => self.exercises = exercises,
            Err(e) => self.set_error(format!("Failed to load exercises: {e}")),
        }
        let selected = match self.exercise_list_state.selected() {
            _ if self.exercises.is_empty() => None,
            Some(i) => Some(i.min(self.exercises.len() - 1)),
            None => Some(0),
        };
        self.exercise_list_state.select(selected);
    }

    pub fn selected_exercise(&self) -> Option<&ExerciseSummary> {
        self.exercise_list_state
            .selected()
            .and_then(|i| self.exercises.get(i))
    }

    /// Called every loop iteration: expires errors and collects finished fetches.
    pub fn tick(&mut self) {
        self.clear_expired_error();
        if let Some(details) = self.details.as_mut() {
            if details.tick() {
                log::debug!("Details for {} resolved", details.id());
            }
        }
    }

    /// Rebuilds the per-screen state after the route changed.
    pub fn sync_route(&mut self) {
        if !self.nav.take_changed() {
            return;
        }
        self.active_modal = ActiveModal::None;
        match self.nav.current().clone() {
            Route::ExerciseList => {
                self.details = None;
                self.form = None;
                self.refresh_exercise_list();
            }
            Route::ExerciseDetails(id) => {
                self.form = None;
                self.details = Some(self.service.open_details(id));
            }
            Route::EditExercise(custom_id) => {
                self.details = None;
                match self.service.get_custom_exercise(custom_id) {
                    Ok(Some(exercise)) => self.form = Some(ExerciseForm::edit(&exercise)),
                    Ok(None) => {
                        self.set_error(format!("Exercise {custom_id} no longer exists"));
                        self.nav.go_back();
                        self.sync_route();
                    }
                    Err(e) => {
                        self.set_error(format!("{e:#}"));
                        self.nav.go_back();
                        self.sync_route();
                    }
                }
            }
            Route::CreateExercise => {
                self.details = None;
                self.form = Some(ExerciseForm::create());
            }
        }
    }
}
