// fitdex-lib/src/details.rs
use crate::actions::{ActionCoordinator, HeaderControls};
use crate::exercise::{Exercise, ExerciseId};
use crate::i18n;
use crate::resolver::Resolution;
use std::sync::Arc;

/// Everything the details view shows for one exercise, already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailBody {
    pub title: String,
    pub notes: Option<String>,
    pub primary_caption: String,
    pub primary_muscles: String,
    /// Caption and names; absent when the exercise has no secondary muscles.
    pub secondary: Option<(String, String)>,
    pub delete_dialog_title: String,
    pub delete_dialog_description: String,
}

impl DetailBody {
    #[must_use]
    pub fn from_exercise(exercise: &Exercise) -> Self {
        let notes = exercise
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let secondary = (!exercise.secondary.is_empty()).then(|| {
            (
                i18n::translate_count("secondary_muscle", exercise.secondary.len()),
                i18n::muscle_names(&exercise.secondary),
            )
        });
        Self {
            title: i18n::exercise_name(exercise),
            notes,
            primary_caption: i18n::translate("primary_muscle"),
            primary_muscles: i18n::muscle_names(&exercise.primary),
            secondary,
            delete_dialog_title: i18n::translate("delete__exercise_title"),
            delete_dialog_description: i18n::translate("delete__exercise_description"),
        }
    }
}

/// Model of one exercise details screen: the resolved record plus the
/// header action state machine.
#[derive(Debug)]
pub struct DetailsScreen {
    id: ExerciseId,
    resolution: Resolution,
    actions: Option<ActionCoordinator>,
}

impl DetailsScreen {
    #[must_use]
    pub fn open(id: ExerciseId, resolution: Resolution) -> Self {
        let actions = ActionCoordinator::for_exercise(&id);
        Self {
            id,
            resolution,
            actions,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ExerciseId {
        &self.id
    }

    /// Polls a pending fetch; true when the record (or its absence) just arrived.
    pub fn tick(&mut self) -> bool {
        self.resolution.poll()
    }

    /// Blocks until a pending fetch finishes.
    pub fn wait(&mut self) {
        if self.resolution.is_pending() {
            let resolution = std::mem::replace(&mut self.resolution, Resolution::Ready(None));
            self.resolution = Resolution::Ready(resolution.wait());
        }
    }

    #[must_use]
    pub const fn is_resolving(&self) -> bool {
        self.resolution.is_pending()
    }

    #[must_use]
    pub const fn exercise(&self) -> Option<&Arc<Exercise>> {
        self.resolution.exercise()
    }

    /// Decided by the id alone, so a custom exercise shows its controls
    /// even while its record is still loading.
    #[must_use]
    pub fn header_controls(&self) -> Option<HeaderControls> {
        if self.is_deleting() {
            return None;
        }
        HeaderControls::for_exercise(&self.id)
    }

    #[must_use]
    pub const fn actions(&self) -> Option<&ActionCoordinator> {
        self.actions.as_ref()
    }

    pub fn actions_mut(&mut self) -> Option<&mut ActionCoordinator> {
        self.actions.as_mut()
    }

    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.actions.as_ref().is_some_and(ActionCoordinator::is_deleting)
    }

    /// The dialog is part of the body: nothing shows until the record is known.
    #[must_use]
    pub fn is_delete_dialog_visible(&self) -> bool {
        self.exercise().is_some()
            && self
                .actions
                .as_ref()
                .is_some_and(ActionCoordinator::is_dialog_visible)
    }

    /// The open delete dialog's title and description, taken from the body.
    #[must_use]
    pub fn delete_dialog(&self) -> Option<(String, String)> {
        if !self.is_delete_dialog_visible() {
            return None;
        }
        self.body()
            .map(|body| (body.delete_dialog_title, body.delete_dialog_description))
    }

    /// What to render. `None` means render nothing: deleting, still
    /// loading, or no such exercise.
    #[must_use]
    pub fn body(&self) -> Option<DetailBody> {
        if self.is_deleting() {
            return None;
        }
        self.exercise().map(|e| DetailBody::from_exercise(e))
    }
}
