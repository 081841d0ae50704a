// fitdex-lib/src/actions.rs
//! Edit/delete actions of the exercise details screen.
use crate::db::{DbError, ExerciseStore};
use crate::exercise::{CustomId, ExerciseId};
use crate::i18n;

/// Overflow menu index of the "Delete" entry.
pub const DELETE_ACTION_INDEX: usize = 0;

/// Screens the front ends can navigate between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ExerciseList,
    ExerciseDetails(ExerciseId),
    EditExercise(CustomId),
    CreateExercise,
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
    fn go_back(&mut self);
}

/// The delete half of the custom store, as the coordinator sees it.
pub trait ExerciseRemover {
    fn remove(&self, id: CustomId) -> Result<u64, DbError>;
}

impl ExerciseRemover for ExerciseStore {
    fn remove(&self, id: CustomId) -> Result<u64, DbError> {
        self.delete_by_id(id)
    }
}

/// Controls shown in the details screen header. Only custom exercises get any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderControls {
    pub edit_label: String,
    pub overflow_actions: Vec<String>,
    pub destructive_index: usize,
}

impl HeaderControls {
    #[must_use]
    pub fn for_exercise(id: &ExerciseId) -> Option<Self> {
        id.is_custom().then(|| Self {
            edit_label: i18n::translate("edit"),
            overflow_actions: vec![i18n::translate("delete")],
            destructive_index: DELETE_ACTION_INDEX,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    ConfirmingDelete,
    Deleting, // Terminal
}

/// State machine behind the header actions of one details screen instance.
#[derive(Debug)]
pub struct ActionCoordinator {
    id: CustomId,
    state: DeleteState,
}

impl ActionCoordinator {
    /// Built-in exercises have no actions, so they get no coordinator.
    #[must_use]
    pub const fn for_exercise(id: &ExerciseId) -> Option<Self> {
        match id {
            ExerciseId::Custom(custom_id) => Some(Self {
                id: *custom_id,
                state: DeleteState::Idle,
            }),
            ExerciseId::BuiltIn(_) => None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CustomId {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> DeleteState {
        self.state
    }

    #[must_use]
    pub fn is_dialog_visible(&self) -> bool {
        self.state == DeleteState::ConfirmingDelete
    }

    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.state == DeleteState::Deleting
    }

    /// Opens the edit screen. Works with or without the delete dialog up,
    /// but not once deletion started. Returns whether navigation happened.
    pub fn edit(&self, nav: &mut impl Navigator) -> bool {
        if self.is_deleting() {
            return false;
        }
        nav.navigate(Route::EditExercise(self.id));
        true
    }

    /// Overflow menu selection. Only `DELETE_ACTION_INDEX` does anything.
    pub fn select_overflow(&mut self, index: usize) -> bool {
        if index != DELETE_ACTION_INDEX || self.state != DeleteState::Idle {
            return false;
        }
        self.state = DeleteState::ConfirmingDelete;
        true
    }

    pub fn dismiss_delete(&mut self) -> bool {
        if self.state != DeleteState::ConfirmingDelete {
            return false;
        }
        self.state = DeleteState::Idle;
        true
    }

    /// Enters `Deleting`, asks the store to delete and navigates back.
    /// A failed delete is logged and returned, but never blocks the back
    /// navigation.
    pub fn confirm_delete(
        &mut self,
        remover: &impl ExerciseRemover,
        nav: &mut impl Navigator,
    ) -> Option<Result<u64, DbError>> {
        if self.state != DeleteState::ConfirmingDelete {
            return None;
        }
        self.state = DeleteState::Deleting;
        let result = remover.remove(self.id);
        match &result {
            Ok(_) => log::info!("Deleted custom exercise {}", self.id),
            Err(e) => log::error!("Failed to delete custom exercise {}: {e}", self.id),
        }
        nav.go_back();
        Some(result)
    }
}
