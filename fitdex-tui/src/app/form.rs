// src/app/form.rs
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fitdex_lib::{
    exercise::join_muscle_codes, parse_muscle_list, CustomId, Exercise, ExerciseUpdate, Muscle,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppInputError {
    #[error("Exercise name cannot be empty")]
    ExerciseNameEmpty,
    #[error("Invalid {field} muscles: {message}")]
    InvalidMuscles {
        field: &'static str,
        message: String,
    },
    #[error("{0}")]
    DbError(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Notes,
    Primary,
    Secondary,
    Confirm,
    Cancel,
}

impl FormField {
    const ORDER: [Self; 6] = [
        Self::Name,
        Self::Notes,
        Self::Primary,
        Self::Secondary,
        Self::Confirm,
        Self::Cancel,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub const fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Notes | Self::Primary | Self::Secondary)
    }
}

/// What the app should do after the form consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Submit,
    Cancel,
}

/// Validated form contents.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub name: String,
    pub notes: Option<String>,
    pub primary: Vec<Muscle>,
    pub secondary: Vec<Muscle>,
}

impl From<FormValues> for ExerciseUpdate {
    fn from(values: FormValues) -> Self {
        Self {
            name: Some(values.name),
            notes: Some(values.notes),
            primary: Some(values.primary),
            secondary: Some(values.secondary),
        }
    }
}

/// Edit/create screen for a custom exercise. Muscles are typed as
/// comma-separated codes ("chest, triceps").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseForm {
    pub editing: Option<CustomId>,
    pub name_input: String,
    pub notes_input: String,
    pub primary_input: String,
    pub secondary_input: String,
    pub focused_field: FormField,
    pub error_message: Option<String>,
}

impl ExerciseForm {
    pub fn create() -> Self {
        Self {
            editing: None,
            name_input: String::new(),
            notes_input: String::new(),
            primary_input: String::new(),
            secondary_input: String::new(),
            focused_field: FormField::Name,
            error_message: None,
        }
    }

    pub fn edit(exercise: &Exercise) -> Self {
        Self {
            editing: exercise.id.as_custom(),
            name_input: exercise.name.clone(),
            notes_input: exercise.notes.clone().unwrap_or_default(),
            primary_input: join_muscle_codes(&exercise.primary),
            secondary_input: join_muscle_codes(&exercise.secondary),
            ..Self::create()
        }
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focused_field {
            FormField::Name => Some(&mut self.name_input),
            FormField::Notes => Some(&mut self.notes_input),
            FormField::Primary => Some(&mut self.primary_input),
            FormField::Secondary => Some(&mut self.secondary_input),
            FormField::Confirm | FormField::Cancel => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        // Always clear error on any input
        self.error_message = None;

        if key.code == KeyCode::BackTab
            || (key.modifiers == KeyModifiers::SHIFT && key.code == KeyCode::Tab)
        {
            self.focused_field = self.focused_field.previous();
            return FormOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => self.focused_field = self.focused_field.next(),
            KeyCode::Up => self.focused_field = self.focused_field.previous(),
            KeyCode::Enter => match self.focused_field {
                FormField::Confirm => return FormOutcome::Submit,
                FormField::Cancel => return FormOutcome::Cancel,
                _ => self.focused_field = self.focused_field.next(),
            },
            KeyCode::Left | KeyCode::Right if !self.focused_field.is_text() => {
                self.focused_field = if self.focused_field == FormField::Confirm {
                    FormField::Cancel
                } else {
                    FormField::Confirm
                };
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.pop();
                }
            }
            _ => {}
        }
        FormOutcome::Continue
    }

    /// Parses the inputs. The service repeats the semantic checks; this only
    /// catches what can be told from the text alone.
    pub fn values(&self) -> Result<FormValues, AppInputError> {
        let name = self.name_input.trim();
        if name.is_empty() {
            return Err(AppInputError::ExerciseNameEmpty);
        }
        let primary = parse_muscle_list(&self.primary_input).map_err(|e| {
            AppInputError::InvalidMuscles {
                field: "primary",
                message: e.to_string(),
            }
        })?;
        let secondary = parse_muscle_list(&self.secondary_input).map_err(|e| {
            AppInputError::InvalidMuscles {
                field: "secondary",
                message: e.to_string(),
            }
        })?;
        let notes = Some(self.notes_input.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(FormValues {
            name: name.to_string(),
            notes,
            primary,
            secondary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut ExerciseForm, code: KeyCode) -> FormOutcome {
        form.handle_key(KeyEvent::from(code))
    }

    fn type_str(form: &mut ExerciseForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = ExerciseForm::create();
        type_str(&mut form, "Curl");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "biceps");
        press(&mut form, KeyCode::Backspace);
        assert_eq!(form.name_input, "Curl");
        assert_eq!(form.primary_input, "bicep");
        assert_eq!(form.focused_field, FormField::Primary);
    }

    #[test]
    fn enter_on_buttons_submits_or_cancels() {
        let mut form = ExerciseForm::create();
        form.focused_field = FormField::Secondary;
        assert_eq!(press(&mut form, KeyCode::Enter), FormOutcome::Continue);
        assert_eq!(form.focused_field, FormField::Confirm);
        assert_eq!(press(&mut form, KeyCode::Enter), FormOutcome::Submit);
        press(&mut form, KeyCode::Right);
        assert_eq!(press(&mut form, KeyCode::Enter), FormOutcome::Cancel);
        assert_eq!(press(&mut form, KeyCode::Esc), FormOutcome::Cancel);
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut form = ExerciseForm::create();
        press(&mut form, KeyCode::BackTab);
        assert_eq!(form.focused_field, FormField::Cancel);
    }

    #[test]
    fn values_reject_bad_input() {
        let mut form = ExerciseForm::create();
        assert_eq!(form.values(), Err(AppInputError::ExerciseNameEmpty));
        form.name_input = "Curl".into();
        form.primary_input = "biceps, wings".into();
        assert!(matches!(
            form.values(),
            Err(AppInputError::InvalidMuscles { field: "primary", .. })
        ));
        form.primary_input = "biceps".into();
        form.notes_input = "   ".into();
        let values = form.values().unwrap();
        assert_eq!(values.primary, vec![Muscle::Biceps]);
        assert!(values.secondary.is_empty());
        assert!(values.notes.is_none());
    }
}
