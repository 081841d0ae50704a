// fitdex-lib/src/catalog.rs
use crate::exercise::{Exercise, ExerciseId};
use std::collections::HashSet;
use thiserror::Error;

const BUNDLED_EXERCISES: &str = include_str!("../data/exercises.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse exercise dataset (JSON): {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Dataset entry '{0}' uses the custom exercise id shape")]
    CustomIdInDataset(String),
    #[error("Duplicate exercise id in dataset: '{0}'")]
    DuplicateId(String),
}

/// The static, read-only exercise dataset. Loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    /// Parses the dataset embedded in the binary.
    /// # Errors
    /// Returns `CatalogError` if the embedded JSON is malformed or inconsistent.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_EXERCISES)
    }

    /// Parses a dataset from a JSON array of exercises.
    /// # Errors
    /// - `CatalogError::Parse` for invalid JSON, ids or muscle codes.
    /// - `CatalogError::CustomIdInDataset` if an entry looks like a custom id.
    /// - `CatalogError::DuplicateId` if two entries share an id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let exercises: Vec<Exercise> = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for exercise in &exercises {
            if exercise.id.is_custom() {
                return Err(CatalogError::CustomIdInDataset(exercise.id.to_string()));
            }
            if !seen.insert(&exercise.id) {
                return Err(CatalogError::DuplicateId(exercise.id.to_string()));
            }
        }
        log::debug!("Loaded {} built-in exercises", exercises.len());
        Ok(Self { exercises })
    }

    /// Linear scan for a built-in id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.exercises
            .iter()
            .find(|e| matches!(&e.id, ExerciseId::BuiltIn(built_in) if built_in == id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
