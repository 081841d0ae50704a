// src/lib.rs
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// --- Declare modules ---
pub mod actions;
pub mod catalog;
mod config;
pub mod db;
pub mod details;
pub mod exercise;
pub mod i18n;
pub mod resolver;

// --- Expose public types ---
pub use actions::{
    ActionCoordinator, DeleteState, ExerciseRemover, HeaderControls, Navigator, Route,
    DELETE_ACTION_INDEX,
};
pub use catalog::{Catalog, CatalogError};
pub use config::{
    get_config_path as get_config_path_util, load_config as load_config_util, parse_color, Config,
    Error as ConfigError, StandardColor, Theme,
};
pub use db::{get_db_path as get_db_path_util, DbError, ExerciseStore};
pub use details::{DetailBody, DetailsScreen};
pub use exercise::{
    parse_muscle_list, CustomId, Exercise, ExerciseId, ExerciseSummary, ExerciseUpdate, Muscle,
    OriginFilter, ParseError,
};
pub use resolver::{ExerciseResolver, PendingFetch, Resolution};

pub struct AppService {
    pub config: Config,
    pub store: ExerciseStore,
    pub resolver: ExerciseResolver,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let store = ExerciseStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        let catalog = Catalog::bundled().context("Failed to load the bundled exercise dataset")?;
        log::debug!(
            "Service ready: {} built-in exercises, database at {db_path:?}",
            catalog.len()
        );

        Ok(Self {
            config,
            store,
            resolver: ExerciseResolver::new(catalog),
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Parses a user supplied identifier into a tagged id.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `ParseError` for empty or malformed ids.
    pub fn parse_exercise_id(identifier: &str) -> Result<ExerciseId> {
        identifier
            .parse::<ExerciseId>()
            .with_context(|| format!("Invalid exercise identifier '{identifier}'"))
    }

    /// Starts resolving `id` and returns the details screen model for it.
    /// Custom exercises arrive asynchronously; poll with `DetailsScreen::tick`.
    pub fn open_details(&mut self, id: ExerciseId) -> DetailsScreen {
        let resolution = self.resolver.resolve(&id, &self.store);
        DetailsScreen::open(id, resolution)
    }

    /// Resolves `id` and blocks until the record (or its absence) is known.
    pub fn resolve_exercise(&mut self, id: &ExerciseId) -> Option<Arc<Exercise>> {
        self.resolver.resolve(id, &self.store).wait()
    }

    /// Synchronous custom exercise lookup, used to prefill edit forms.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError` if the query fails.
    pub fn get_custom_exercise(&self, id: CustomId) -> Result<Option<Exercise>> {
        self.store
            .get_by_id(id)
            .map(|rows| rows.into_iter().next())
            .with_context(|| format!("Failed to load exercise {id}"))
    }

    /// Creates a custom exercise.
    /// # Errors
    /// Returns `anyhow::Error` if the name is empty, no primary muscle is
    /// given, a muscle is both primary and secondary, or DB insertion fails.
    pub fn create_exercise(
        &self,
        name: &str,
        notes: Option<&str>,
        primary: &[Muscle],
        secondary: &[Muscle],
    ) -> Result<ExerciseId> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        validate_muscles(primary, secondary)?;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        self.store
            .create(trimmed_name, notes, primary, secondary)
            .map(ExerciseId::Custom)
            .map_err(|db_err| match db_err {
                DbError::ExerciseNameNotUnique(_) => anyhow::anyhow!(db_err),
                _ => anyhow::Error::new(db_err)
                    .context(format!("Failed to create exercise '{trimmed_name}'")),
            })
    }

    /// Edits a custom exercise.
    /// # Errors
    /// Returns `anyhow::Error` if the id is built-in or unknown, the update is
    /// empty or invalid, or the DB update fails.
    pub fn edit_exercise(&self, id: &ExerciseId, update: ExerciseUpdate) -> Result<u64> {
        let Some(custom_id) = id.as_custom() else {
            bail!("Built-in exercise '{id}' cannot be edited.");
        };
        if update.is_empty() {
            bail!("No fields provided to update for exercise '{id}'.");
        }

        let current = self
            .get_custom_exercise(custom_id)?
            .ok_or_else(|| DbError::ExerciseNotFound(id.to_string()))?;

        let mut update = update;
        if let Some(name) = update.name.take() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                bail!("New exercise name cannot be empty if provided.");
            }
            update.name = Some(trimmed.to_string());
        }
        if let Some(notes) = update.notes.take() {
            update.notes = Some(
                notes
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            );
        }
        validate_muscles(
            update.primary.as_deref().unwrap_or(&current.primary),
            update.secondary.as_deref().unwrap_or(&current.secondary),
        )?;

        self.store
            .update(custom_id, &update)
            .map_err(|db_err| match db_err {
                DbError::ExerciseNameNotUnique(name) => {
                    anyhow::anyhow!("Name '{name}' is already taken.")
                }
                DbError::ExerciseNotFound(_) => {
                    anyhow::anyhow!("Exercise '{id}' not found to edit.")
                }
                _ => anyhow::Error::new(db_err)
                    .context(format!("Failed to update exercise '{id}'")),
            })
    }

    /// Lists built-in and/or custom exercises, optionally only those working
    /// `muscle` (as primary or secondary), sorted by display name.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError` if listing custom exercises fails.
    pub fn list_exercises(
        &self,
        origin: OriginFilter,
        muscle: Option<Muscle>,
    ) -> Result<Vec<ExerciseSummary>> {
        let mut exercises: Vec<Exercise> = Vec::new();
        if origin != OriginFilter::Custom {
            exercises.extend(self.resolver.catalog().iter().cloned());
        }
        if origin != OriginFilter::BuiltIn {
            exercises.extend(
                self.store
                    .list()
                    .context("Failed to list custom exercises")?,
            );
        }

        let mut summaries: Vec<ExerciseSummary> = exercises
            .iter()
            .filter(|e| {
                muscle.map_or(true, |m| e.primary.contains(&m) || e.secondary.contains(&m))
            })
            .map(|e| ExerciseSummary {
                id: e.id.clone(),
                name: i18n::exercise_name(e),
                primary: e.primary.clone(),
            })
            .collect();
        summaries.sort_by_key(|s| s.name.to_lowercase());
        Ok(summaries)
    }
}

fn validate_muscles(primary: &[Muscle], secondary: &[Muscle]) -> Result<()> {
    if primary.is_empty() {
        bail!("At least one primary muscle is required.");
    }
    if let Some(m) = secondary.iter().find(|m| primary.contains(m)) {
        bail!("Muscle '{m}' cannot be both primary and secondary.");
    }
    Ok(())
}
