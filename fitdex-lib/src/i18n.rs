// fitdex-lib/src/i18n.rs
//! English string table. Keys follow the `area.name` / `name__detail`
//! convention of the mobile app's translation files.
use crate::exercise::{Exercise, ExerciseId, Muscle};
use phf::phf_map;

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "delete" => "Delete",
    "edit" => "Edit",
    "cancel" => "Cancel",
    "confirm" => "Confirm",
    "save" => "Save",
    "primary_muscle" => "Primary muscle",
    "secondary_muscle.one" => "Secondary muscle",
    "secondary_muscle.other" => "Secondary muscles",
    "delete__exercise_title" => "Delete exercise",
    "delete__exercise_description" => "This exercise will be removed permanently. Workouts already logged with it are not affected.",
    "exercises__title" => "Exercises",
    "exercise_details__title" => "Exercise",
    "edit_exercise__title" => "Edit exercise",
    "new_exercise__title" => "New exercise",
    "muscles.abs" => "Abs",
    "muscles.abductors" => "Abductors",
    "muscles.adductors" => "Adductors",
    "muscles.biceps" => "Biceps",
    "muscles.calves" => "Calves",
    "muscles.chest" => "Chest",
    "muscles.forearms" => "Forearms",
    "muscles.glutes" => "Glutes",
    "muscles.hamstrings" => "Hamstrings",
    "muscles.lats" => "Lats",
    "muscles.lower_back" => "Lower back",
    "muscles.middle_back" => "Middle back",
    "muscles.neck" => "Neck",
    "muscles.obliques" => "Obliques",
    "muscles.quadriceps" => "Quadriceps",
    "muscles.shoulders" => "Shoulders",
    "muscles.traps" => "Traps",
    "muscles.triceps" => "Triceps",
    // Localized defaults that win over the dataset name
    "exercises.barbell_bench_press" => "Bench press",
    "exercises.barbell_full_squat" => "Squat",
    "exercises.barbell_deadlift" => "Deadlift",
    "exercises.pullups" => "Pull-up",
};

/// Looks up `key`; a missing key comes back as `[missing "key"]` so gaps
/// are visible on screen instead of rendering blank.
#[must_use]
pub fn translate(key: &str) -> String {
    EN.get(key)
        .map_or_else(|| format!("[missing \"{key}\"]"), |s| (*s).to_string())
}

/// Pluralised lookup: `key.one` when `count == 1`, `key.other` otherwise.
#[must_use]
pub fn translate_count(key: &str, count: usize) -> String {
    let form = if count == 1 { "one" } else { "other" };
    translate(&format!("{key}.{form}"))
}

#[must_use]
pub fn muscle_name(muscle: Muscle) -> String {
    translate(&format!("muscles.{}", muscle.as_ref()))
}

/// Comma-joined display names, in list order.
#[must_use]
pub fn muscle_names(muscles: &[Muscle]) -> String {
    muscles
        .iter()
        .map(|m| muscle_name(*m))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display name of an exercise. Built-ins may carry a localized default
/// that replaces the dataset name; custom exercises always show their own.
#[must_use]
pub fn exercise_name(exercise: &Exercise) -> String {
    match &exercise.id {
        ExerciseId::BuiltIn(id) => EN
            .get(format!("exercises.{id}").as_str())
            .map_or_else(|| exercise.name.clone(), |s| (*s).to_string()),
        ExerciseId::Custom(_) => exercise.name.clone(),
    }
}
