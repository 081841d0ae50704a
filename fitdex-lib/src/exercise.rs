// fitdex-lib/src/exercise.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use thiserror::Error;

/// Prefix that marks an identifier as a user-created exercise.
pub const CUSTOM_ID_PREFIX: &str = "custom_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Exercise identifier cannot be empty.")]
    EmptyId,
    #[error("Malformed custom exercise identifier: '{0}' (expected 'custom_<number>')")]
    MalformedCustomId(String),
    #[error("Unknown muscle code: '{0}'")]
    UnknownMuscle(String),
}

/// Row id of a custom exercise in the local store, displayed as `custom_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomId(i64);

impl CustomId {
    /// Wraps a store row id. Row ids handed out by SQLite are always positive.
    #[must_use]
    pub const fn from_row_id(row_id: i64) -> Self {
        Self(row_id)
    }

    #[must_use]
    pub const fn row_id(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CUSTOM_ID_PREFIX}{}", self.0)
    }
}

/// Identifier of an exercise, tagged with where the record lives.
/// The origin is decided once, when the identifier is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExerciseId {
    BuiltIn(String),
    Custom(CustomId),
}

impl ExerciseId {
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    #[must_use]
    pub const fn as_custom(&self) -> Option<CustomId> {
        match self {
            Self::Custom(id) => Some(*id),
            Self::BuiltIn(_) => None,
        }
    }
}

impl FromStr for ExerciseId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyId);
        }
        match trimmed.strip_prefix(CUSTOM_ID_PREFIX) {
            Some(rest) => match rest.parse::<i64>() {
                Ok(n) if n > 0
                    && !rest.starts_with('0')
                    && rest.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    Ok(Self::Custom(CustomId(n)))
                }
                _ => Err(ParseError::MalformedCustomId(trimmed.to_string())),
            },
            None => Ok(Self::BuiltIn(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for ExerciseId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExerciseId> for String {
    fn from(value: ExerciseId) -> Self {
        value.to_string()
    }
}

impl From<CustomId> for ExerciseId {
    fn from(value: CustomId) -> Self {
        Self::Custom(value)
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuiltIn(id) => f.write_str(id),
            Self::Custom(id) => id.fmt(f),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Muscle {
    Abs,
    Abductors,
    Adductors,
    Biceps,
    Calves,
    Chest,
    Forearms,
    Glutes,
    Hamstrings,
    Lats,
    LowerBack,
    MiddleBack,
    Neck,
    Obliques,
    Quadriceps,
    Shoulders,
    Traps,
    Triceps,
}

// Stored and printed as the snake_case code
impl fmt::Display for Muscle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Parses a comma-separated list of muscle codes ("chest, triceps").
/// Blank entries are skipped and repeated codes keep their first position.
pub fn parse_muscle_list(input: &str) -> Result<Vec<Muscle>, ParseError> {
    let mut muscles: Vec<Muscle> = Vec::new();
    for code in input.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let muscle =
            Muscle::from_str(code).map_err(|_| ParseError::UnknownMuscle(code.to_string()))?;
        if !muscles.contains(&muscle) {
            muscles.push(muscle);
        }
    }
    Ok(muscles)
}

/// Inverse of `parse_muscle_list`, used for the DB columns.
#[must_use]
pub fn join_muscle_codes(muscles: &[Muscle]) -> String {
    muscles
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub primary: Vec<Muscle>,
    #[serde(default)]
    pub secondary: Vec<Muscle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>, // Only set for custom exercises
}

/// Lightweight row for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseSummary {
    pub id: ExerciseId,
    pub name: String,
    pub primary: Vec<Muscle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginFilter {
    All,
    BuiltIn,
    Custom,
}

/// Partial update for a custom exercise. `None` leaves a field untouched;
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
    pub primary: Option<Vec<Muscle>>,
    pub secondary: Option<Vec<Muscle>>,
}

impl ExerciseUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.primary.is_none()
            && self.secondary.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_prefix_decides_origin() {
        let id: ExerciseId = "custom_12".parse().unwrap();
        assert_eq!(id, ExerciseId::Custom(CustomId(12)));
        assert!(id.is_custom());
        assert_eq!(id.to_string(), "custom_12");

        let id: ExerciseId = " barbell_bench_press ".parse().unwrap();
        assert_eq!(id, ExerciseId::BuiltIn("barbell_bench_press".to_string()));
        assert!(!id.is_custom());
        assert_eq!(id.as_custom(), None);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert_eq!("".parse::<ExerciseId>(), Err(ParseError::EmptyId));
        assert_eq!("   ".parse::<ExerciseId>(), Err(ParseError::EmptyId));
        assert!(matches!(
            "custom_".parse::<ExerciseId>(),
            Err(ParseError::MalformedCustomId(_))
        ));
        assert!(matches!(
            "custom_abc".parse::<ExerciseId>(),
            Err(ParseError::MalformedCustomId(_))
        ));
        assert!(matches!(
            "custom_0".parse::<ExerciseId>(),
            Err(ParseError::MalformedCustomId(_))
        ));
        // Only the canonical spelling parses, so ids display as they were written
        assert!(matches!(
            "custom_01".parse::<ExerciseId>(),
            Err(ParseError::MalformedCustomId(_))
        ));
    }

    #[test]
    fn muscle_lists_parse_and_dedup() {
        let muscles = parse_muscle_list("Chest, triceps,,chest , lower_back").unwrap();
        assert_eq!(muscles, vec![Muscle::Chest, Muscle::Triceps, Muscle::LowerBack]);
        assert_eq!(join_muscle_codes(&muscles), "chest,triceps,lower_back");
        assert!(parse_muscle_list("").unwrap().is_empty());
        assert_eq!(
            parse_muscle_list("chest,wings"),
            Err(ParseError::UnknownMuscle("wings".to_string()))
        );
    }
}
