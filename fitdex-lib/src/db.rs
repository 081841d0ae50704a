//src/db.rs
use crate::exercise::{
    join_muscle_codes, parse_muscle_list, CustomId, Exercise, ExerciseId, ExerciseUpdate, Muscle,
};
use crate::resolver::PendingFetch;
use chrono::{DateTime, Utc};
use rusqlite::{named_params, params, Connection, Row, ToSql};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread;
use thiserror::Error;

// Custom Error type for DB operations
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
    #[error("Exercise name must be unique (case-insensitive): '{0}' already exists.")]
    ExerciseNameNotUnique(String),
    #[error("Database connection lock was poisoned by a panicking thread")]
    LockPoisoned,
}

const DB_FILE_NAME: &str = "fitdex.sqlite";
const APP_DATA_DIR: &str = "fitdex";

/// Gets the path to the SQLite database file within the app's data directory.
/// Exposed at crate root as get_db_path_util
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, DbError> {
    Connection::open(path).map_err(DbError::Connection)
}

/// Initializes the database tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS custom_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT, -- Exposed as custom_<id>
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            notes TEXT,
            primary_muscles TEXT NOT NULL, -- Comma-separated muscle codes
            secondary_muscles TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL -- RFC3339
        )",
        [],
    )
    .map_err(DbError::Connection)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_custom_exercises_name ON custom_exercises(name)",
        [],
    )
    .map_err(DbError::Connection)?;

    Ok(())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation)
}

/// Inserts a custom exercise and returns its new id.
pub fn create_custom_exercise(
    conn: &Connection,
    name: &str,
    notes: Option<&str>,
    primary: &[Muscle],
    secondary: &[Muscle],
) -> Result<CustomId, DbError> {
    match conn.execute(
        "INSERT INTO custom_exercises (name, notes, primary_muscles, secondary_muscles, created_at)
         VALUES (:name, :notes, :primary, :secondary, :created_at)",
        named_params! {
            ":name": name,
            ":notes": notes,
            ":primary": join_muscle_codes(primary),
            ":secondary": join_muscle_codes(secondary),
            ":created_at": Utc::now().to_rfc3339(),
        },
    ) {
        Ok(_) => Ok(CustomId::from_row_id(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Err(DbError::ExerciseNameNotUnique(name.to_string())),
        Err(e) => Err(DbError::InsertFailed(e)),
    }
}

fn muscles_column(row: &Row, idx: usize) -> Result<Vec<Muscle>, rusqlite::Error> {
    let codes: String = row.get(idx)?;
    parse_muscle_list(&codes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

// Helper function to map a database row to an Exercise
fn map_row_to_exercise(row: &Row) -> Result<Exercise, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let notes: Option<String> = row.get(2)?;
    let primary = muscles_column(row, 3)?;
    let secondary = muscles_column(row, 4)?;
    let created_str: String = row.get(5)?;

    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Exercise {
        id: ExerciseId::Custom(CustomId::from_row_id(id)),
        name,
        notes,
        primary,
        secondary,
        created_at: Some(created_at),
    })
}

const SELECT_EXERCISE: &str = "SELECT id, name, notes, primary_muscles, secondary_muscles, created_at FROM custom_exercises";

/// Looks up a custom exercise. The result holds zero or one record.
pub fn get_custom_exercise(conn: &Connection, id: CustomId) -> Result<Vec<Exercise>, DbError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_EXERCISE} WHERE id = ?1"))
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(params![id.row_id()], map_row_to_exercise)
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

/// Lists all custom exercises ordered by name.
pub fn list_custom_exercises(conn: &Connection) -> Result<Vec<Exercise>, DbError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_EXERCISE} ORDER BY name ASC"))
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map([], map_row_to_exercise)
        .map_err(DbError::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)
}

/// Applies a partial update to a custom exercise.
pub fn update_custom_exercise(
    conn: &Connection,
    id: CustomId,
    update: &ExerciseUpdate,
) -> Result<u64, DbError> {
    let mut params_map: HashMap<String, Box<dyn ToSql>> = HashMap::new();
    let mut updates = Vec::new();

    if let Some(name) = &update.name {
        updates.push("name = :name");
        params_map.insert(":name".into(), Box::new(name.clone()));
    }
    if let Some(notes) = &update.notes {
        updates.push("notes = :notes");
        params_map.insert(":notes".into(), Box::new(notes.clone()));
    }
    if let Some(primary) = &update.primary {
        updates.push("primary_muscles = :primary");
        params_map.insert(":primary".into(), Box::new(join_muscle_codes(primary)));
    }
    if let Some(secondary) = &update.secondary {
        updates.push("secondary_muscles = :secondary");
        params_map.insert(":secondary".into(), Box::new(join_muscle_codes(secondary)));
    }

    if updates.is_empty() {
        return Ok(0);
    }

    let sql = format!("UPDATE custom_exercises SET {} WHERE id = :id", updates.join(", "));
    params_map.insert(":id".into(), Box::new(id.row_id()));

    let params_for_exec: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_ref()))
        .collect();

    let rows_affected = match conn.execute(&sql, params_for_exec.as_slice()) {
        Ok(rows) => rows,
        Err(e) if is_unique_violation(&e) => {
            let name = update.name.clone().unwrap_or_default();
            return Err(DbError::ExerciseNameNotUnique(name));
        }
        Err(e) => return Err(DbError::UpdateFailed(e)),
    };

    if rows_affected == 0 {
        Err(DbError::ExerciseNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

/// Deletes a custom exercise by id.
pub fn delete_custom_exercise(conn: &Connection, id: CustomId) -> Result<u64, DbError> {
    let rows_affected = conn
        .execute("DELETE FROM custom_exercises WHERE id = ?1", params![id.row_id()])
        .map_err(DbError::DeleteFailed)?;
    if rows_affected == 0 {
        Err(DbError::ExerciseNotFound(id.to_string()))
    } else {
        Ok(rows_affected as u64)
    }
}

/// Shared handle to the custom exercise database. Cloning shares the
/// connection, which is what lets `fetch` run off the UI thread.
#[derive(Clone)]
pub struct ExerciseStore {
    conn: Arc<Mutex<Connection>>,
}

impl ExerciseStore {
    /// Wraps an already initialized connection.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (creating if needed) the database at `path` and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = open_db(path)?;
        init_db(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    pub fn create(
        &self,
        name: &str,
        notes: Option<&str>,
        primary: &[Muscle],
        secondary: &[Muscle],
    ) -> Result<CustomId, DbError> {
        create_custom_exercise(&*self.lock()?, name, notes, primary, secondary)
    }

    pub fn get_by_id(&self, id: CustomId) -> Result<Vec<Exercise>, DbError> {
        get_custom_exercise(&*self.lock()?, id)
    }

    pub fn list(&self) -> Result<Vec<Exercise>, DbError> {
        list_custom_exercises(&*self.lock()?)
    }

    pub fn update(&self, id: CustomId, update: &ExerciseUpdate) -> Result<u64, DbError> {
        update_custom_exercise(&*self.lock()?, id, update)
    }

    pub fn delete_by_id(&self, id: CustomId) -> Result<u64, DbError> {
        delete_custom_exercise(&*self.lock()?, id)
    }

    /// Runs `get_by_id` on a worker thread. The worker does not outlive its
    /// query; if the returned handle is dropped first the result is discarded.
    #[must_use]
    pub fn fetch(&self, id: CustomId) -> PendingFetch {
        let (tx, rx) = mpsc::channel();
        let store = self.clone();
        thread::spawn(move || {
            log::debug!("Fetching custom exercise {id}");
            // Receiver may be gone if the screen was left early
            let _ = tx.send(store.get_by_id(id));
        });
        PendingFetch::new(id, rx)
    }
}
