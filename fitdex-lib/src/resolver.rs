// fitdex-lib/src/resolver.rs
use crate::catalog::Catalog;
use crate::db::{DbError, ExerciseStore};
use crate::exercise::{CustomId, Exercise, ExerciseId};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

type FetchResult = Result<Vec<Exercise>, DbError>;

/// In-flight lookup of a custom exercise. Dropping it abandons the result.
#[derive(Debug)]
pub struct PendingFetch {
    id: CustomId,
    rx: Receiver<FetchResult>,
}

impl PendingFetch {
    pub(crate) fn new(id: CustomId, rx: Receiver<FetchResult>) -> Self {
        Self { id, rx }
    }

    #[must_use]
    pub const fn id(&self) -> CustomId {
        self.id
    }

    /// Non-blocking check. `None` while the query is still running,
    /// `Some(record_or_absent)` once it finished.
    #[must_use]
    pub fn poll(&self) -> Option<Option<Arc<Exercise>>> {
        match self.rx.try_recv() {
            Ok(result) => Some(first_record(self.id, result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Fetch worker for {} exited without a result", self.id);
                Some(None)
            }
        }
    }

    /// Blocks until the query finishes.
    #[must_use]
    pub fn wait(self) -> Option<Arc<Exercise>> {
        match self.rx.recv() {
            Ok(result) => first_record(self.id, result),
            Err(_) => {
                log::error!("Fetch worker for {} exited without a result", self.id);
                None
            }
        }
    }
}

// Errors degrade to "absent"; the screen has no error state.
fn first_record(id: CustomId, result: FetchResult) -> Option<Arc<Exercise>> {
    match result {
        Ok(rows) => {
            let found = rows.into_iter().next().map(Arc::new);
            if found.is_none() {
                log::warn!("Custom exercise {id} not found");
            }
            found
        }
        Err(e) => {
            log::error!("Failed to fetch custom exercise {id}: {e}");
            None
        }
    }
}

/// Outcome of resolving an id: either known now, or arriving later.
#[derive(Debug)]
pub enum Resolution {
    Pending(PendingFetch),
    Ready(Option<Arc<Exercise>>),
}

impl Resolution {
    /// Moves a finished fetch into `Ready`. Returns true when that happened.
    pub fn poll(&mut self) -> bool {
        if let Self::Pending(pending) = self {
            if let Some(result) = pending.poll() {
                *self = Self::Ready(result);
                return true;
            }
        }
        false
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The record, if resolved and found.
    #[must_use]
    pub const fn exercise(&self) -> Option<&Arc<Exercise>> {
        match self {
            Self::Ready(Some(exercise)) => Some(exercise),
            _ => None,
        }
    }

    #[must_use]
    pub fn wait(self) -> Option<Arc<Exercise>> {
        match self {
            Self::Pending(pending) => pending.wait(),
            Self::Ready(result) => result,
        }
    }
}

/// Resolves exercise ids against the catalog (built-ins) or the custom store.
/// Built-in lookups are memoized for the resolver's lifetime, misses included.
pub struct ExerciseResolver {
    catalog: Catalog,
    cache: HashMap<String, Option<Arc<Exercise>>>,
}

impl ExerciseResolver {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolve(&mut self, id: &ExerciseId, store: &ExerciseStore) -> Resolution {
        match id {
            ExerciseId::Custom(custom_id) => Resolution::Pending(store.fetch(*custom_id)),
            ExerciseId::BuiltIn(built_in) => Resolution::Ready(self.lookup_built_in(built_in)),
        }
    }

    /// Memoized catalog lookup. Every call for the same id returns the same `Arc`.
    pub fn lookup_built_in(&mut self, id: &str) -> Option<Arc<Exercise>> {
        if let Some(cached) = self.cache.get(id) {
            log::debug!("Built-in lookup cache hit for '{id}'");
            return cached.clone();
        }
        let found = self.catalog.find(id).cloned().map(Arc::new);
        if found.is_none() {
            log::warn!("Built-in exercise '{id}' not found in dataset");
        }
        self.cache.insert(id.to_string(), found.clone());
        found
    }

    /// Number of ids memoized so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
