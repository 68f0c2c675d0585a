//! Filter preset manager
//!
//! Provides high-level operations over the saved filter sets of one grid.

use std::sync::Arc;

use chrono::Utc;
use stockgrid_core::{GridError, Result};
use stockgrid_storage::KeyValueStore;
use tracing::{info, warn};

use super::storage::{SavedFilterSet, StoredFilterSet};
use crate::filter_types::Predicate;

/// Saved filter sets of one grid, stored as a JSON array under `storage_key`
pub struct FilterPresetManager {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl FilterPresetManager {
    pub fn new(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// List all saved sets in the order they were first saved
    pub fn list(&self) -> Result<Vec<SavedFilterSet>> {
        Ok(self
            .read_all()?
            .iter()
            .map(StoredFilterSet::to_saved_filter_set)
            .collect())
    }

    pub fn get(&self, name: &str) -> Result<Option<SavedFilterSet>> {
        Ok(self
            .read_all()?
            .iter()
            .find(|set| set.name == name)
            .map(StoredFilterSet::to_saved_filter_set))
    }

    /// Save `predicates` under `name`, replacing a set with the same name
    pub fn save(&self, name: &str, predicates: &[Predicate]) -> Result<SavedFilterSet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GridError::InvalidPredicate(
                "a saved filter set needs a name".to_string(),
            ));
        }
        if predicates.is_empty() {
            return Err(GridError::InvalidPredicate(
                "there are no active filters to save".to_string(),
            ));
        }

        let saved = SavedFilterSet {
            name: name.to_string(),
            predicates: predicates.to_vec(),
            created_at: Utc::now(),
        };

        let mut sets = self.read_all()?;
        let stored = StoredFilterSet::from(&saved);
        match sets.iter_mut().find(|set| set.name == name) {
            Some(existing) => *existing = stored,
            None => sets.push(stored),
        }
        self.write_all(&sets)?;

        info!(key = %self.storage_key, name, predicates = predicates.len(), "Saved filter set");
        Ok(saved)
    }

    /// Delete a saved set; returns false if no set had that name
    pub fn delete(&self, name: &str) -> Result<bool> {
        let mut sets = self.read_all()?;
        let before = sets.len();
        sets.retain(|set| set.name != name);
        if sets.len() == before {
            return Ok(false);
        }
        self.write_all(&sets)?;
        info!(key = %self.storage_key, name, "Deleted filter set");
        Ok(true)
    }

    /// Rename a saved set
    pub fn rename(&self, name: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(GridError::InvalidPredicate(
                "a saved filter set needs a name".to_string(),
            ));
        }

        let mut sets = self.read_all()?;
        if name != new_name && sets.iter().any(|set| set.name == new_name) {
            return Err(GridError::InvalidPredicate(format!(
                "a filter set named '{}' already exists",
                new_name
            )));
        }
        let set = sets
            .iter_mut()
            .find(|set| set.name == name)
            .ok_or_else(|| GridError::NotFound(name.to_string()))?;
        set.name = new_name.to_string();
        self.write_all(&sets)?;

        info!(key = %self.storage_key, from = name, to = new_name, "Renamed filter set");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<StoredFilterSet>> {
        let Some(raw) = self.store.get(&self.storage_key).map_err(GridError::storage)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_value(raw) {
            Ok(sets) => Ok(sets),
            Err(e) => {
                warn!(key = %self.storage_key, "Ignoring unreadable saved filter sets: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, sets: &[StoredFilterSet]) -> Result<()> {
        let value = serde_json::to_value(sets)?;
        self.store
            .set(&self.storage_key, value)
            .map_err(GridError::storage)
    }
}

impl std::fmt::Debug for FilterPresetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPresetManager")
            .field("storage_key", &self.storage_key)
            .finish()
    }
}
