//! Saved filter sets
//!
//! Each grid keeps its named filter sets as one JSON array in a
//! [`KeyValueStore`](stockgrid_storage::KeyValueStore) under its own key.

mod manager;
mod storage;

pub use manager::FilterPresetManager;
pub use storage::{SavedFilterSet, StoredPredicate};
