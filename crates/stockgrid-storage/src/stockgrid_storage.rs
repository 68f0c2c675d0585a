//! Key-value persistence for grid state
//!
//! Saved filter sets are stored wholesale, one JSON document per key. Two
//! backends are provided:
//!
//! - [`MemoryStore`] - process-local, used by tests and ephemeral grids
//! - [`SqliteStore`] - a single-table SQLite database

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;

/// A JSON key-value store
///
/// Each call reads or writes one whole document. Callers never rely on
/// partial updates.
pub trait KeyValueStore {
    /// Read the document stored under `key`
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Remove the document stored under `key`, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}
