//! In-memory key-value store

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::Mutex;

use crate::KeyValueStore;

/// Store backed by a `HashMap`, lost when dropped
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("grid").unwrap().is_none());

        store.set("grid", json!([{"name": "a"}])).unwrap();
        assert_eq!(store.get("grid").unwrap(), Some(json!([{"name": "a"}])));
        assert_eq!(store.len(), 1);

        assert!(store.remove("grid").unwrap());
        assert!(!store.remove("grid").unwrap());
        assert!(store.is_empty());
    }
}
