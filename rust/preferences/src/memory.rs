use super::{Change, Edits, Store, StoreError, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A store that keeps everything in memory, for tests.
#[derive(Default, Debug)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        // Every commit leaves the map consistent, so a poisoned lock is still usable.
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: Mutex::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values().get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.values().contains_key(key)
    }

    fn commit(&self, edits: Edits) -> Result<(), StoreError> {
        let mut values = self.values();
        if edits.clear {
            values.clear();
        }
        for change in edits.changes {
            match change {
                Change::Put { key, value } => {
                    values.insert(key, value);
                }
                Change::Remove { key } => {
                    values.remove(&key);
                }
            }
        }
        Ok(())
    }
}
