use std::collections::HashMap;
use std::sync::RwLock;

use aeon_types::{StoreKey, Value};

use crate::error::StoreResult;
use crate::traits::TypedStore;

/// In-memory, HashMap-based typed store.
///
/// Intended for tests and embedding. Entries are held behind an `RwLock`
/// so concurrent mutating calls serialize per instance and readers always
/// observe fully-committed state.
pub struct InMemoryStore {
    entries: RwLock<HashMap<StoreKey, Value>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries that have been written at least once.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no entry has ever been written.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all written keys.
    pub fn all_keys(&self) -> Vec<StoreKey> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<StoreKey> = map.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedStore for InMemoryStore {
    fn write(&self, key: &StoreKey, value: Value) -> StoreResult<()> {
        self.check_kind(key, &value)?;
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(*key, value);
        Ok(())
    }

    fn read(&self, key: &StoreKey) -> StoreResult<Value> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::zero(key.kind())))
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
