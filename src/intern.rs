// src/intern.rs
//
// Keyed interning with dense u32 handles.
//
// The name table and the type arena are both built on this store: a value
// vector indexed by handle plus a deduplication map from canonical key to
// handle. One value exists per canonical key; repeated interning of the
// same key returns the same handle. Entries are never mutated after
// insertion, only dropped wholesale by `clear()` on a global invalidation
// event.

use std::hash::Hash;

use hashbrown::HashMap;

/// Owned cache mapping a canonical key to a single shared value.
///
/// Handles are indices into the value vector and stay valid until the next
/// `clear()`. Callers that survive a `clear()` must re-intern; stale
/// handles from before the clear must not be dereferenced.
#[derive(Debug, Clone)]
pub struct Interner<K, V> {
    values: Vec<V>,
    lookup: HashMap<K, u32>,
}

impl<K: Eq + Hash, V> Interner<K, V> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Return the handle for `key`, constructing the value via `factory`
    /// on first lookup. The factory runs at most once per key.
    pub fn intern(&mut self, key: K, factory: impl FnOnce() -> V) -> u32 {
        if let Some(&idx) = self.lookup.get(&key) {
            return idx;
        }
        let idx = self.values.len() as u32;
        self.values.push(factory());
        self.lookup.insert(key, idx);
        idx
    }

    /// Handle for `key` if it has been interned.
    pub fn index_of(&self, key: &K) -> Option<u32> {
        self.lookup.get(key).copied()
    }

    /// Value for a handle. Panics on a handle from before the last `clear()`
    /// whose slot no longer exists.
    pub fn value(&self, idx: u32) -> &V {
        &self.values[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }

    /// Drop every entry. Used on global invalidation; the store repopulates
    /// from scratch afterwards.
    pub fn clear(&mut self) {
        self.values.clear();
        self.lookup.clear();
    }
}

impl<K: Eq + Hash, V> Default for Interner<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
