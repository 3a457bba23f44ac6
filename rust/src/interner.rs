//! Device id interning.
//!
//! Device id strings become dense `u32` indices in input order, so every
//! later stage can use plain arrays instead of string-keyed maps.

use rustc_hash::FxHashMap;

/// Dense device index (position in the input id sequence).
pub type DeviceIndex = u32;

/// Bidirectional map between device id strings and dense indices.
#[derive(Debug, Clone)]
pub struct DeviceIdInterner {
    to_index: FxHashMap<String, DeviceIndex>,
    from_index: Vec<String>,
}

impl DeviceIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_index: Vec::with_capacity(capacity),
        }
    }

    /// Register a new id and return its index.
    ///
    /// Returns `None` if the id was already registered; the existing
    /// mapping is left untouched.
    pub fn insert_new(&mut self, id: &str) -> Option<DeviceIndex> {
        if self.to_index.contains_key(id) {
            return None;
        }
        let index = self.from_index.len() as DeviceIndex;
        self.from_index.push(id.to_string());
        self.to_index.insert(id.to_string(), index);
        Some(index)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<DeviceIndex> {
        self.to_index.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, index: DeviceIndex) -> Option<&str> {
        self.from_index.get(index as usize).map(|s| s.as_str())
    }

    /// Resolve a sequence of indices, skipping any that are unknown.
    pub fn resolve_all<'a>(&'a self, indices: &'a [DeviceIndex]) -> impl Iterator<Item = &'a str> {
        indices.iter().filter_map(|&i| self.resolve(i))
    }

    pub fn len(&self) -> usize {
        self.from_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_index.is_empty()
    }
}

impl Default for DeviceIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
