// inspector_core/src/metadata/cullable.rs
use std::collections::HashMap;
use std::hash::Hash;

/// A map that can drop every entry not touched during a visit.
///
/// `begin_cull` moves all live entries into a shadow map. Any access during
/// the visit moves the entry back. `end_cull` evicts whatever is still in
/// the shadow map.
#[derive(Debug)]
pub struct CullableMap<K, V> {
    live: HashMap<K, V>,
    culled: HashMap<K, V>,
    is_culling: bool,
}

impl<K, V> Default for CullableMap<K, V> {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            culled: HashMap::new(),
            is_culling: false,
        }
    }
}

impl<K: Eq + Hash, V> CullableMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn promote(&mut self, key: &K) {
        if self.is_culling && !self.live.contains_key(key) {
            if let Some((key, value)) = self.culled.remove_entry(key) {
                self.live.insert(key, value);
            }
        }
    }

    /// Returns the entry for `key`, creating it with `create` if absent.
    pub fn get_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> &mut V {
        self.promote(&key);
        self.live.entry(key).or_insert_with(create)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.promote(key);
        self.live.get_mut(key)
    }

    /// True if `key` is present, live or culled.
    pub fn contains_key(&self, key: &K) -> bool {
        self.live.contains_key(key) || self.culled.contains_key(key)
    }

    /// Inserts a live entry, replacing any culled one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let culled = self.culled.remove(&key);
        self.live.insert(key, value).or(culled)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.live.remove(key).or_else(|| self.culled.remove(key))
    }

    pub fn begin_cull(&mut self) {
        if self.is_culling {
            return;
        }
        self.is_culling = true;
        let live = std::mem::take(&mut self.live);
        self.culled.extend(live);
    }

    /// Ends the visit and returns the evicted entries.
    pub fn end_cull(&mut self) -> Vec<(K, V)> {
        self.is_culling = false;
        self.culled.drain().collect()
    }

    pub fn is_culling(&self) -> bool {
        self.is_culling
    }

    /// Number of entries, live and culled.
    pub fn len(&self) -> usize {
        self.live.len() + self.culled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.culled.clear();
    }
}
