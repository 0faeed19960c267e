//! Capacity-bounded LRU cache.
//!
//! Recency is tracked with a monotonically increasing access counter; eviction
//! scans for the smallest counter. Capacities are in the hundreds, so the scan
//! is cheaper than maintaining a linked list. Evicted values are dropped with
//! no callback.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::telemetry::{record_cache_eviction, record_cache_hit, record_cache_miss};

/// Default number of entries, matching the engine-wide default.
pub const DEFAULT_CAPACITY: usize = 200;

/// Counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

struct LruEntry<V> {
    value: V,
    last_used: u64,
}

/// LRU cache keyed by structural equality of `K`.
pub struct LruCache<K, V> {
    entries: HashMap<K, LruEntry<V>>,
    capacity: usize,
    access_counter: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            access_counter: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.access_counter += 1;
        let counter = self.access_counter;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = counter;
                self.hits += 1;
                record_cache_hit();
                Some(&entry.value)
            }
            None => {
                self.misses += 1;
                record_cache_miss();
                None
            }
        }
    }

    /// Look up `key` without touching recency or stats.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert `value` unless `key` is already present. Returns the resident
    /// value either way, marked most recently used.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> V {
        self.access_counter += 1;
        let counter = self.access_counter;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = counter;
            return entry.value.clone();
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(key, LruEntry { value: value.clone(), last_used: counter });
        value
    }

    /// Return the value for `key`, building it with `factory` on a miss.
    /// A failed build leaves the cache exactly as it was.
    pub fn get_or_create<E>(
        &mut self,
        key: &K,
        factory: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            return Ok(value.clone());
        }
        let value = factory(key)?;
        Ok(self.insert_if_absent(key.clone(), value))
    }

    /// Drop `key` explicitly.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());

        if let Some(key) = oldest {
            debug!(?key, "evicting least recently used entry");
            self.entries.remove(&key);
            self.evictions += 1;
            record_cache_eviction();
        }
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("evictions", &self.evictions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = LruCache::new(10);
        cache.insert_if_absent("a", 1);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_resident_value() {
        let mut cache = LruCache::new(10);
        assert_eq!(cache.insert_if_absent("a", 1), 1);
        assert_eq!(cache.insert_if_absent("a", 2), 1);
        assert_eq!(cache.peek(&"a"), Some(&1));
    }

    #[test]
    fn test_lru_eviction_respects_touch() {
        let mut cache = LruCache::new(2);
        cache.insert_if_absent(1, "one");
        cache.insert_if_absent(2, "two");
        cache.get(&1);
        cache.insert_if_absent(3, "three");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&1), "recently used entry should survive");
        assert!(!cache.contains(&2), "least recently used entry should be evicted");
        assert!(cache.contains(&3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = LruCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert_if_absent(1, 1);
        cache.insert_if_absent(2, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&2));
    }

    #[test]
    fn test_failed_factory_leaves_cache_untouched() {
        let mut cache = LruCache::new(1);
        cache.insert_if_absent(1, 10);

        let result: Result<i32, &str> = cache.get_or_create(&2, |_| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&1), "resident entry must not be evicted by a failed build");
        assert!(!cache.contains(&2));
    }

    #[test]
    fn test_get_or_create_builds_once() {
        let mut cache = LruCache::new(4);
        let mut builds = 0;
        for _ in 0..3 {
            let value: Result<i32, ()> = cache.get_or_create(&7, |k| {
                builds += 1;
                Ok(k * 2)
            });
            assert_eq!(value, Ok(14));
        }
        assert_eq!(builds, 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = LruCache::new(4);
        cache.insert_if_absent(1, 1);
        cache.insert_if_absent(2, 2);
        assert_eq!(cache.remove(&1), Some(1));
        assert_eq!(cache.remove(&1), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}
