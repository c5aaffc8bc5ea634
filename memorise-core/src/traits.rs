//! Common traits for memorise.
//!
//! The memoizing wrapper talks to its cache only through [`BoundedCache`], so
//! any store that honours the contract below can back a memoized function.

// ═══════════════════════════════════════════════════════════════════════════════
// BOUNDED CACHE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for a bounded, optionally expiring key/value store.
///
/// Implementations own all eviction state. The contract:
///
/// - `set` evicts the least-recently-used entry once the configured capacity
///   is exceeded.
/// - `get` and `has` treat entries older than the configured time-to-live as
///   absent.
/// - `has` answers presence only. A stored value that happens to be `0`,
///   `false` or `None` is still present.
///
/// Methods take `&self`; implementations synchronize internally so a cache can
/// be shared between wrappers behind an `Arc`.
pub trait BoundedCache<V>: Send + Sync {
    /// Returns a clone of the stored value, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Returns true if a live entry exists for `key`.
    fn has(&self, key: &str) -> bool;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: String, value: V);

    /// Removes an entry, returning its value if it was live.
    fn remove(&self, key: &str) -> Option<V>;

    /// Removes every entry.
    fn clear(&self);

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys, most recently used first.
    fn keys(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, u32>>);

    impl BoundedCache<u32> for MapCache {
        fn get(&self, key: &str) -> Option<u32> {
            self.0.lock().unwrap().get(key).copied()
        }

        fn has(&self, key: &str) -> bool {
            self.0.lock().unwrap().contains_key(key)
        }

        fn set(&self, key: String, value: u32) {
            self.0.lock().unwrap().insert(key, value);
        }

        fn remove(&self, key: &str) -> Option<u32> {
            self.0.lock().unwrap().remove(key)
        }

        fn clear(&self) {
            self.0.lock().unwrap().clear();
        }

        fn len(&self) -> usize {
            self.0.lock().unwrap().len()
        }

        fn keys(&self) -> Vec<String> {
            self.0.lock().unwrap().keys().cloned().collect()
        }
    }

    #[test]
    fn test_is_empty_default() {
        let cache = MapCache::default();
        assert!(cache.is_empty());
        cache.set("k".into(), 0);
        assert!(!cache.is_empty());
        assert!(cache.has("k"));
        assert_eq!(cache.get("k"), Some(0));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let cache: Box<dyn BoundedCache<u32>> = Box::new(MapCache::default());
        cache.set("a".into(), 1);
        assert_eq!(cache.keys(), vec!["a".to_string()]);
        assert_eq!(cache.remove("a"), Some(1));
        assert!(cache.is_empty());
    }
}
