//! In-memory LRU cache with TTL expiry.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use memorise_core::traits::BoundedCache;

use crate::config::CacheConfig;

/// Cache entry with its insertion time.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// A zero TTL expires the entry immediately.
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| ttl.is_zero() || self.inserted_at.elapsed() > ttl)
    }
}

struct Store<V> {
    entries: LruCache<String, CacheEntry<V>>,
    /// `(inserted_at, key)` oldest first. Entries expire in insertion order,
    /// so expired ones sit at the front. Records for overwritten, evicted or
    /// removed entries go stale and are skipped.
    insertions: VecDeque<(Instant, String)>,
}

/// Bounded cache keyed by string.
///
/// Thread-safe. `set` evicts the least-recently-used entry once `max_entries`
/// is exceeded; `get` promotes an entry to most-recently-used, `has` and
/// `peek` do not. With a TTL configured, an entry older than the TTL reads as
/// absent and is dropped on that read.
pub struct LruTtlCache<V> {
    store: Mutex<Store<V>>,
    config: CacheConfig,
}

impl<V: Clone> LruTtlCache<V> {
    /// Creates a cache with the default configuration (1000 entries, no TTL).
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with the given capacity and optional TTL.
    pub fn with_limits(max_entries: usize, ttl: Option<Duration>) -> Self {
        let config = CacheConfig::default().with_max_entries(max_entries);
        Self::with_config(match ttl {
            Some(ttl) => config.with_ttl(ttl),
            None => config,
        })
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let entries = match NonZeroUsize::new(config.max_entries) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            store: Mutex::new(Store {
                entries,
                insertions: VecDeque::new(),
            }),
            config,
        }
    }

    /// Returns the configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the entry limit, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        NonZeroUsize::new(self.config.max_entries).map(NonZeroUsize::get)
    }

    /// Returns the configured time-to-live.
    pub fn ttl(&self) -> Option<Duration> {
        self.config.ttl()
    }

    /// Reads a value without touching its recency.
    pub fn peek(&self, key: &str) -> Option<V> {
        let ttl = self.ttl();
        let store = self.store.lock();
        store
            .entries
            .peek(key)
            .filter(|e| !e.is_expired(ttl))
            .map(|e| e.value.clone())
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl();
        if ttl.is_none() {
            return;
        }
        let mut store = self.store.lock();
        let expired: Vec<String> = store
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(ttl))
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            trace!(key = %key, "Dropping expired entry");
            store.entries.pop(&key);
        }
    }

    /// Capacity and TTL, when a full cache should reclaim expired entries
    /// before evicting a live one.
    fn reclaim_limits(&self) -> Option<(usize, Duration)> {
        if !self.config.auto_cleanup {
            return None;
        }
        self.capacity().zip(self.ttl())
    }

    /// Drops every expired entry at the front of the insertion log.
    fn reclaim_expired(store: &mut Store<V>, ttl: Duration) {
        while store
            .insertions
            .front()
            .is_some_and(|(at, _)| ttl.is_zero() || at.elapsed() > ttl)
        {
            let Some((at, key)) = store.insertions.pop_front() else {
                break;
            };
            if store.entries.peek(&key).is_some_and(|e| e.inserted_at == at) {
                trace!(key = %key, "Dropping expired entry");
                store.entries.pop(&key);
            }
        }
    }

    /// Rebuilds the insertion log from the live entries, dropping stale records.
    fn compact_insertions(store: &mut Store<V>) {
        let mut live: Vec<(Instant, String)> = store
            .entries
            .iter()
            .map(|(k, e)| (e.inserted_at, k.clone()))
            .collect();
        live.sort_by_key(|(at, _)| *at);
        store.insertions = live.into();
    }

    /// Drops `key` if it has expired. Returns true if a live entry remains.
    fn check_live(&self, store: &mut Store<V>, key: &str) -> bool {
        match store.entries.peek(key) {
            Some(entry) if entry.is_expired(self.ttl()) => {
                trace!(key, "Entry expired");
                store.entries.pop(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let ttl = self.ttl();
        let store = self.store.lock();
        let total = store.entries.len();
        let expired = store
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(ttl))
            .count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total.saturating_sub(expired),
            capacity: self.capacity(),
        }
    }
}

impl<V: Clone> Default for LruTtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> BoundedCache<V> for LruTtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.store.lock();
        let store = &mut *guard;
        if !self.check_live(store, key) {
            return None;
        }
        store.entries.get(key).map(|e| e.value.clone())
    }

    fn has(&self, key: &str) -> bool {
        let mut guard = self.store.lock();
        self.check_live(&mut guard, key)
    }

    fn set(&self, key: String, value: V) {
        let mut guard = self.store.lock();
        let store = &mut *guard;
        let entry = CacheEntry::new(value);
        let inserted_at = entry.inserted_at;
        let reclaim = self.reclaim_limits();

        // Make room from expired entries before evicting a live one
        if let Some((cap, ttl)) = reclaim {
            if store.entries.len() >= cap && !store.entries.contains(key.as_str()) {
                Self::reclaim_expired(store, ttl);
            }
        }

        if let Some((evicted, _)) = store.entries.push(key.clone(), entry) {
            if evicted != key {
                trace!(key = %evicted, "Evicted least-recently-used entry");
            }
        }

        if let Some((cap, _)) = reclaim {
            store.insertions.push_back((inserted_at, key));
            if store.insertions.len() > cap.saturating_mul(2) {
                Self::compact_insertions(store);
            }
        }
    }

    fn remove(&self, key: &str) -> Option<V> {
        let ttl = self.ttl();
        self.store
            .lock()
            .entries
            .pop(key)
            .filter(|e| !e.is_expired(ttl))
            .map(|e| e.value)
    }

    fn clear(&self) {
        let mut store = self.store.lock();
        store.entries.clear();
        store.insertions.clear();
    }

    fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    fn keys(&self) -> Vec<String> {
        self.store
            .lock()
            .entries
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Total entries (including expired ones not yet dropped)
    pub total_entries: usize,
    /// Expired entries
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
    /// Maximum capacity (None = unbounded)
    pub capacity: Option<usize>,
}
