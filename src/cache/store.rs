//! Bounded in-memory store with TTL expiry and LRU eviction

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyQueue};

/// A capacity- and time-bounded `String -> V` store.
///
/// Expiry is lazy: an entry past its deadline is removed by the `get` that
/// finds it, or by an explicit [`purge_expired`](CacheStore::purge_expired)
/// sweep. Eviction is recency-ordered and reads count as touches, so the
/// entry dropped at capacity is the one untouched the longest.
///
/// Absence is never an error; a miss is `None`. A disabled store misses on
/// every read and ignores every write.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    recency: RecencyQueue,
    capacity: usize,
    default_ttl: Duration,
    enabled: bool,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V: Clone> CacheStore<V> {
    /// Creates a store holding at most `capacity` entries, applying
    /// `default_ttl` to writes that do not specify their own.
    pub fn new(capacity: usize, default_ttl: Duration, enabled: bool) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyQueue::new(),
            capacity,
            default_ttl,
            enabled,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Looks up a key, refreshing its recency on a hit.
    ///
    /// An expired entry is removed as a side effect and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if !self.enabled {
            self.misses += 1;
            return None;
        }

        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.recency.remove(key);
                self.misses += 1;
                debug!(key, "cache entry expired on read");
                None
            }
            Some(entry) => {
                let value = entry.value().clone();
                self.recency.touch(key);
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a value under a key.
    ///
    /// Replacing an existing key installs a new entry and refreshes its
    /// recency. Inserting a new key at capacity first evicts the least
    /// recently touched entry. A disabled or zero-capacity store ignores the
    /// write.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        if !self.enabled || self.capacity == 0 {
            return;
        }

        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.recency.evict_oldest() {
                self.entries.remove(&evicted);
                self.evictions += 1;
                debug!(key = %evicted, "evicted least recently touched entry");
            }
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.recency.touch(&key);
    }

    /// Whether a key currently holds a live value.
    ///
    /// Delegates to [`get`](CacheStore::get), so it shares its lazy-expiry
    /// and recency side effects; this is not a side-effect-free probe.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.recency.remove(key);
            true
        } else {
            false
        }
    }

    /// Removes every entry whose key matches the predicate, returning how
    /// many were removed. Used for bulk invalidation, e.g. all pages of one
    /// endpoint.
    pub fn delete_matching(&mut self, pred: impl Fn(&str) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pred(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.recency.remove(key);
        }
        doomed.len()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Sweeps out expired entries without waiting for reads to find them,
    /// returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.recency.remove(key);
        }
        expired.len()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of configuration, fill level and counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            enabled: self.enabled,
            default_ttl: self.default_ttl,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    fn store(capacity: usize) -> CacheStore<String> {
        CacheStore::new(capacity, TTL, true)
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let mut cache = store(10);
        cache.set("k", "v".to_string(), None);
        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_is_none_not_an_error() {
        let mut cache = store(10);
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_replace_keeps_a_single_entry() {
        let mut cache = store(10);
        cache.set("k", "v1".to_string(), None);
        cache.set("k", "v2".to_string(), None);
        assert_eq!(cache.get("k"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_prefers_least_recently_touched() {
        // capacity=2; set A, set B, get A, set C evicts B since the read
        // refreshed A
        let mut cache = store(2);
        cache.set("A", "a".to_string(), None);
        cache.set("B", "b".to_string(), None);
        assert!(cache.get("A").is_some());
        cache.set("C", "c".to_string(), None);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("A").is_some());
        assert!(cache.get("B").is_none());
        assert!(cache.get("C").is_some());
    }

    #[test]
    fn test_replace_at_capacity_does_not_evict() {
        let mut cache = store(2);
        cache.set("A", "a".to_string(), None);
        cache.set("B", "b".to_string(), None);
        cache.set("A", "a2".to_string(), None);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("B").is_some());
        assert_eq!(cache.get("A"), Some("a2".to_string()));
    }

    #[test]
    fn test_expired_entry_misses_and_is_removed() {
        let mut cache = store(10);
        cache.set("k", "v".to_string(), Some(Duration::from_millis(5)));
        sleep(Duration::from_millis(20));

        assert_eq!(cache.get("k"), None);
        assert!(!cache.has("k"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_per_call_ttl_overrides_default() {
        let mut cache = CacheStore::new(10, Duration::from_millis(5), true);
        cache.set("short", "v".to_string(), None);
        cache.set("long", "v".to_string(), Some(TTL));
        sleep(Duration::from_millis(20));

        assert!(cache.get("short").is_none());
        assert!(cache.get("long").is_some());
    }

    #[test]
    fn test_disabled_store_misses_and_ignores_writes() {
        let mut cache: CacheStore<String> = CacheStore::new(10, TTL, false);
        cache.set("k", "v".to_string(), None);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
        assert!(!cache.stats().enabled);
    }

    #[test]
    fn test_zero_capacity_store_accepts_nothing() {
        let mut cache = store(0);
        cache.set("k", "v".to_string(), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_reports_presence() {
        let mut cache = store(10);
        cache.set("k", "v".to_string(), None);
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_delete_matching_removes_by_predicate() {
        let mut cache = store(10);
        cache.set("/movie/popular?page=1", "a".to_string(), None);
        cache.set("/movie/popular?page=2", "b".to_string(), None);
        cache.set("/genre/movie/list", "c".to_string(), None);

        let removed = cache.delete_matching(|key| key.starts_with("/movie/popular"));

        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/genre/movie/list").is_some());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut cache = store(10);
        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.clear();
        assert!(cache.is_empty());
        // The tracker was cleared too, so new inserts evict correctly later
        cache.set("c", "3".to_string(), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired_counts_removed_entries() {
        let mut cache = store(10);
        cache.set("gone", "v".to_string(), Some(Duration::from_millis(5)));
        cache.set("kept", "v".to_string(), Some(TTL));
        sleep(Duration::from_millis(20));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("kept").is_some());
    }

    #[test]
    fn test_stats_reflect_configuration_and_counters() {
        let mut cache = store(2);
        cache.set("a", "1".to_string(), None);
        assert!(cache.get("a").is_some()); // hit
        assert!(cache.get("b").is_none()); // miss
        cache.set("c", "2".to_string(), None);
        cache.set("d", "3".to_string(), None); // evicts

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 2);
        assert!(stats.enabled);
        assert_eq!(stats.default_ttl, TTL);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }
}
