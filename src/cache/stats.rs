//! Cache diagnostics snapshot

use std::time::Duration;

use serde::Serialize;

/// A point-in-time view of the cache, for diagnostics.
///
/// `size`, `capacity`, `enabled` and `default_ttl` describe the store's
/// configuration and fill level; `hits`, `misses` and `evictions` are
/// counters accumulated since construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Whether the store serves and accepts values at all
    pub enabled: bool,
    /// TTL applied when a `set` does not specify one
    pub default_ttl: Duration,
    /// Lookups answered from the store
    pub hits: u64,
    /// Lookups that found nothing, an expired entry, or a disabled store
    pub misses: u64,
    /// Entries removed to make room at capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the store, or 0.0 before any
    /// lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
