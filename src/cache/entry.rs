//! A single cached value with its expiry window

use std::time::{Duration, Instant};

/// One stored value plus the timestamps bounding its validity.
///
/// Entries are immutable after creation; replacing a key in the store
/// installs a brand-new entry rather than mutating the old one.
/// `Instant` keeps the arithmetic monotonic and process-local, which is all
/// an in-memory cache needs.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Creates an entry expiring `ttl` after now.
    pub fn new(value: V, ttl: Duration) -> Self {
        let created_at = Instant::now();
        Self {
            value,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    /// An entry is expired strictly after its deadline, so a `get` at
    /// exactly `expires_at` still hits.
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }

    /// Borrows the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// When the entry was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When the entry stops being served.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}
