//! In-memory response cache
//!
//! Provides a capacity- and time-bounded store with lazy TTL expiry and
//! recency-based eviction, plus canonical cache key derivation. The store
//! lives for the process lifetime and is shared by every client handle;
//! nothing is persisted to disk.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use key::{build_key, join_values};
pub use lru::RecencyQueue;
pub use stats::CacheStats;
pub use store::CacheStore;
