//! Recency tracking for LRU eviction

use std::collections::{HashMap, VecDeque};

/// Tracks which key was touched least recently.
///
/// Every touch appends a freshly stamped `(stamp, key)` pair to the back of
/// the queue and records the stamp in the index; older pairs for the same key
/// become stale and are skipped when eviction walks the queue from the front.
/// This keeps `touch` O(1) instead of scanning the queue, at the cost of
/// stale pairs that are reclaimed lazily.
#[derive(Debug, Default)]
pub struct RecencyQueue {
    /// Latest stamp per live key
    stamps: HashMap<String, u64>,
    /// Touch history, oldest at the front; pairs whose stamp is outdated
    /// are stale
    queue: VecDeque<(u64, String)>,
    next_stamp: u64,
}

impl RecencyQueue {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as the most recently touched, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.stamps.insert(key.to_string(), stamp);
        self.queue.push_back((stamp, key.to_string()));
        self.compact_if_bloated();
    }

    /// Stops tracking a key. Its queue pairs become stale and are skipped
    /// later.
    pub fn remove(&mut self, key: &str) {
        self.stamps.remove(key);
    }

    /// Removes and returns the least recently touched key, or `None` when
    /// nothing is tracked.
    pub fn evict_oldest(&mut self) -> Option<String> {
        while let Some((stamp, key)) = self.queue.pop_front() {
            if self.stamps.get(&key) == Some(&stamp) {
                self.stamps.remove(&key);
                return Some(key);
            }
        }
        None
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Whether any key is tracked.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Whether a key is currently tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.stamps.clear();
        self.queue.clear();
    }

    /// Rebuilds the queue once stale pairs outnumber live ones, so the
    /// history stays proportional to the number of live keys.
    fn compact_if_bloated(&mut self) {
        if self.queue.len() > self.stamps.len() * 2 + 16 {
            let stamps = &self.stamps;
            self.queue
                .retain(|(stamp, key)| stamps.get(key) == Some(stamp));
        }
    }
}
