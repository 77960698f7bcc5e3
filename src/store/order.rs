//! Insertion Order Tracker
//!
//! Explicit insertion-order index for bulk eviction. The underlying map
//! gives no iteration-order guarantee, so order is tracked here instead.

use std::collections::VecDeque;

use crate::store::CacheKey;

// == Order Tracker ==
/// Tracks key insertion order for a namespace.
///
/// Keys are stored in a VecDeque where:
/// - Front = oldest insertion
/// - Back = newest insertion
#[derive(Debug, Default)]
pub struct OrderTracker {
    order: VecDeque<CacheKey>,
}

impl OrderTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a key's insertion.
    ///
    /// An overwrite keeps the original slot: the key was inserted when it
    /// was first written.
    pub fn record(&mut self, key: &CacheKey) {
        if !self.contains(key) {
            self.order.push_back(key.clone());
        }
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &CacheKey) {
        self.order.retain(|k| k != key);
    }

    // == Take Oldest ==
    /// Removes and returns up to `count` keys, oldest first.
    pub fn take_oldest(&mut self, count: usize) -> Vec<CacheKey> {
        let count = count.min(self.order.len());
        self.order.drain(..count).collect()
    }

    // == Oldest ==
    /// The oldest key without removing it.
    pub fn oldest(&self) -> Option<&CacheKey> {
        self.order.front()
    }

    /// Iterates keys oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.iter()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Checks whether a key is tracked.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u32) -> CacheKey {
        CacheKey::new("GET", format!("http://localhost:8080/api/items/{}", n))
    }

    #[test]
    fn test_new_is_empty() {
        let tracker = OrderTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.len(), 0);
        assert!(tracker.oldest().is_none());
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut tracker = OrderTracker::new();
        tracker.record(&key(1));
        tracker.record(&key(2));
        tracker.record(&key(3));

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.oldest(), Some(&key(1)));
    }

    #[test]
    fn test_record_overwrite_keeps_original_slot() {
        let mut tracker = OrderTracker::new();
        tracker.record(&key(1));
        tracker.record(&key(2));
        tracker.record(&key(1));

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.oldest(), Some(&key(1)));
    }

    #[test]
    fn test_take_oldest_drains_front() {
        let mut tracker = OrderTracker::new();
        for n in 1..=5 {
            tracker.record(&key(n));
        }

        let taken = tracker.take_oldest(2);
        assert_eq!(taken, vec![key(1), key(2)]);
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.oldest(), Some(&key(3)));
    }

    #[test]
    fn test_take_oldest_clamps_to_len() {
        let mut tracker = OrderTracker::new();
        tracker.record(&key(1));

        let taken = tracker.take_oldest(10);
        assert_eq!(taken.len(), 1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut tracker = OrderTracker::new();
        tracker.record(&key(1));
        tracker.record(&key(2));
        tracker.remove(&key(1));

        assert_eq!(tracker.len(), 1);
        assert!(!tracker.contains(&key(1)));
        assert_eq!(tracker.oldest(), Some(&key(2)));
    }

    #[test]
    fn test_remove_nonexistent_is_noop() {
        let mut tracker = OrderTracker::new();
        tracker.record(&key(1));
        tracker.remove(&key(9));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_iter_is_oldest_first() {
        let mut tracker = OrderTracker::new();
        for n in [3, 1, 2] {
            tracker.record(&key(n));
        }
        let order: Vec<_> = tracker.iter().cloned().collect();
        assert_eq!(order, vec![key(3), key(1), key(2)]);
    }
}
