//! Bounded recency window for dropping duplicate rounds.
//!
//! The feed re-delivers rounds after reconnects and history polls, so every
//! accepted event's key is remembered in a fixed-capacity FIFO set. Oldest
//! keys age out first; a duplicate is rejected before reinsertion, so
//! re-seeing a key never refreshes its position (FIFO, not LRU).

use std::collections::{HashSet, VecDeque};

/// Default number of round keys remembered.
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Not thread-safe: the pipeline serializes all `accept` calls (one
/// consumer task owns the window for the process lifetime).
#[derive(Debug)]
pub struct DedupWindow {
    order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl DedupWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` the first time a key is presented and `false` for
    /// every repeat, until the key ages out of the window.
    pub fn accept(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.order.push_back(key.to_string());
        self.seen.insert(key.to_string());
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Fallback key for feeds that supply no issue id: the same number seen
/// again inside the same minute bucket counts as one logical event.
pub fn fallback_key(number: u8, unix_secs: i64) -> String {
    format!("{}-{}", number, unix_secs.div_euclid(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_accepted_repeat_rejected() {
        let mut w = DedupWindow::new(10);
        assert!(w.accept("20240101-100"));
        assert!(!w.accept("20240101-100"));
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn fifo_eviction_reopens_aged_out_keys() {
        let mut w = DedupWindow::new(2);
        assert!(w.accept("a"));
        assert!(w.accept("b"));
        assert!(!w.accept("a")); // still inside the window
        assert!(w.accept("c")); // evicts "a"
        assert!(w.accept("a")); // aged out, counts as new again
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn duplicates_do_not_refresh_position() {
        let mut w = DedupWindow::new(2);
        assert!(w.accept("a"));
        assert!(w.accept("b"));
        assert!(!w.accept("a")); // rejected, so "a" stays oldest
        assert!(w.accept("c")); // still evicts "a", not "b"
        assert!(!w.accept("b"));
        assert!(w.accept("a"));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut w = DedupWindow::new(0);
        assert!(w.accept("a"));
        assert!(!w.accept("a"));
        assert!(w.accept("b"));
        assert!(w.accept("a"));
    }

    #[test]
    fn fallback_key_buckets_by_minute() {
        assert_eq!(fallback_key(7, 120), fallback_key(7, 179));
        assert_ne!(fallback_key(7, 120), fallback_key(7, 180));
        assert_ne!(fallback_key(7, 120), fallback_key(8, 120));
    }
}
