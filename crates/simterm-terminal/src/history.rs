//! Fixed-capacity command history.

use std::collections::VecDeque;

/// Submitted command lines, oldest first.
///
/// Adding to a full history silently drops the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry. Empty entries are ignored, as is everything when the
    /// capacity is zero.
    pub fn add(&mut self, entry: &str) {
        if entry.is_empty() || self.capacity == 0 {
            return;
        }
        self.entries.push_back(entry.to_string());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entry at `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        self.entries.remove(index)
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

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
