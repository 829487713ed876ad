//! Decrease-key priority queue driving the label processing order.
//!
//! A plain binary heap with lazy deletion: updating or removing an entry
//! leaves its old heap slot in place as a tombstone, and `pop_min` skips
//! tombstones. A monotonically increasing sequence number breaks priority
//! ties, so entries of equal priority come out in insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use binary_heap_plus::{BinaryHeap, MinComparator};

use crate::error::QueueError;
use crate::label::LabelPriority;

struct HeapEntry<K, P> {
    priority: P,
    sequence: u64,
    key: K,
}

impl<K, P: PartialOrd> Ord for HeapEntry<K, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // priorities are checked to be self-comparable on insertion
        self.priority
            .partial_cmp(&other.priority)
            .unwrap_or(Ordering::Equal)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl<K, P: PartialOrd> PartialOrd for HeapEntry<K, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, P: PartialOrd> PartialEq for HeapEntry<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K, P: PartialOrd> Eq for HeapEntry<K, P> {}

/// Min-priority queue whose entries can be re-prioritized or removed.
///
/// `K` identifies an entry (for labels, `&Label`, which hashes by id); `P` is
/// its priority, smallest first.
pub struct LabelQueue<K, P = LabelPriority>
where
    P: PartialOrd,
{
    heap: BinaryHeap<HeapEntry<K, P>, MinComparator>,
    /// Sequence number of the live heap entry of every tracked key.
    entry_finder: HashMap<K, u64>,
    counter: u64,
}

impl<K, P> LabelQueue<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: PartialOrd + Debug,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity_min(capacity),
            entry_finder: HashMap::with_capacity(capacity),
            counter: 0,
        }
    }

    /// Adds `key` with `priority`, or re-prioritizes it if already tracked.
    pub fn insert_or_update(&mut self, key: K, priority: P) -> Result<(), QueueError> {
        if priority.partial_cmp(&priority).is_none() {
            return Err(QueueError::UnorderedPriority);
        }
        let sequence = self.counter;
        self.counter += 1;
        if let Some(stale) = self.entry_finder.insert(key.clone(), sequence) {
            tracing::trace!(?key, stale, sequence, ?priority, "updated queue entry");
        } else {
            tracing::trace!(?key, sequence, ?priority, "queued entry");
        }
        self.heap.push(HeapEntry {
            priority,
            sequence,
            key,
        });
        Ok(())
    }

    /// Stops tracking `key`.
    pub fn remove(&mut self, key: &K) -> Result<(), QueueError> {
        match self.entry_finder.remove(key) {
            Some(_) => Ok(()),
            None => Err(QueueError::NotFound),
        }
    }

    /// Removes and returns the tracked key with the smallest priority.
    pub fn pop_min(&mut self) -> Result<K, QueueError> {
        while let Some(entry) = self.heap.pop() {
            if self.entry_finder.get(&entry.key) == Some(&entry.sequence) {
                self.entry_finder.remove(&entry.key);
                tracing::trace!(key = ?entry.key, priority = ?entry.priority, "popped entry");
                return Ok(entry.key);
            }
            tracing::trace!(key = ?entry.key, sequence = entry.sequence, "discarded tombstone");
        }
        Err(QueueError::Empty)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entry_finder.contains_key(key)
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.entry_finder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_finder.is_empty()
    }

    /// Heap slots held by invalidated entries.
    pub fn tombstones(&self) -> usize {
        self.heap.len() - self.entry_finder.len()
    }
}

impl<K, P> Default for LabelQueue<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: PartialOrd + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
