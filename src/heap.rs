use crate::error::{Error, Result};
use crate::types::{RankKey, Record};

/// A record plus the order in which it entered the index.
#[derive(Debug, Clone)]
struct Slot {
    sequence: u64,
    record: Record,
}

impl Slot {
    /// Comparison key. The sequence breaks ties so equal rank keys
    /// are extracted in insertion order.
    fn key(&self) -> (RankKey, u64) {
        (self.record.rank_key(), self.sequence)
    }
}

/// Binary min-heap over lap-time records.
///
/// The backing `Vec` is a complete binary tree laid out level by level:
///
/// ```text
///            [0]
///          /     \
///        [1]     [2]
///       /   \   /   \
///     [3]  [4] [5]  [6]
///
/// parent(i) = (i - 1) / 2      children(i) = 2i + 1, 2i + 2
/// ```
///
/// Invariant: for every non-root slot, `key(parent) <= key(child)`.
///
/// Insert: O(log n) amortized. Extract-min: O(log n).
/// Extracting K times from N inserted records yields the K smallest in
/// ascending order.
#[derive(Debug, Clone, Default)]
pub struct PriorityIndex {
    slots: Vec<Slot>,
    next_sequence: u64,
}

impl PriorityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index that can hold `capacity` records without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        PriorityIndex {
            slots: Vec::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Append the record, then sift it up while its parent's key is greater.
    pub fn insert(&mut self, record: Record) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.slots.push(Slot { sequence, record });
        self.sift_up(self.slots.len() - 1);
    }

    /// Remove and return the record with the smallest rank key.
    ///
    /// The last slot replaces the root, then sinks toward the leaves by
    /// swapping with its smaller child until neither child is smaller.
    pub fn extract_min(&mut self) -> Result<Record> {
        if self.slots.is_empty() {
            return Err(Error::EmptyIndex);
        }
        let min = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Ok(min.record)
    }

    /// The record `extract_min` would return, without removing it.
    pub fn peek_min(&self) -> Option<&Record> {
        self.slots.first().map(|slot| &slot.record)
    }

    /// Extract up to `k` records in ascending order.
    ///
    /// Holding fewer than `k` records is not an error: the loop stops at
    /// `EmptyIndex` and the short list is returned.
    pub fn top_k(&mut self, k: usize) -> Vec<Record> {
        let mut ranked = Vec::with_capacity(k.min(self.slots.len()));
        while ranked.len() < k {
            match self.extract_min() {
                Ok(record) => ranked.push(record),
                Err(_) => break,
            }
        }
        ranked
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.slots[parent].key() <= self.slots[child].key() {
                break;
            }
            self.slots.swap(parent, child);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break; // leaf
            }
            let right = left + 1;
            let smaller = if right < len && self.slots[right].key() < self.slots[left].key() {
                right
            } else {
                left
            };
            if self.slots[smaller].key() >= self.slots[node].key() {
                break;
            }
            self.slots.swap(node, smaller);
            node = smaller;
        }
    }
}

impl Extend<Record> for PriorityIndex {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<Record> for PriorityIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut index = PriorityIndex::new();
        index.extend(iter);
        index
    }
}
