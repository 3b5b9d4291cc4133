pub mod skiplist;

use skiplist::{SkipList, SkipListIter};

use crate::types::{RankKey, Record};

/// Position of a record in the index: rank key first, then arrival order.
///
/// The sequence is strictly increasing, so no two records share a key and
/// a record with an existing rank key sorts after every earlier record
/// with that rank key.
type IndexKey = (RankKey, u64);

/// Sorted multi-key index over lap-time records.
///
/// Stands in for a paged ordered index (a B+-tree in a database) with an
/// in-memory skip list. What it preserves is the contract: ascending
/// iteration, duplicate rank keys, logarithmic insert.
///
/// Duplicate rank keys iterate in insertion order.
pub struct OrderedIndex {
    entries: SkipList<IndexKey, Record>,
    next_sequence: u64,
}

impl OrderedIndex {
    pub fn new() -> Self {
        OrderedIndex {
            entries: SkipList::new(),
            next_sequence: 0,
        }
    }

    /// Create an index whose skip list heights are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        OrderedIndex {
            entries: SkipList::with_seed(seed),
            next_sequence: 0,
        }
    }

    /// Insert a record. O(log n) expected.
    pub fn insert(&mut self, record: Record) {
        let key = (record.rank_key(), self.next_sequence);
        self.next_sequence += 1;
        self.entries.insert(key, record);
    }

    /// The `k` fastest records, ascending, lazily.
    ///
    /// Borrows the index immutably: calling it again without inserting
    /// yields the same sequence.
    pub fn top_k(&self, k: usize) -> Ranked<'_> {
        Ranked {
            entries: self.entries.iter(),
            remaining: k,
        }
    }

    /// Every record, ascending.
    pub fn iter(&self) -> Ranked<'_> {
        self.top_k(usize::MAX)
    }

    /// Records with a rank key of at least `min_rank_key`, ascending.
    pub fn range_from(&self, min_rank_key: RankKey) -> Ranked<'_> {
        Ranked {
            entries: self.entries.seek(&(min_rank_key, 0)),
            remaining: usize::MAX,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OrderedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Record> for OrderedIndex {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<Record> for OrderedIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut index = OrderedIndex::new();
        index.extend(iter);
        index
    }
}

/// Ascending traversal over an `OrderedIndex`, truncated after a limit.
pub struct Ranked<'a> {
    entries: SkipListIter<'a, IndexKey, Record>,
    remaining: usize,
}

impl<'a> Iterator for Ranked<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (_, record) = self.entries.next()?;
        self.remaining -= 1;
        Some(record)
    }
}
