use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Maximum height of the skip list. LevelDB uses 12.
pub const MAX_HEIGHT: usize = 12;

/// Each extra level is kept with probability 1/BRANCHING.
const BRANCHING: u32 = 4;

/// A single node in the skip list.
///
/// Each node has `height` forward pointers. Level 0 contains all nodes
/// (a regular linked list). Higher levels skip over nodes, enabling
/// O(log n) average-case search.
///
/// ```text
/// Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
/// Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
/// Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
/// Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► 70 ► NIL
/// ```
///
/// Pointers are indices into `SkipList::nodes` (arena allocation), so the
/// structure needs no unsafe code and nodes are never moved or freed.
#[derive(Debug, Clone)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    forward: Vec<Option<usize>>,
}

/// A probabilistic sorted map.
///
/// General purpose: keys are unique and `insert` on an existing key replaces
/// its value. `OrderedIndex` gets duplicate rank keys by making every key
/// unique with a sequence number, so it never hits the replace path.
///
/// Average case: O(log n) insert, O(log n) lookup, O(n) iteration.
/// Worst case: O(n), but astronomically unlikely with random level assignment.
#[derive(Debug, Clone)]
pub struct SkipList<K, V> {
    /// Forward pointers of the head sentinel, one per level.
    head: [Option<usize>; MAX_HEIGHT],
    nodes: Vec<SkipNode<K, V>>,
    /// Highest level currently in use.
    height: usize,
    rng: StdRng,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Create a new empty skip list with an entropy-seeded level generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a skip list whose node heights are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        SkipList {
            head: [None; MAX_HEIGHT],
            nodes: Vec::new(),
            height: 1,
            rng,
        }
    }

    /// Insert a key-value pair. Overwrites if key already exists.
    ///
    /// Algorithm:
    ///   1. Find the insertion point at each level (track predecessors)
    ///   2. Generate a random height for the new node
    ///   3. Splice into the list at each level up to the node's height
    pub fn insert(&mut self, key: K, value: V) {
        let preds = self.find_predecessors(&key);

        if let Some(next) = self.next(preds[0], 0) {
            if self.nodes[next].key == key {
                self.nodes[next].value = value;
                return;
            }
        }

        let height = self.random_height();
        if height > self.height {
            // preds above the old height already point at the head (None)
            self.height = height;
        }

        let id = self.nodes.len();
        let forward = (0..height).map(|level| self.next(preds[level], level)).collect();
        self.nodes.push(SkipNode { key, value, forward });
        for (level, pred) in preds.iter().enumerate().take(height) {
            self.set_next(*pred, level, Some(id));
        }
    }

    /// Look up a key. Returns the value if found.
    pub fn get(&self, key: &K) -> Option<&V> {
        let preds = self.find_predecessors(key);
        self.next(preds[0], 0)
            .map(|id| &self.nodes[id])
            .filter(|node| node.key == *key)
            .map(|node| &node.value)
    }

    /// Number of entries in the skip list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the skip list is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all entries in sorted order.
    /// Traverses level 0 (the bottom level contains all entries).
    pub fn iter(&self) -> SkipListIter<'_, K, V> {
        SkipListIter {
            list: self,
            current: self.head[0],
        }
    }

    /// Iterate from the first entry whose key is >= `key`.
    pub fn seek(&self, key: &K) -> SkipListIter<'_, K, V> {
        let preds = self.find_predecessors(key);
        SkipListIter {
            list: self,
            current: self.next(preds[0], 0),
        }
    }

    /// For each level, the last node whose key is < `key` (None = head).
    ///
    ///   1. Start at head, highest level
    ///   2. Move forward while next key < target
    ///   3. Drop down one level, repeat until level 0
    fn find_predecessors(&self, key: &K) -> [Option<usize>; MAX_HEIGHT] {
        let mut preds = [None; MAX_HEIGHT];
        let mut current = None;
        for level in (0..self.height).rev() {
            while let Some(next) = self.next(current, level) {
                if self.nodes[next].key < *key {
                    current = Some(next);
                } else {
                    break;
                }
            }
            preds[level] = current;
        }
        preds
    }

    fn next(&self, node: Option<usize>, level: usize) -> Option<usize> {
        match node {
            None => self.head[level],
            Some(id) => self.nodes[id].forward[level],
        }
    }

    fn set_next(&mut self, node: Option<usize>, level: usize, target: Option<usize>) {
        match node {
            None => self.head[level] = target,
            Some(id) => self.nodes[id].forward[level] = target,
        }
    }

    /// Generate a random level for a new node.
    /// Each extra level has a 1/4 probability (LevelDB uses 1/4, not 1/2).
    fn random_height(&mut self) -> usize {
        let mut height = 1;
        while height < MAX_HEIGHT && self.rng.gen_ratio(1, BRANCHING) {
            height += 1;
        }
        height
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over skip list entries in sorted order.
///
/// Simply follows level 0 forward pointers. Borrows the list immutably,
/// so any number of iterators can run over the same list.
pub struct SkipListIter<'a, K, V> {
    list: &'a SkipList<K, V>,
    current: Option<usize>,
}

impl<'a, K, V> Iterator for SkipListIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = &list.nodes[self.current?];
        self.current = node.forward[0];
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_sorted_sublists() {
        let mut sl = SkipList::with_seed(7);
        for key in [40, 10, 30, 20, 50, 5, 45, 15] {
            sl.insert(key, ());
        }
        for level in 0..sl.height {
            let mut current = sl.head[level];
            let mut last = None;
            while let Some(id) = current {
                let key = sl.nodes[id].key;
                assert!(last.is_none_or(|prev| prev < key));
                last = Some(key);
                current = sl.nodes[id].forward[level];
            }
        }
    }
}
