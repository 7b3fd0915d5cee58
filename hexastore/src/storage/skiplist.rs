//! Probabilistic ordered map.
//!
//! Every level of every permutation index is a `SkipList`. Nodes live in an
//! arena (`Vec`) and link to each other by index, so the structure needs no
//! `unsafe` and no reference counting.
//!
//! # Usage
//!
//! ```
//! use hexastore::storage::SkipList;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut list = SkipList::new(8);
//! for n in [5, 1, 3, 9, 7] {
//!     list.insert(n, n * 10, &mut rng);
//! }
//!
//! let (before, after) = list.split(&5);
//! assert_eq!(before.map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 3]);
//! assert_eq!(after.map(|(k, _)| *k).collect::<Vec<_>>(), vec![7, 9]);
//! assert_eq!(list.range(&3, &7).count(), 3);
//! ```
//!
//! # Invariants
//!
//! - Level 0 links every node in ascending key order; level `l` links a
//!   subsequence of level `l - 1`.
//! - Keys are unique.
//! - `nodes` is dense: removal moves the last node into the freed slot and
//!   relinks its predecessors.
//! - Tower heights are drawn from the injected random source only, so the
//!   same seed always builds the same shape.

use std::mem;

use rand::Rng;

/// Default maximum tower height.
pub const DEFAULT_MAX_LEVEL: usize = 16;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    /// `forward[l]` is the next node at level `l`.
    forward: Vec<Option<usize>>,
}

/// An ordered map backed by a skiplist.
#[derive(Debug, Clone)]
pub struct SkipList<K, V> {
    head: Vec<Option<usize>>,
    nodes: Vec<Node<K, V>>,
    /// Number of levels currently in use.
    level: usize,
    max_level: usize,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Create an empty list whose towers never exceed `max_level`.
    ///
    /// A `max_level` of zero is treated as one.
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        let max_level = max_level.max(1);
        Self {
            head: vec![None; max_level],
            nodes: Vec::new(),
            level: 1,
            max_level,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum tower height this list was created with.
    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.max_level
    }

    /// Point lookup.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|idx| &self.nodes[idx].value)
    }

    /// Mutable point lookup.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.position(key).map(|idx| &mut self.nodes[idx].value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert<R: Rng + ?Sized>(&mut self, key: K, value: V, rng: &mut R) -> Option<V> {
        if let Some(idx) = self.position(&key) {
            return Some(mem::replace(&mut self.nodes[idx].value, value));
        }
        self.link(key, value, rng);
        None
    }

    /// Get the value for `key`, inserting `default()` first if it is absent.
    pub fn get_or_insert_with<R, F>(&mut self, key: K, default: F, rng: &mut R) -> &mut V
    where
        R: Rng + ?Sized,
        F: FnOnce() -> V,
    {
        let idx = match self.position(&key) {
            Some(idx) => idx,
            None => self.link(key, default(), rng),
        };
        &mut self.nodes[idx].value
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let update = self.predecessors(key);
        let idx = self.next_of(update[0], 0)?;
        if self.nodes[idx].key != *key {
            return None;
        }

        let height = self.nodes[idx].forward.len();
        for (level, pred) in update.iter().enumerate().take(height) {
            if self.next_of(*pred, level) == Some(idx) {
                let next = self.nodes[idx].forward[level];
                self.set_next(*pred, level, next);
            }
        }

        // Point everything that links to the last node at `idx`, which is
        // where `swap_remove` is about to move it.
        let last = self.nodes.len() - 1;
        if idx != last {
            let moved = self.predecessors(&self.nodes[last].key);
            let moved_height = self.nodes[last].forward.len();
            for (level, pred) in moved.iter().enumerate().take(moved_height) {
                if self.next_of(*pred, level) == Some(last) {
                    self.set_next(*pred, level, Some(idx));
                }
            }
        }

        let node = self.nodes.swap_remove(idx);
        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        Some(node.value)
    }

    /// Full in-order traversal.
    #[must_use]
    pub fn values(&self) -> Iter<'_, K, V> {
        Iter::new(self, self.head[0], End::Open)
    }

    /// In-order traversal starting at the first key `>= key`.
    #[must_use]
    pub fn seek(&self, key: &K) -> Iter<'_, K, V> {
        Iter::new(self, self.lower_bound(key), End::Open)
    }

    /// Split around `key`: keys strictly below it and keys strictly above
    /// it. An entry equal to `key` is in neither half.
    #[must_use]
    pub fn split(&self, key: &K) -> (Iter<'_, K, V>, Iter<'_, K, V>)
    where
        K: Clone,
    {
        let before = Iter::new(self, self.head[0], End::Below(key.clone()));
        let after = Iter::new(self, self.upper_bound(key), End::Open);
        (before, after)
    }

    /// Entries with `lo <= key <= hi`.
    #[must_use]
    pub fn range(&self, lo: &K, hi: &K) -> Iter<'_, K, V>
    where
        K: Clone,
    {
        Iter::new(self, self.lower_bound(lo), End::Through(hi.clone()))
    }

    /// Up to `n` entries beginning exactly at `key`. Empty when `key` is
    /// absent.
    #[must_use]
    pub fn slice(&self, key: &K, n: usize) -> Iter<'_, K, V> {
        Iter::new(self, self.position(key), End::Count(n))
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.lower_bound(key)
            .filter(|&idx| self.nodes[idx].key == *key)
    }

    /// First node with a key `>= key`.
    fn lower_bound(&self, key: &K) -> Option<usize> {
        let mut current = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.nodes[next].key < *key {
                    current = Some(next);
                } else {
                    break;
                }
            }
        }
        self.next_of(current, 0)
    }

    /// First node with a key `> key`.
    fn upper_bound(&self, key: &K) -> Option<usize> {
        let mut current = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.nodes[next].key <= *key {
                    current = Some(next);
                } else {
                    break;
                }
            }
        }
        self.next_of(current, 0)
    }

    /// For every level, the last node with a key `< key` (`None` is the
    /// head).
    fn predecessors(&self, key: &K) -> Vec<Option<usize>> {
        let mut update = vec![None; self.max_level];
        let mut current = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.nodes[next].key < *key {
                    current = Some(next);
                } else {
                    break;
                }
            }
            update[level] = current;
        }
        update
    }

    /// Link a key known to be absent. Returns its arena index.
    fn link<R: Rng + ?Sized>(&mut self, key: K, value: V, rng: &mut R) -> usize {
        let update = self.predecessors(&key);
        let height = self.random_height(rng);
        self.level = self.level.max(height);

        let forward = (0..height)
            .map(|level| self.next_of(update[level], level))
            .collect();
        let idx = self.nodes.len();
        self.nodes.push(Node {
            key,
            value,
            forward,
        });
        for (level, pred) in update.iter().enumerate().take(height) {
            self.set_next(*pred, level, Some(idx));
        }
        idx
    }

    fn random_height<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut height = 1;
        while height < self.max_level && rng.random_bool(0.5) {
            height += 1;
        }
        height
    }

    fn next_of(&self, at: Option<usize>, level: usize) -> Option<usize> {
        match at {
            None => self.head[level],
            Some(idx) => self.nodes[idx].forward.get(level).copied().flatten(),
        }
    }

    fn set_next(&mut self, at: Option<usize>, level: usize, to: Option<usize>) {
        match at {
            None => self.head[level] = to,
            Some(idx) => self.nodes[idx].forward[level] = to,
        }
    }
}

/// Where an [`Iter`] stops.
#[derive(Debug, Clone)]
enum End<K> {
    Open,
    /// Stop at the first key `>= bound`.
    Below(K),
    /// Stop at the first key `> bound`.
    Through(K),
    /// Stop after this many more entries.
    Count(usize),
}

/// Lazy in-order cursor over a [`SkipList`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    list: &'a SkipList<K, V>,
    next: Option<usize>,
    end: End<K>,
}

impl<'a, K, V> Iter<'a, K, V> {
    const fn new(list: &'a SkipList<K, V>, next: Option<usize>, end: End<K>) -> Self {
        Self { list, next, end }
    }

    /// A cursor that yields nothing.
    #[must_use]
    pub const fn empty(list: &'a SkipList<K, V>) -> Self {
        Self::new(list, None, End::Open)
    }
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let list = self.list;
        let node = &list.nodes[idx];
        let stop = match &mut self.end {
            End::Open => false,
            End::Below(bound) => node.key >= *bound,
            End::Through(bound) => node.key > *bound,
            End::Count(remaining) => {
                if *remaining == 0 {
                    true
                } else {
                    *remaining -= 1;
                    false
                }
            }
        };
        if stop {
            self.next = None;
            return None;
        }
        self.next = node.forward.first().copied().flatten();
        Some((&node.key, &node.value))
    }
}
