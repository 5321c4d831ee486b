use std::iter::FusedIterator;
use std::mem;

use crate::arena::{Arena, NodeId};
use crate::element::ListElement;
use crate::error::Error;
use crate::level::LevelGenerator;
use crate::options::SkipListOptions;

type Link = Option<NodeId>;

/// A node in the skip list.
#[derive(Debug)]
pub struct Node<T> {
    /// Extracted from the value on insertion and never changed afterwards.
    key: f64,
    value: T,
    /// Links to the next node on each level this node is part of. The node is present on levels
    /// `0..forward.len()`.
    forward: Vec<Link>,
    /// Link to the previous node on level 0.
    backward: Link,
}

impl<T> Node<T> {
    fn new(key: f64, value: T, level: usize) -> Self {
        Node {
            key,
            value,
            forward: vec![None; level + 1],
            backward: None,
        }
    }

    /// The key the node is ordered by.
    pub fn key(&self) -> f64 {
        self.key
    }

    /// The payload stored in the node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The highest level this node is present on.
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }
}

/// A skip list ordered by the floating point key of its elements.
///
/// Keys closer together than the configured `eps` are treated as equal. The bottom level is
/// traversed as a ring: the successor of the largest node is the smallest node and vice versa.
///
/// Nodes are addressed with [`NodeId`] handles which are returned by insertions and lookups. A
/// handle stops resolving once its node is deleted.
///
/// # Examples
/// ```
/// use nerdondon_leapfrog::SkipList;
///
/// let mut skiplist = SkipList::<i32>::new();
/// skiplist.insert(2);
/// skiplist.insert(3);
/// skiplist.insert(1);
///
/// let two = skiplist.find(&2).unwrap();
/// assert_eq!(skiplist.value(two), Some(&2));
///
/// let three = skiplist.next(two).unwrap();
/// assert_eq!(skiplist.value(three), Some(&3));
///
/// // The bottom level wraps around
/// let one = skiplist.next(three).unwrap();
/// assert_eq!(one, skiplist.smallest().unwrap());
/// ```
#[derive(Debug)]
pub struct SkipList<T: ListElement> {
    /// Owns every node. Links between nodes are handles into this arena.
    nodes: Arena<Node<T>>,
    /// The first node on each level.
    start: Vec<Link>,
    /// The last node on each level.
    end: Vec<Link>,
    /// The highest level that has a node in it. `None` when the list is empty.
    max_level: Option<usize>,
    /// Tolerance for key equality.
    eps: f64,
    level_generator: LevelGenerator,
    /// Approximate memory used by the skip list in number of bytes.
    approximate_mem_usage: usize,
}

impl<T: ListElement> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Public methods of SkipList
impl<T: ListElement> SkipList<T> {
    /// Create a new skip list with the default options and a random source seeded from entropy.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let skiplist = SkipList::<f64>::new();
    /// assert!(skiplist.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::from_valid_options(SkipListOptions::new())
    }

    /// Create a new skip list that treats keys closer together than `eps` as equal.
    pub fn with_eps(eps: f64) -> Result<Self, Error> {
        Self::with_options(SkipListOptions::new().with_eps(eps))
    }

    /// Create a new skip list with a seeded random source so that node levels are reproducible.
    pub fn with_seed(eps: f64, seed: u64) -> Result<Self, Error> {
        Self::with_options(SkipListOptions::new().with_eps(eps).with_seed(seed))
    }

    /// Create a new skip list from `options`.
    ///
    /// Returns an error if `eps` is negative or not finite, if the level ceiling is zero or larger
    /// than [`MAX_LEVEL_CEILING`](crate::options::MAX_LEVEL_CEILING), or if a promotion
    /// probability outside of (0, 1) was configured.
    pub fn with_options(options: SkipListOptions) -> Result<Self, Error> {
        options.validate()?;

        Ok(Self::from_valid_options(options))
    }

    /// Insert `value` into the skip list and return a handle to its node.
    ///
    /// Values with keys equal to an existing key are kept and placed after the existing nodes.
    ///
    /// # Panics
    ///
    /// Panics if the extracted key is NaN.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let mut skiplist = SkipList::<u32>::new();
    /// let node = skiplist.insert(7);
    ///
    /// assert_eq!(skiplist.get(node).unwrap().key(), 7.0);
    /// assert_eq!(skiplist.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> NodeId {
        let key = value.extract_key();
        assert!(!key.is_nan(), "cannot insert an element with a NaN key");

        let level = self.level_generator.generate();
        let new_node = self.nodes.insert(Node::new(key, value, level));

        // Both are true only if the list was empty
        let (is_new_first, is_new_last) = match (self.start[0], self.end[0]) {
            (Some(first), Some(last)) => (key < self.key_of(first), key > self.key_of(last)),
            _ => (true, true),
        };

        if !is_new_first && !is_new_last {
            self.link_inner(new_node, key, level);
        }

        if self.max_level.map_or(true, |max_level| level > max_level) {
            self.max_level = Some(level);
        }

        self.fix_anchors(new_node, key, level, is_new_first, is_new_last);
        self.approximate_mem_usage += Self::node_mem_usage(level);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            key,
            level,
            max_level = ?self.max_level,
            length = self.len(),
            "inserted node"
        );

        new_node
    }

    /// Remove a node whose key is equal to the key of `value`.
    ///
    /// Returns the removed value or `None` if no node matched. Only one node is removed even if
    /// several nodes have matching keys.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let mut skiplist = SkipList::<i64>::new();
    /// skiplist.insert(1);
    /// skiplist.insert(2);
    ///
    /// assert_eq!(skiplist.delete(&1), Some(1));
    /// assert_eq!(skiplist.delete(&1), None);
    /// assert_eq!(skiplist.len(), 1);
    /// ```
    pub fn delete(&mut self, value: &T) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let key = value.extract_key();
        let mut level_idx = self.entry_index(key, 0);
        let mut current: Link = None;
        // The first matching node is found on its top level. Lower levels unlink that same node.
        let mut target: Link = None;

        loop {
            let next = self.successor(current, level_idx);

            match (next, target) {
                (Some(next_node), Some(target_node)) => {
                    if next_node != target_node {
                        current = next;
                        continue;
                    }

                    self.unlink(current, target_node, level_idx);
                }
                (Some(next_node), None) => {
                    let next_key = self.key_of(next_node);
                    if self.keys_equal(next_key, key) {
                        target = next;
                        self.unlink(current, next_node, level_idx);
                    } else if next_key <= key {
                        current = next;
                        continue;
                    }
                }
                (None, _) => {}
            }

            if level_idx == 0 {
                break;
            }

            level_idx -= 1;
        }

        let removed = target.and_then(|target_node| self.nodes.remove(target_node));

        #[cfg(feature = "tracing")]
        tracing::trace!(
            key,
            removed = removed.is_some(),
            max_level = ?self.max_level,
            length = self.len(),
            "deleted node"
        );

        let node = removed?;
        self.approximate_mem_usage -= Self::node_mem_usage(node.level());

        Some(node.value)
    }

    /// Find a node whose key is equal to the key of `value`.
    pub fn find(&self, value: &T) -> Option<NodeId> {
        self.find_extended(value.extract_key(), false)
    }

    /// Find a node whose key is equal to the key of `value` or, if there is none, the first node
    /// with a greater key.
    ///
    /// Returns `None` if every key in the list is smaller than the key of `value`.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let mut skiplist = SkipList::<i32>::new();
    /// skiplist.insert(10);
    /// skiplist.insert(20);
    ///
    /// let node = skiplist.find_greater_or_equal(&15).unwrap();
    /// assert_eq!(skiplist.value(node), Some(&20));
    /// assert_eq!(skiplist.find_greater_or_equal(&25), None);
    /// ```
    pub fn find_greater_or_equal(&self, value: &T) -> Option<NodeId> {
        self.find_extended(value.extract_key(), true)
    }

    /// Find the last node whose key is less than, and not equal to, the key of `value`.
    pub fn find_less_than(&self, value: &T) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }

        let key = value.extract_key();
        let mut level_idx = self.entry_index(key, 0);
        let mut current: Link = None;

        loop {
            while let Some(next_node) = self.successor(current, level_idx) {
                let next_key = self.key_of(next_node);
                if next_key >= key || self.keys_equal(next_key, key) {
                    break;
                }

                current = Some(next_node);
            }

            if level_idx == 0 {
                return current;
            }

            level_idx -= 1;
        }
    }

    /// The node after `node` in key order. The largest node is followed by the smallest node.
    ///
    /// Returns `None` only if `node` was deleted.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let current = self.nodes.get(node)?;

        current.forward[0].or(self.start[0])
    }

    /// The node before `node` in key order. The smallest node is preceded by the largest node.
    ///
    /// Returns `None` only if `node` was deleted.
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        let current = self.nodes.get(node)?;

        current.backward.or(self.end[0])
    }

    /// Replace the value stored in `node`.
    ///
    /// The replacement must have a key equal to the node's key so that the ordering of the list is
    /// preserved. On success the previous value is returned. If the keys differ, or `node` was
    /// deleted, the node is left untouched and `value` is handed back as the error.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let mut skiplist = SkipList::<f64>::new();
    /// let node = skiplist.insert(1.5);
    ///
    /// assert_eq!(skiplist.change_value(node, 1.5), Ok(1.5));
    /// assert_eq!(skiplist.change_value(node, 2.5), Err(2.5));
    /// ```
    pub fn change_value(&mut self, node: NodeId, value: T) -> Result<T, T> {
        let eps = self.eps;
        let Some(current) = self.nodes.get_mut(node) else {
            return Err(value);
        };

        if !within_eps(value.extract_key(), current.key, eps) {
            return Err(value);
        }

        Ok(mem::replace(&mut current.value, value))
    }

    /// The node with the smallest key.
    pub fn smallest(&self) -> Option<NodeId> {
        self.start[0]
    }

    /// The node with the largest key.
    pub fn largest(&self) -> Option<NodeId> {
        self.end[0]
    }

    /// Return the key and a reference to the value of the first node in the skip list if there is
    /// a node. Otherwise, it returns `None`.
    pub fn first(&self) -> Option<(f64, &T)> {
        self.start[0].map(|node| self.entry(node))
    }

    /// Return the key and a reference to the value of the last node in the skip list if there is
    /// a node. Otherwise, it returns `None`.
    pub fn last(&self) -> Option<(f64, &T)> {
        self.end[0].map(|node| self.entry(node))
    }

    /// Get the node behind a handle.
    pub fn get(&self, node: NodeId) -> Option<&Node<T>> {
        self.nodes.get(node)
    }

    /// Get the value stored in a node.
    pub fn value(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node).map(Node::value)
    }

    /// Returns true if `node` refers to a node that is still in the skip list.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(node)
    }

    /// The number of elements in the skip list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the skip list does not hold any elements; otherwise false.
    pub fn is_empty(&self) -> bool {
        self.start[0].is_none()
    }

    /// The number of levels currently in use.
    pub fn height(&self) -> usize {
        self.max_level.map_or(0, |max_level| max_level + 1)
    }

    /// The tolerance under which two keys are considered equal.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// The maximum number of levels a node may span.
    pub fn level_ceiling(&self) -> usize {
        self.level_generator.ceiling()
    }

    /// Get the approximate amount of memory used in number of bytes.
    pub fn get_approx_mem_usage(&self) -> usize {
        self.approximate_mem_usage
    }

    /// Remove every element. Handles to removed nodes stop resolving.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.start.fill(None);
        self.end.fill(None);
        self.max_level = None;
        self.approximate_mem_usage = Self::base_mem_usage(self.start.len());
    }

    /// An iterator visiting each node in ascending key order.
    ///
    /// Returns values of (f64, &'a T)
    pub fn iter(&self) -> NodeIterHelper<'_, T> {
        NodeIterHelper {
            skiplist: self,
            front: self.start[0],
            back: self.end[0],
            remaining: self.len(),
        }
    }
}

/// Implementation for values that implement `Clone`
impl<T> SkipList<T>
where
    T: ListElement + Clone,
{
    /// Eagerly returns the entries stored in the skip list as `Vec<(f64, T)>` with cloned values.
    ///
    /// # Examples
    /// ```
    /// use nerdondon_leapfrog::SkipList;
    ///
    /// let mut skiplist = SkipList::<i32>::new();
    /// skiplist.insert(2);
    /// skiplist.insert(3);
    /// skiplist.insert(1);
    ///
    /// assert_eq!(skiplist.entries(), [(1.0, 1), (2.0, 2), (3.0, 3)]);
    /// ```
    pub fn entries(&self) -> Vec<(f64, T)> {
        self.iter().map(|(key, value)| (key, value.clone())).collect()
    }
}

// Private methods of SkipList
impl<T: ListElement> SkipList<T> {
    fn from_valid_options(options: SkipListOptions) -> Self {
        let level_ceiling = options.level_ceiling();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            eps = options.eps(),
            level_ceiling,
            seeded = options.seed().is_some(),
            probability = ?options.probability(),
            "created skip list"
        );

        SkipList {
            nodes: Arena::new(),
            start: vec![None; level_ceiling],
            end: vec![None; level_ceiling],
            max_level: None,
            eps: options.eps(),
            level_generator: LevelGenerator::new(&options),
            approximate_mem_usage: Self::base_mem_usage(level_ceiling),
        }
    }

    /// Memory used by an empty skip list. The anchors are allocated on the heap so they are not
    /// counted by `mem::size_of`.
    fn base_mem_usage(level_ceiling: usize) -> usize {
        mem::size_of::<Self>() + 2 * level_ceiling * mem::size_of::<Link>()
    }

    /// Memory used by a node that spans levels `0..=level`.
    fn node_mem_usage(level: usize) -> usize {
        mem::size_of::<Node<T>>() + (level + 1) * mem::size_of::<Link>()
    }

    fn key_of(&self, node: NodeId) -> f64 {
        self.nodes[node].key
    }

    fn entry(&self, node: NodeId) -> (f64, &T) {
        let node = &self.nodes[node];
        (node.key, &node.value)
    }

    fn keys_equal(&self, a: f64, b: f64) -> bool {
        within_eps(a, b, self.eps)
    }

    /// The node after `current` on `level`. A `current` of `None` stands for a position before the
    /// first node of every level.
    fn successor(&self, current: Link, level: usize) -> Link {
        match current {
            Some(node) => self.nodes[node].forward[level],
            None => self.start[level],
        }
    }

    /// Pick the level to start a descending walk for `key` from.
    ///
    /// This is the highest level whose first node does not come after `key`, but never a level
    /// below `min_level` when the list is at least that tall.
    fn entry_index(&self, key: f64, min_level: usize) -> usize {
        let Some(max_level) = self.max_level else {
            return 0;
        };

        for level_idx in (0..=max_level).rev() {
            if level_idx <= min_level {
                return level_idx;
            }

            if let Some(first) = self.start[level_idx] {
                let first_key = self.key_of(first);
                if first_key <= key || self.keys_equal(first_key, key) {
                    return level_idx;
                }
            }
        }

        0
    }

    /// Descend towards `key`. Returns a node with an equal key if there is one. Otherwise, if
    /// `greater_or_equal` is set, returns the first node with a larger key.
    fn find_extended(&self, key: f64, greater_or_equal: bool) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }

        let mut level_idx = self.entry_index(key, 0);
        let mut current: Link = None;

        loop {
            let next = self.successor(current, level_idx);

            if let Some(next_node) = next {
                let next_key = self.key_of(next_node);
                if self.keys_equal(next_key, key) {
                    return next;
                }

                if next_key <= key {
                    current = next;
                    continue;
                }
            }

            if level_idx == 0 {
                // `next` is the first node past `key`, if any
                return if greater_or_equal { next } else { None };
            }

            // The neighbour on the bottom level may already be the match
            if let Some(below) = self.successor(current, 0) {
                if self.keys_equal(self.key_of(below), key) {
                    return Some(below);
                }
            }

            level_idx -= 1;
        }
    }

    /// Splice a node that is neither the new first nor the new last node into every level it
    /// spans that already has nodes on both sides of it.
    ///
    /// Levels where the node has no predecessor are left for [`Self::fix_anchors`].
    fn link_inner(&mut self, new_node: NodeId, key: f64, level: usize) {
        let mut level_idx = self.entry_index(key, level);
        let mut current: Link = None;

        loop {
            let next = self.successor(current, level_idx);

            if let Some(next_node) = next {
                if self.key_of(next_node) <= key {
                    current = next;
                    continue;
                }
            }

            if level_idx <= level {
                if let Some(previous) = current {
                    self.nodes[new_node].forward[level_idx] = next;
                    self.nodes[previous].forward[level_idx] = Some(new_node);

                    if level_idx == 0 {
                        self.nodes[new_node].backward = Some(previous);
                        if let Some(next_node) = next {
                            self.nodes[next_node].backward = Some(new_node);
                        }
                    }
                }
            }

            if level_idx == 0 {
                break;
            }

            level_idx -= 1;
        }
    }

    /// Point the level anchors at the new node where it became the first or last node, linking it
    /// to the old first or last node on the way.
    fn fix_anchors(
        &mut self,
        new_node: NodeId,
        key: f64,
        level: usize,
        is_new_first: bool,
        is_new_last: bool,
    ) {
        for level_idx in (0..=level).rev() {
            let mut changed = false;

            if is_new_last && !is_new_first {
                // Append after the old last node. Not done when the node is also the new first
                // node or it would get linked to itself.
                if let Some(old_last) = self.end[level_idx] {
                    self.nodes[old_last].forward[level_idx] = Some(new_node);
                    if level_idx == 0 {
                        self.nodes[new_node].backward = Some(old_last);
                    }
                }

                self.end[level_idx] = Some(new_node);
                if self.start[level_idx].is_none() {
                    self.start[level_idx] = Some(new_node);
                }

                changed = true;
            } else {
                let old_first = self.start[level_idx];
                if old_first.map_or(true, |first| self.key_of(first) > key) {
                    self.nodes[new_node].forward[level_idx] = old_first;
                    if level_idx == 0 {
                        if let Some(first) = old_first {
                            self.nodes[first].backward = Some(new_node);
                        }
                    }

                    self.start[level_idx] = Some(new_node);
                    changed = true;
                }

                if self.nodes[new_node].forward[level_idx].is_none() {
                    self.end[level_idx] = Some(new_node);
                    changed = true;
                }
            }

            // A node with neighbours on both sides at this level has them on every lower level too
            if !changed {
                break;
            }
        }
    }

    /// Unlink `target` from `level`, where `previous` is the node before it (`None` if `target` is
    /// the first node on the level).
    fn unlink(&mut self, previous: Link, target: NodeId, level: usize) {
        let after = self.nodes[target].forward[level];

        match previous {
            Some(previous_node) => self.nodes[previous_node].forward[level] = after,
            None => {
                self.start[level] = after;
                if after.is_none() {
                    // The level is empty now
                    self.max_level = level.checked_sub(1);
                }
            }
        }

        if level == 0 {
            if let Some(after_node) = after {
                self.nodes[after_node].backward = previous;
            }
        }

        if after.is_none() {
            self.end[level] = previous;
        }
    }
}

fn within_eps(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// An iterator adapter over the nodes of a `SkipList`.
///
/// This `struct` is created by the [`iter`] method.
///
/// [`iter`]: SkipList::iter
pub struct NodeIterHelper<'a, T: ListElement> {
    skiplist: &'a SkipList<T>,
    front: Link,
    back: Link,
    /// Guards against the two ends crossing over.
    remaining: usize,
}

impl<'a, T: ListElement> Iterator for NodeIterHelper<'a, T> {
    type Item = (f64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let skiplist = self.skiplist;
        let node = &skiplist.nodes[self.front?];
        self.front = node.forward[0];
        self.remaining -= 1;

        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: ListElement> DoubleEndedIterator for NodeIterHelper<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let skiplist = self.skiplist;
        let node = &skiplist.nodes[self.back?];
        self.back = node.backward;
        self.remaining -= 1;

        Some((node.key, &node.value))
    }
}

impl<T: ListElement> ExactSizeIterator for NodeIterHelper<'_, T> {}

impl<T: ListElement> FusedIterator for NodeIterHelper<'_, T> {}

impl<'a, T: ListElement> IntoIterator for &'a SkipList<T> {
    type Item = (f64, &'a T);
    type IntoIter = NodeIterHelper<'a, T>;

    fn into_iter(self) -> NodeIterHelper<'a, T> {
        self.iter()
    }
}

impl<T: ListElement> Extend<T> for SkipList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
impl<T: ListElement> SkipList<T> {
    /// Walk every level and check the structural invariants of the list.
    fn assert_invariants(&self) {
        let ceiling = self.start.len();
        let mut highest_used = None;

        for level_idx in 0..ceiling {
            let mut previous: Link = None;
            let mut current = self.start[level_idx];
            let mut count = 0;

            while let Some(node) = current {
                let current_node = &self.nodes[node];
                assert!(current_node.level() >= level_idx);

                if let Some(previous_node) = previous {
                    assert!(self.key_of(previous_node) <= current_node.key);
                }
                if level_idx == 0 {
                    assert_eq!(current_node.backward, previous);
                }

                previous = current;
                current = current_node.forward[level_idx];
                count += 1;
            }

            assert_eq!(self.end[level_idx], previous);
            if count > 0 {
                highest_used = Some(level_idx);
            }
            if level_idx == 0 {
                assert_eq!(count, self.len());
            }
        }

        assert_eq!(self.max_level, highest_used);
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    /// Distinct keys in a random insertion order.
    fn distinct_keys() -> impl Strategy<Value = Vec<i32>> {
        prop::collection::hash_set(-5_000_i32..5_000, 1..300)
            .prop_map(|keys| keys.into_iter().collect::<Vec<i32>>())
            .prop_shuffle()
    }

    fn build(keys: &[i32], seed: u64) -> SkipList<i32> {
        let mut skiplist = SkipList::with_seed(1e-8, seed).unwrap();
        skiplist.extend(keys.iter().copied());
        skiplist
    }

    proptest! {
        #[test]
        fn walking_next_from_the_smallest_node_visits_every_key_in_ascending_order(
            keys in distinct_keys(),
            seed in any::<u64>(),
        ) {
            let skiplist = build(&keys, seed);
            skiplist.assert_invariants();

            let smallest = skiplist.smallest().unwrap();
            let mut visited = vec![*skiplist.value(smallest).unwrap()];
            let mut node = skiplist.next(smallest).unwrap();
            while node != smallest {
                let value = *skiplist.value(node).unwrap();
                prop_assert!(value > *visited.last().unwrap());
                visited.push(value);
                node = skiplist.next(node).unwrap();
            }

            let expected: Vec<i32> = keys.iter().copied().collect::<BTreeSet<i32>>().into_iter().collect();
            prop_assert_eq!(visited, expected);
        }

        #[test]
        fn walking_prev_from_the_largest_node_visits_every_key_in_descending_order(
            keys in distinct_keys(),
            seed in any::<u64>(),
        ) {
            let skiplist = build(&keys, seed);

            let largest = skiplist.largest().unwrap();
            let mut count = 1;
            let mut last_value = *skiplist.value(largest).unwrap();
            let mut node = skiplist.prev(largest).unwrap();
            while node != largest {
                let value = *skiplist.value(node).unwrap();
                prop_assert!(value < last_value);
                last_value = value;
                count += 1;
                node = skiplist.prev(node).unwrap();
            }

            prop_assert_eq!(count, keys.len());
        }

        #[test]
        fn next_and_prev_are_inverses(keys in distinct_keys(), seed in any::<u64>()) {
            let skiplist = build(&keys, seed);

            for key in &keys {
                let node = skiplist.find(key).unwrap();
                prop_assert_eq!(skiplist.next(skiplist.prev(node).unwrap()), Some(node));
                prop_assert_eq!(skiplist.prev(skiplist.next(node).unwrap()), Some(node));
            }
        }

        #[test]
        fn every_inserted_key_can_be_found(keys in distinct_keys(), seed in any::<u64>()) {
            let skiplist = build(&keys, seed);

            for key in &keys {
                let node = skiplist.find(key);
                prop_assert!(node.is_some());
                prop_assert_eq!(skiplist.get(node.unwrap()).unwrap().key(), *key as f64);
            }
        }

        #[test]
        fn deleting_every_key_in_any_order_empties_the_list(
            keys in distinct_keys(),
            seed in any::<u64>(),
        ) {
            let mut skiplist = build(&keys, seed);
            let mut order = keys.clone();
            order.shuffle(&mut StdRng::seed_from_u64(seed));

            for (deleted, key) in order.iter().enumerate() {
                prop_assert_eq!(skiplist.delete(key), Some(*key));
                prop_assert_eq!(skiplist.len(), keys.len() - deleted - 1);
                prop_assert_eq!(skiplist.find(key), None);
            }

            skiplist.assert_invariants();
            prop_assert!(skiplist.is_empty());
            prop_assert_eq!(skiplist.len(), 0);
        }

        #[test]
        fn interleaved_inserts_and_deletes_keep_the_list_consistent(
            operations in prop::collection::vec((any::<bool>(), -200_i32..200), 1..400),
            seed in any::<u64>(),
        ) {
            let mut skiplist = SkipList::<i32>::with_seed(1e-8, seed).unwrap();
            let mut model = std::collections::BTreeMap::<i32, usize>::new();

            for (is_insert, key) in operations {
                if is_insert {
                    skiplist.insert(key);
                    *model.entry(key).or_default() += 1;
                } else {
                    let expected = match model.get_mut(&key) {
                        Some(count) => {
                            *count -= 1;
                            if *count == 0 {
                                model.remove(&key);
                            }
                            Some(key)
                        }
                        None => None,
                    };
                    prop_assert_eq!(skiplist.delete(&key), expected);
                }
            }

            skiplist.assert_invariants();
            let expected: Vec<i32> = model
                .iter()
                .flat_map(|(key, count)| std::iter::repeat(*key).take(*count))
                .collect();
            let actual: Vec<i32> = skiplist.iter().map(|(_, value)| *value).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
