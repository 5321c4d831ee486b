//! Slot storage for skip list nodes.
//!
//! Nodes refer to each other by [`NodeId`] instead of by pointer. Every slot carries a generation
//! that changes when the slot is vacated, so a handle to a removed node can never resolve to
//! whatever node later reuses the slot.

use std::ops::{Index, IndexMut};

/// An opaque handle to a node stored in a [`SkipList`](crate::SkipList).
///
/// Handles are cheap to copy and stay valid until the node they refer to is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    entry: Option<T>,
}

/// A growable slab with stable indices and slot reuse.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots, reused last-in first-out.
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: vec![],
            free: vec![],
            len: 0,
        }
    }

    /// Store `value` and return a handle to it.
    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(value);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            entry: Some(value),
        });

        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Remove and return the value behind `id` if it is still live.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }

        let value = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;

        Some(value)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Remove every value. Outstanding handles stop resolving.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.len = 0;
    }
}

/// Panics if `id` does not refer to a live value. Only used for links the skip list keeps valid.
impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("dangling node handle {:?}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("dangling node handle {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn with_an_empty_arena_len_returns_zero() {
        let arena = Arena::<String>::new();

        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn insert_returns_a_handle_that_resolves_to_the_value() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());
        let banana = arena.insert("banana".to_string());

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(apple), Some(&"apple".to_string()));
        assert_eq!(arena[banana], "banana".to_string());
    }

    #[test]
    fn remove_returns_the_value_once() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());

        assert_eq!(arena.remove(apple), Some("apple".to_string()));
        assert_eq!(arena.remove(apple), None);
        assert!(!arena.contains(apple));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn a_stale_handle_does_not_resolve_to_a_reused_slot() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());
        arena.remove(apple);

        let orange = arena.insert("orange".to_string());

        assert_eq!(arena.get(apple), None);
        assert_eq!(arena.get(orange), Some(&"orange".to_string()));
        assert_ne!(apple, orange);
    }

    #[test]
    fn get_mut_allows_updating_a_value_in_place() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());

        arena.get_mut(apple).unwrap().push_str(" pie");

        assert_eq!(arena[apple], "apple pie".to_string());
    }

    #[test]
    fn clear_invalidates_every_handle() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());
        let banana = arena.insert("banana".to_string());

        arena.clear();

        assert_eq!(arena.len(), 0);
        assert_eq!(arena.get(apple), None);
        assert_eq!(arena.get(banana), None);

        let orange = arena.insert("orange".to_string());
        assert_eq!(arena.get(orange), Some(&"orange".to_string()));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    #[should_panic(expected = "dangling node handle")]
    fn indexing_with_a_removed_handle_panics() {
        let mut arena = Arena::new();
        let apple = arena.insert("apple".to_string());
        arena.remove(apple);

        let _ = &arena[apple];
    }
}
