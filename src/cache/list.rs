//! Entry List Module
//!
//! Doubly linked list of entries in insertion order, backed by a slot arena.
//! Links are slot indices, so unlinking never touches freed memory.

use crate::cache::entry::{EntryId, Node};

// == Entry List ==
/// Insertion-ordered list of a store's entries.
///
/// - `head` = oldest insertion
/// - `tail` = newest insertion
///
/// Freed slots are recycled through `free`; every reuse carries a fresh
/// generation chosen by the caller.
#[derive(Debug, Default)]
pub(crate) struct EntryList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Back ==
    /// Appends a node at the tail and returns its id.
    pub fn push_back(&mut self, mut node: Node) -> EntryId {
        node.previous = self.tail;
        node.next = None;
        let generation = node.generation;

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(tail) = self.slots[tail].as_mut() {
                    tail.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        EntryId { index, generation }
    }

    // == Unlink ==
    /// Removes the node addressed by `id`, fixing up its neighbours and the
    /// list ends.
    ///
    /// Returns `None` when the slot is empty or holds a different generation.
    pub fn unlink(&mut self, id: EntryId) -> Option<Node> {
        if self.get(id).is_none() {
            return None;
        }
        let node = self.slots[id.index].take()?;

        match node.previous {
            Some(previous) => {
                if let Some(previous) = self.slots[previous].as_mut() {
                    previous.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next) = self.slots[next].as_mut() {
                    next.previous = node.previous;
                }
            }
            None => self.tail = node.previous,
        }

        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    // == Find ==
    /// Walks the list from the head and returns the id of the node holding
    /// `key`.
    pub fn find(&self, key: &str) -> Option<EntryId> {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.slots[index].as_ref()?;
            if node.key == key {
                return Some(EntryId {
                    index,
                    generation: node.generation,
                });
            }
            cursor = node.next;
        }
        None
    }

    pub fn get(&self, id: EntryId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .and_then(Option::as_ref)
            .filter(|node| node.generation == id.generation)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .and_then(Option::as_mut)
            .filter(|node| node.generation == id.generation)
    }

    /// Re-keys the node at `id` to a new generation and returns its new id.
    pub fn rearm(&mut self, id: EntryId, generation: u64) -> Option<EntryId> {
        let node = self.get_mut(id)?;
        node.generation = generation;
        Some(EntryId {
            index: id.index,
            generation,
        })
    }

    // == Clear ==
    /// Drops every node at once and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.len;
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        dropped
    }

    /// Keys in list order, head first.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(node) = cursor.and_then(|index| self.slots[index].as_ref()) {
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
