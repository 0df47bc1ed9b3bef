//! LRU Recency List Module
//!
//! Implements the access order used for LRU eviction as an arena-backed
//! doubly-linked list. Nodes are addressed by [`Slot`] handles that stay valid
//! until the node is removed, so other indexes can point at a node without
//! scanning.

use crate::cache::CacheEntry;

// == Slot ==
/// Stable handle to a node in the recency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

#[derive(Debug)]
struct Node<K, V> {
    entry: CacheEntry<K, V>,
    /// Towards the front (less recently used)
    prev: Option<Slot>,
    /// Towards the back (more recently used)
    next: Option<Slot>,
}

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Freed nodes are recycled through a free list, so a long-running cache does
/// not grow its arena beyond its peak population.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    front: Option<Slot>,
    back: Option<Slot>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            front: None,
            back: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends an entry at the most recently used end.
    pub fn push_back(&mut self, entry: CacheEntry<K, V>) -> Slot {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                Slot(index)
            }
            None => {
                self.nodes.push(Some(node));
                Slot(self.nodes.len() - 1)
            }
        };
        self.link_back(slot);
        self.len += 1;
        slot
    }

    // == Touch ==
    /// Marks a node as most recently used (moves it to the back).
    pub fn touch(&mut self, slot: Slot) {
        if self.back == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.link_back(slot);
    }

    // == Remove ==
    /// Removes a node and returns its entry.
    pub fn remove(&mut self, slot: Slot) -> CacheEntry<K, V> {
        self.unlink(slot);
        let node = match self.nodes[slot.0].take() {
            Some(node) => node,
            None => unreachable!("removed vacant recency slot {:?}", slot),
        };
        self.free.push(slot.0);
        self.len -= 1;
        node.entry
    }

    // == Peek Oldest ==
    /// Returns the least recently used node without removing it.
    pub fn peek_oldest(&self) -> Option<Slot> {
        self.front
    }

    /// Returns the entry stored at `slot`.
    pub fn get(&self, slot: Slot) -> &CacheEntry<K, V> {
        &self.node(slot).entry
    }

    /// Returns the entry stored at `slot` for in-place update.
    pub fn get_mut(&mut self, slot: Slot) -> &mut CacheEntry<K, V> {
        &mut self.node_mut(slot).entry
    }

    // == Length ==
    /// Returns the number of tracked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.front,
        }
    }

    fn node(&self, slot: Slot) -> &Node<K, V> {
        match &self.nodes[slot.0] {
            Some(node) => node,
            None => unreachable!("accessed vacant recency slot {:?}", slot),
        }
    }

    fn node_mut(&mut self, slot: Slot) -> &mut Node<K, V> {
        match &mut self.nodes[slot.0] {
            Some(node) => node,
            None => unreachable!("accessed vacant recency slot {:?}", slot),
        }
    }

    fn unlink(&mut self, slot: Slot) {
        let (prev, next) = {
            let node = self.node_mut(slot);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.front = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.back = prev,
        }
    }

    fn link_back(&mut self, slot: Slot) {
        let old_back = self.back;
        {
            let node = self.node_mut(slot);
            node.prev = old_back;
            node.next = None;
        }
        match old_back {
            Some(old_back) => self.node_mut(old_back).next = Some(slot),
            None => self.front = Some(slot),
        }
        self.back = Some(slot);
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<Slot>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.node(slot);
        self.cursor = node.next;
        Some(&node.entry)
    }
}
