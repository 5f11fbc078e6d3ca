//! Recency index for LRU eviction.
//!
//! Maintains a total order over all currently-stored keys, from
//! least-recently-used to most-recently-used. Uses a `HashMap` for
//! key→slot lookup and an arena-based doubly-linked list for the ordering,
//! so `record`, `touch`, `remove` and `pop_oldest` are all O(1) amortized.
//! No unsafe code: the list links are indices into a `Vec` of slots, with
//! removed slots recycled through a free list.

use std::collections::HashMap;

/// Sentinel value for null links in the doubly-linked list.
const NIL: usize = usize::MAX;

/// A slot in the arena-based doubly-linked list.
#[derive(Debug)]
struct Slot {
    key: String,
    prev: usize,
    next: usize,
}

/// Recency order over stored keys: head = most recent, tail = least recent.
#[derive(Debug)]
pub(crate) struct RecencyList {
    /// Key → arena index mapping.
    map: HashMap<String, usize>,
    /// Arena of slots.
    slots: Vec<Slot>,
    /// Index of the most-recently-used slot.
    head: usize,
    /// Index of the least-recently-used slot.
    tail: usize,
    /// Free-list head for recycling removed slots.
    free: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        RecencyList {
            map: HashMap::new(),
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Registers a key not currently tracked as most-recently-used.
    pub fn record(&mut self, key: &str) {
        debug_assert!(!self.map.contains_key(key), "key already tracked");

        let idx = self.alloc(key.to_owned());
        self.push_front(idx);
        self.map.insert(key.to_owned(), idx);
    }

    /// Moves a key to the most-recently-used position. Returns `false` if
    /// the key is not tracked.
    pub fn touch(&mut self, key: &str) -> bool {
        let Some(&idx) = self.map.get(key) else {
            return false;
        };
        if idx != self.head {
            self.unlink(idx);
            self.push_front(idx);
        }
        true
    }

    /// Stops tracking a key. Returns `false` if the key was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(idx) = self.map.remove(key) else {
            return false;
        };
        self.unlink(idx);
        self.release(idx);
        true
    }

    /// Removes and returns the least-recently-used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let idx = self.tail;
        if idx == NIL {
            return None;
        }
        self.unlink(idx);
        let key = std::mem::take(&mut self.slots[idx].key);
        self.map.remove(&key);
        self.release_blank(idx);
        Some(key)
    }

    /// Takes a slot from the free list or grows the arena.
    fn alloc(&mut self, key: String) -> usize {
        if self.free != NIL {
            let idx = self.free;
            self.free = self.slots[idx].next;
            self.slots[idx] = Slot {
                key,
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            self.slots.push(Slot {
                key,
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        }
    }

    /// Returns a slot to the free list.
    fn release(&mut self, idx: usize) {
        self.slots[idx].key = String::new();
        self.release_blank(idx);
    }

    fn release_blank(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.free;
        self.free = idx;
    }

    /// Detaches a slot from the list without freeing it.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    /// Links a detached slot in at the most-recently-used end.
    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;

        if self.head != NIL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == NIL {
            self.tail = idx;
        }
    }
}
