//! The main cache implementation.
//!
//! This module contains the `PrefixCache` type, which combines a radix trie
//! with an LRU recency index to provide a bounded, prefix-addressable cache.

use tracing::{debug, trace};

use crate::node::Node;
use crate::recency::RecencyList;
use crate::util::common_prefix_len;
use crate::Error;

/// A bounded, prefix-addressable cache.
///
/// Entries are stored in an edge-compressed (radix) trie keyed by string
/// prefixes, and evicted least-recently-used once the fixed capacity is
/// exceeded. `find_all` returns every stored key that is a prefix of the
/// query, most specific first, which makes the cache suitable for reusing
/// speculative text completions as a user types character by character.
///
/// The structure is mutated in place and assumes single-owner exclusive
/// access; all mutating operations take `&mut self` and run to completion
/// synchronously. Eviction happens strictly inline with `insert` — there is
/// no background work.
///
/// # Examples
///
/// ```
/// use prefix_lru::PrefixCache;
///
/// let mut cache = PrefixCache::new(64).unwrap();
/// cache.insert("const x = ", "42");
/// cache.insert("const x = 4", "2");
///
/// let matches = cache.find_all("const x = 4");
/// assert_eq!(matches[0].remaining_key, "");
/// assert_eq!(*matches[0].value, "2");
/// assert_eq!(matches[1].remaining_key, "4");
/// assert_eq!(*matches[1].value, "42");
/// ```
#[derive(Debug)]
pub struct PrefixCache<V> {
    /// The root of the trie. Its label is empty; the empty key is stored
    /// as the root's value.
    root: Node<V>,
    /// LRU→MRU order over stored keys. Its key set always equals the set
    /// of valueful trie nodes, so its length is the cache's size.
    recency: RecencyList,
    /// Maximum number of stored keys, fixed at construction.
    capacity: usize,
}

/// A single match returned by [`PrefixCache::find_all`].
///
/// `remaining_key` is the suffix of the query left over after removing the
/// matched stored key; `value` borrows the payload stored under that key.
#[derive(Debug, PartialEq, Eq)]
pub struct PrefixMatch<'a, V> {
    /// The unmatched tail of the query.
    pub remaining_key: &'a str,
    /// The payload cached under the matched prefix.
    pub value: &'a V,
}

impl<V> PrefixCache<V> {
    /// Creates a new, empty cache holding at most `capacity` keys.
    ///
    /// Fails with [`Error::ZeroCapacity`] if `capacity` is zero; the bound
    /// is never silently clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefix_lru::{Error, PrefixCache};
    ///
    /// let cache = PrefixCache::<u32>::new(16).unwrap();
    /// assert!(cache.is_empty());
    /// assert_eq!(cache.capacity(), 16);
    ///
    /// assert_eq!(PrefixCache::<u32>::new(0).unwrap_err(), Error::ZeroCapacity);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(PrefixCache {
            root: Node::new(Vec::new()),
            recency: RecencyList::new(),
            capacity,
        })
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.recency.len()
    }

    /// Returns `true` if the cache stores no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed capacity set at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is an exact stored key.
    ///
    /// This is a diagnostic peek: unlike [`find_all`](Self::find_all), it
    /// does not count as a use and leaves the recency order untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefix_lru::PrefixCache;
    ///
    /// let mut cache = PrefixCache::new(16).unwrap();
    /// cache.insert("hello", 1);
    ///
    /// assert!(cache.contains_key("hello"));
    /// assert!(!cache.contains_key("hel"));
    /// ```
    pub fn contains_key(&self, key: &str) -> bool {
        let bytes = key.as_bytes();
        let mut node = &self.root;
        let mut remaining = bytes;

        while !remaining.is_empty() {
            let Some(child) = node.children.get(&remaining[0]) else {
                return false;
            };
            if !remaining.starts_with(&child.label) {
                return false;
            }
            remaining = &remaining[child.label.len()..];
            node = child;
        }

        node.value.is_some()
    }

    /// Inserts or overwrites the payload for `key`, returning the previous
    /// payload on overwrite.
    ///
    /// A new key is registered as most-recently-used; if the cache then
    /// exceeds its capacity, the least-recently-used key is evicted (at
    /// most one eviction per call). Overwriting an existing key replaces
    /// its payload and marks it most-recently-used without evicting.
    ///
    /// The empty string is a legal key. Insertion order never affects the
    /// resulting queryable structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefix_lru::PrefixCache;
    ///
    /// let mut cache = PrefixCache::new(16).unwrap();
    /// assert_eq!(cache.insert("hello", 1), None);
    /// assert_eq!(cache.insert("hello", 2), Some(1));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let previous = insert_at(&mut self.root, key.as_bytes(), value);

        if previous.is_some() {
            // Overwrite: the key keeps its single recency entry
            self.recency.touch(key);
        } else {
            self.recency.record(key);
            if self.recency.len() > self.capacity {
                self.evict_oldest();
            }
        }

        previous
    }

    /// Returns every stored key that is a prefix of `query`, paired with
    /// the unmatched query suffix, ordered most specific (longest stored
    /// key, shortest `remaining_key`) first.
    ///
    /// Every returned key counts as a use and is marked most-recently-used.
    /// Queries with no matching prefix return an empty vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefix_lru::PrefixCache;
    ///
    /// let mut cache = PrefixCache::new(16).unwrap();
    /// cache.insert("test", "first");
    /// cache.insert("testing", "second");
    ///
    /// let matches = cache.find_all("testing");
    /// assert_eq!(matches.len(), 2);
    /// assert_eq!((matches[0].remaining_key, *matches[0].value), ("", "second"));
    /// assert_eq!((matches[1].remaining_key, *matches[1].value), ("ing", "first"));
    ///
    /// // A stored key that merely shares a prefix with the query is not a match
    /// assert!(cache.find_all("tes").is_empty());
    /// ```
    pub fn find_all<'a>(&'a mut self, query: &'a str) -> Vec<PrefixMatch<'a, V>> {
        let bytes = query.as_bytes();
        let mut hits: Vec<(usize, &V)> = Vec::new();

        let mut node = &self.root;
        let mut consumed = 0;
        loop {
            if let Some(value) = node.value.as_ref() {
                hits.push((consumed, value));
            }
            if consumed == bytes.len() {
                break;
            }
            let Some(child) = node.children.get(&bytes[consumed]) else {
                break;
            };
            // An edge only partially contained in the query dead-ends the
            // walk; the node beyond it is not a prefix of the query.
            if !bytes[consumed..].starts_with(&child.label) {
                break;
            }
            consumed += child.label.len();
            node = child;
        }

        trace!(query, hits = hits.len(), "prefix lookup");

        // Touch shortest match first so the longest (most specific) match
        // ends up most-recently-used.
        for &(matched, _) in &hits {
            self.recency.touch(&query[..matched]);
        }

        hits.reverse();
        hits.into_iter()
            .map(|(matched, value)| PrefixMatch {
                remaining_key: &query[matched..],
                value,
            })
            .collect()
    }

    /// Removes the payload stored at exactly `key`, returning it.
    ///
    /// Returns `None` without effect if `key` is not a stored key. After
    /// removal, any resulting chain of valueless single-child nodes is
    /// merged back into a single edge (path compression), and childless
    /// valueless nodes are pruned.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefix_lru::PrefixCache;
    ///
    /// let mut cache = PrefixCache::new(16).unwrap();
    /// cache.insert("test", "first");
    /// cache.insert("testing", "second");
    ///
    /// assert_eq!(cache.remove("test"), Some("first"));
    /// assert_eq!(cache.remove("test"), None);
    /// assert!(cache.find_all("test").is_empty());
    /// assert_eq!(*cache.find_all("testing")[0].value, "second");
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = remove_at(&mut self.root, key.as_bytes());
        if removed.is_some() {
            self.recency.remove(key);
        }
        removed
    }

    /// Evicts the least-recently-used key. Caller guarantees the cache is
    /// non-empty.
    fn evict_oldest(&mut self) {
        if let Some(victim) = self.recency.pop_oldest() {
            debug!(key = %victim, "evicting least-recently-used entry");
            let evicted = remove_at(&mut self.root, victim.as_bytes());
            debug_assert!(evicted.is_some(), "recency index out of sync with trie");
        }
    }
}

/// Inserts `value` under the remaining `key` below `node`, splitting an
/// edge if the key diverges inside its label. Returns the previous value
/// if the key was already stored.
///
/// Recurses one frame per trie level; every level consumes at least one
/// key byte, so the depth is bounded by the key length.
fn insert_at<V>(node: &mut Node<V>, key: &[u8], value: V) -> Option<V> {
    if key.is_empty() {
        return node.value.replace(value);
    }

    let Some(child) = node.children.get_mut(&key[0]) else {
        // No child shares the first byte: a fresh leaf takes the whole
        // remaining key as its label
        node.children.insert(key[0], Node::with_value(key.to_vec(), value));
        return None;
    };

    let common = common_prefix_len(key, &child.label);
    if common == child.label.len() {
        // The whole edge is consumed; descend
        return insert_at(child, &key[common..], value);
    }

    // The key diverges inside the edge label: split. `mid` keeps the shared
    // prefix and the old child is re-hung below it with the leftover label.
    let mid = Node::new(child.label[..common].to_vec());
    let mut detached = std::mem::replace(child, mid);
    detached.label.drain(..common);
    child.children.insert(detached.label[0], detached);

    if common == key.len() {
        // The key ends exactly at the split point
        child.value = Some(value);
    } else {
        let rest = key[common..].to_vec();
        child.children.insert(rest[0], Node::with_value(rest, value));
    }

    None
}

/// Removes the value stored under the remaining `key` below `node`,
/// restoring path compression on the unwind: childless valueless nodes are
/// pruned and valueless single-child nodes are merged with their child by
/// concatenating edge labels. The root is exempt from both rules.
///
/// Like `insert_at`, recursion depth is bounded by the key length.
fn remove_at<V>(node: &mut Node<V>, key: &[u8]) -> Option<V> {
    if key.is_empty() {
        return node.value.take();
    }

    let child = node.children.get_mut(&key[0])?;
    let common = common_prefix_len(key, &child.label);
    if common < child.label.len() {
        // The edge label is not fully contained in the key: not stored
        return None;
    }

    let removed = remove_at(child, &key[common..])?;

    let prune = child.value.is_none() && child.children.is_empty();
    if child.value.is_none() && child.children.len() == 1 {
        // Merge the now-redundant intermediate node with its only child
        let grand = child.children.drain().map(|(_, g)| g).next();
        if let Some(grand) = grand {
            child.label.extend_from_slice(&grand.label);
            child.value = grand.value;
            child.children = grand.children;
        }
    }
    if prune {
        node.children.remove(&key[0]);
    }

    Some(removed)
}

#[cfg(test)]
impl<V> PrefixCache<V> {
    /// Walks the whole structure asserting every internal invariant: edge
    /// labels are non-empty and keyed by their first byte, no valueless
    /// node outside the root has fewer than 2 children, the recency index
    /// tracks exactly the stored keys, and the size respects the capacity.
    fn assert_invariants(&self) {
        let mut keys = Vec::new();
        check_node(&self.root, true, &mut Vec::new(), &mut keys);

        assert_eq!(
            self.root.subtree_size(),
            keys.len(),
            "subtree size diverges from collected stored keys"
        );
        assert_eq!(
            keys.len(),
            self.recency.len(),
            "recency entry count diverges from valueful node count"
        );
        for key in &keys {
            assert!(self.recency.contains(key), "stored key {key:?} lacks a recency entry");
        }
        assert!(keys.len() <= self.capacity, "capacity bound violated");
    }
}

#[cfg(test)]
fn check_node<V>(node: &Node<V>, is_root: bool, path: &mut Vec<u8>, keys: &mut Vec<String>) {
    if is_root {
        assert!(node.label.is_empty(), "root must have an empty label");
    } else {
        assert!(!node.label.is_empty(), "edge labels must be non-empty");
        if node.value.is_none() {
            assert!(
                node.children.len() >= 2,
                "valueless non-root node with fewer than 2 children"
            );
        }
    }

    if node.value.is_some() {
        let key = String::from_utf8(path.clone()).expect("stored key is valid UTF-8");
        keys.push(key);
    }

    for (&first, child) in &node.children {
        assert_eq!(child.label.first(), Some(&first), "child keyed by wrong byte");
        path.extend_from_slice(&child.label);
        check_node(child, false, path, keys);
        path.truncate(path.len() - child.label.len());
    }
}
