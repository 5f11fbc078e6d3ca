//! Internal node implementation for the radix trie.
//!
//! This module contains the internal `Node` structure that forms the backbone
//! of the cache's radix trie. Nodes are plainly owned by their parent through
//! the children map; the structure is a strict tree with no sharing.

use std::collections::HashMap;

/// Internal node type for the radix trie.
///
/// This type is not exposed in the public API but is used internally by
/// `PrefixCache`. Each node carries the label of its incoming edge (empty
/// only at the root), an optional payload, and a map of children keyed by
/// the first byte of each child's label.
#[derive(Debug)]
pub(crate) struct Node<V> {
    /// The incoming edge label (as a sequence of UTF-8 bytes).
    pub label: Vec<u8>,

    /// The payload stored at this node, if some key terminates here.
    pub value: Option<V>,

    /// Child nodes indexed by the first byte of their label. At most one
    /// child may start with any given byte.
    pub children: HashMap<u8, Node<V>>,
}

impl<V> Node<V> {
    /// Creates a new valueless node with the given edge label.
    pub fn new(label: Vec<u8>) -> Self {
        Node {
            label,
            value: None,
            children: HashMap::new(),
        }
    }

    /// Creates a new node with the given edge label and payload.
    pub fn with_value(label: Vec<u8>, value: V) -> Self {
        Node {
            label,
            value: Some(value),
            children: HashMap::new(),
        }
    }

    /// Returns the number of values stored in this subtree. Used by the
    /// cache's invariant checker to cross-check the recency index.
    #[cfg(test)]
    pub fn subtree_size(&self) -> usize {
        let mut count = usize::from(self.value.is_some());

        for child in self.children.values() {
            count += child.subtree_size();
        }

        count
    }
}
