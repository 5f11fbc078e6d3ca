//! # prefix_lru
//!
//! A bounded, prefix-addressable cache: a radix (edge-compressed) trie with
//! least-recently-used eviction.
//!
//! The cache stores arbitrary payloads under string keys and answers
//! "which stored keys are a prefix of this query?" in a single walk,
//! returning the most specific match first. Once the fixed capacity is
//! exceeded, the least-recently-used key is evicted; both reads (via
//! [`PrefixCache::find_all`]) and writes count as uses. The intended use is
//! caching speculative text completions keyed by the literal prefix that
//! produced them, so completions computed for a shorter prefix can be
//! reused as the user keeps typing.
//!
//! ## Features
//!
//! - **Prefix matching**: `find_all` returns every stored key that is a
//!   prefix of the query, paired with the unmatched query suffix
//! - **Path compression**: chains of single-child nodes are merged into one
//!   edge, both on insert (edge splitting) and on delete (edge merging)
//! - **Bounded memory**: a fixed capacity with inline O(1) LRU eviction
//!
//! ## Example
//!
//! ```rust
//! use prefix_lru::PrefixCache;
//!
//! let mut cache = PrefixCache::new(128).unwrap();
//!
//! cache.insert("test", "first");
//! cache.insert("testing", "second");
//!
//! // Most specific match first
//! let matches = cache.find_all("testing");
//! assert_eq!(matches[0].remaining_key, "");
//! assert_eq!(*matches[0].value, "second");
//! assert_eq!(matches[1].remaining_key, "ing");
//! assert_eq!(*matches[1].value, "first");
//! ```
//!
//! The cache is a plain single-owner structure: mutating operations take
//! `&mut self`, run synchronously, and never spawn background work. Wrap it
//! in your own synchronization if you need to share it across threads.

mod cache;
mod node;
mod recency;
mod util;

// Re-export public types
pub use crate::cache::{PrefixCache, PrefixMatch};

use thiserror::Error;

/// Errors that can occur when constructing a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The capacity bound must be at least 1; it is never silently clamped.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,
}
