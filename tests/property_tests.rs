use std::collections::HashSet;

use prefix_lru::PrefixCache;
use quickcheck::{quickcheck, TestResult};

fn collect(cache: &mut PrefixCache<u32>, query: &str) -> Vec<(String, u32)> {
    cache
        .find_all(query)
        .iter()
        .map(|m| (m.remaining_key.to_owned(), *m.value))
        .collect()
}

/// Keeps the first occurrence of each key, preserving order.
fn distinct_keys(pairs: Vec<(String, u32)>) -> Vec<(String, u32)> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect()
}

fn filled(pairs: &[(String, u32)]) -> PrefixCache<u32> {
    let mut cache = PrefixCache::new(pairs.len().max(1)).unwrap();
    for (key, value) in pairs {
        cache.insert(key, *value);
    }
    cache
}

quickcheck! {
    /// For a fixed set of entries, the insertion order never affects any
    /// query result.
    fn insertion_order_is_irrelevant(pairs: Vec<(String, u32)>, query: String) -> bool {
        let pairs = distinct_keys(pairs);
        let mut reversed = pairs.clone();
        reversed.reverse();

        let mut forward = filled(&pairs);
        let mut backward = filled(&reversed);

        if collect(&mut forward, &query) != collect(&mut backward, &query) {
            return false;
        }
        pairs
            .iter()
            .all(|(key, _)| collect(&mut forward, key) == collect(&mut backward, key))
    }

    /// Every result's matched key was inserted, reassembles the query with
    /// its remaining suffix, and results come back most specific first.
    fn results_are_exactly_the_stored_prefixes(pairs: Vec<(String, u32)>, query: String) -> bool {
        let pairs = distinct_keys(pairs);
        let mut cache = filled(&pairs);
        let results = collect(&mut cache, &query);

        // Containment: each matched key is a stored key carrying its value
        for (remaining, value) in &results {
            if !query.ends_with(remaining.as_str()) {
                return false;
            }
            let matched = &query[..query.len() - remaining.len()];
            if !pairs.iter().any(|(k, v)| k == matched && v == value) {
                return false;
            }
        }

        // Completeness: every stored key that prefixes the query shows up
        let expected = pairs
            .iter()
            .filter(|(k, _)| query.starts_with(k.as_str()))
            .count();
        if results.len() != expected {
            return false;
        }

        // Sort order: non-decreasing remaining-suffix length
        results
            .windows(2)
            .all(|w| w[0].0.len() <= w[1].0.len())
    }

    /// The stored-key count never exceeds the capacity bound.
    fn capacity_is_never_exceeded(pairs: Vec<(String, u32)>, capacity: u8) -> bool {
        let capacity = usize::from(capacity % 8) + 1;
        let mut cache = PrefixCache::new(capacity).unwrap();

        for (key, value) in &pairs {
            cache.insert(key, *value);
            if cache.len() > capacity {
                return false;
            }
        }
        true
    }

    /// With no eviction in play, every inserted key comes back as the most
    /// specific match for itself.
    fn inserted_keys_round_trip(pairs: Vec<(String, u32)>) -> bool {
        let pairs = distinct_keys(pairs);
        let mut cache = filled(&pairs);

        pairs.iter().all(|(key, value)| {
            let results = collect(&mut cache, key);
            results.first() == Some(&(String::new(), *value))
        })
    }

    /// Inserting then deleting a key leaves the cache indistinguishable
    /// from one that never saw it.
    fn delete_undoes_insert(pairs: Vec<(String, u32)>, extra: (String, u32), query: String) -> TestResult {
        let pairs = distinct_keys(pairs);
        if pairs.iter().any(|(k, _)| *k == extra.0) {
            return TestResult::discard();
        }

        let mut untouched = filled(&pairs);

        let mut cache = PrefixCache::new(pairs.len().max(1) + 1).unwrap();
        for (key, value) in &pairs {
            cache.insert(key, *value);
        }
        cache.insert(&extra.0, extra.1);
        cache.remove(&extra.0);

        if collect(&mut cache, &query) != collect(&mut untouched, &query) {
            return TestResult::failed();
        }
        for (key, _) in &pairs {
            if collect(&mut cache, key) != collect(&mut untouched, key) {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
}
