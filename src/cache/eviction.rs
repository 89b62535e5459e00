// Recency-based eviction.
// Keeps the most recently touched entries and drops the rest.

use std::cmp::Reverse;

use super::store::CacheStore;

/// Trim `store` to at most `capacity` entries, keeping the newest timestamps.
///
/// Equal timestamps are ordered by key so the result is deterministic.
pub fn evict(store: CacheStore, capacity: usize) -> CacheStore {
    if store.len() <= capacity {
        return store;
    }

    let mut entries: Vec<_> = store.into_entries().into_iter().collect();
    // Keys arrive sorted, so a stable sort on timestamp keeps key order for ties
    entries.sort_by_key(|(_, entry)| Reverse(entry.timestamp));
    entries.truncate(capacity);

    CacheStore::from_entries(entries.into_iter().collect())
}
