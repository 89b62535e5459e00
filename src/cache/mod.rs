// Cache module for local response caching.
// Stores GitHub API responses in a size-bounded file, evicting the least recently used.

pub mod eviction;
pub mod fetch;
pub mod paths;
pub mod store;

pub use eviction::evict;
pub use fetch::{ApiRequest, CachedFetcher};
pub use store::{CacheEntry, CacheFile, CacheStore, now_ms};
