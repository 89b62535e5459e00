// Cache-aware fetching.
// Serves requests from the cache file when possible and records remote responses.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::github::{Endpoint, RemoteService};

use super::eviction::evict;
use super::store::{CacheEntry, CacheFile, CacheStore, now_ms};

/// A logical request: what to fetch and how to find it in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub page: u32,
    /// `None` for requests that are always fetched and never stored.
    pub cache_key: Option<String>,
}

impl ApiRequest {
    pub fn cached(endpoint: Endpoint, page: u32, cache_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            page,
            cache_key: Some(cache_key.into()),
        }
    }

    pub fn uncached(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            page: 1,
            cache_key: None,
        }
    }
}

/// Fetches through the response cache.
///
/// This is the only writer of the cache file. Every call loads the file,
/// and writes it back at most once.
pub struct CachedFetcher<R> {
    file: CacheFile,
    capacity: usize,
    remote: R,
}

impl<R: RemoteService> CachedFetcher<R> {
    pub fn new(config: &CacheConfig, remote: R) -> Self {
        Self {
            file: CacheFile::new(config.path.clone()),
            capacity: config.capacity,
            remote,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cache_file(&self) -> &CacheFile {
        &self.file
    }

    /// Return the payload for `request`, from the cache or the remote service.
    ///
    /// A failed remote call is logged and yields `Ok(None)`; only a failure to
    /// write the cache file is returned as an error.
    pub async fn fetch(&mut self, request: &ApiRequest) -> Result<Option<Value>> {
        self.fetch_as(request).await
    }

    /// Like [`fetch`](Self::fetch), deserializing the payload into `T`.
    ///
    /// A remote payload that does not decode is not cached. A cached payload
    /// that no longer decodes is dropped from the store.
    pub async fn fetch_as<T: DeserializeOwned>(&mut self, request: &ApiRequest) -> Result<Option<T>> {
        let Some(key) = request.cache_key.as_deref() else {
            return match self.fetch_remote(request).await {
                Some(data) => Ok(Some(T::deserialize(&data)?)),
                None => Ok(None),
            };
        };

        let mut store = self.file.load();

        let hit = store.get_mut(key).map(|entry| {
            entry.touch(now_ms());
            T::deserialize(&entry.data)
        });
        match hit {
            Some(Ok(value)) => {
                debug!(%key, "cache hit");
                self.persist(store)?;
                return Ok(Some(value));
            }
            Some(Err(e)) => {
                warn!(%key, error = %e, "cached payload does not decode, dropping entry");
                store.remove(key);
                self.persist(store)?;
                return Err(e.into());
            }
            None => debug!(%key, "cache miss"),
        }

        let Some(data) = self.fetch_remote(request).await else {
            return Ok(None);
        };

        let value = T::deserialize(&data)?;
        store.insert(key, CacheEntry::new(data));
        self.persist(store)?;
        Ok(Some(value))
    }

    /// Remove the cache file.
    pub fn clear(&self) -> Result<()> {
        self.file.clear()
    }

    async fn fetch_remote(&mut self, request: &ApiRequest) -> Option<Value> {
        match self.remote.request(&request.endpoint, request.page).await {
            Ok(data) => Some(data),
            Err(e) => {
                error!(endpoint = %request.endpoint, page = request.page, "request failed: {}", e);
                None
            }
        }
    }

    fn persist(&self, store: CacheStore) -> Result<()> {
        let store = evict(store, self.capacity);
        self.file.save(&store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActivityError;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Answers from a fixed table keyed by endpoint path and counts calls.
    #[derive(Default)]
    struct FakeRemote {
        responses: HashMap<String, Value>,
        calls: usize,
    }

    impl FakeRemote {
        fn with(mut self, path: &str, data: Value) -> Self {
            self.responses.insert(path.to_string(), data);
            self
        }
    }

    impl RemoteService for FakeRemote {
        async fn request(&mut self, endpoint: &Endpoint, _page: u32) -> Result<Value> {
            self.calls += 1;
            self.responses
                .get(&endpoint.path())
                .cloned()
                .ok_or_else(|| ActivityError::NotFound(endpoint.path()))
        }
    }

    fn profile(username: &str) -> ApiRequest {
        ApiRequest::cached(
            Endpoint::UserProfile {
                username: username.to_string(),
            },
            1,
            format!("profile_{}", username),
        )
    }

    fn fetcher(dir: &TempDir, capacity: usize, remote: FakeRemote) -> CachedFetcher<FakeRemote> {
        let config = CacheConfig::new(dir.path().join("cache.json"), capacity);
        CachedFetcher::new(&config, remote)
    }

    #[tokio::test]
    async fn test_miss_populates_cache() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!({"name": "Octo Cat"}));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        let before = now_ms();
        let data = fetcher.fetch(&profile("octocat")).await.unwrap();
        assert_eq!(data, Some(json!({"name": "Octo Cat"})));
        assert_eq!(fetcher.remote().calls, 1);

        let store = fetcher.cache_file().load();
        assert_eq!(store.len(), 1);
        let entry = store.get("profile_octocat").unwrap();
        assert_eq!(entry.data, json!({"name": "Octo Cat"}));
        assert!(entry.timestamp >= before);
    }

    #[tokio::test]
    async fn test_hit_skips_remote_and_refreshes() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!({"name": "Octo Cat"}));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        fetcher.fetch(&profile("octocat")).await.unwrap();

        let first = fetcher.fetch(&profile("octocat")).await.unwrap();
        let first_ts = fetcher.cache_file().load().get("profile_octocat").unwrap().timestamp;

        let second = fetcher.fetch(&profile("octocat")).await.unwrap();
        let second_ts = fetcher.cache_file().load().get("profile_octocat").unwrap().timestamp;

        assert_eq!(first, Some(json!({"name": "Octo Cat"})));
        assert_eq!(first, second);
        assert!(second_ts >= first_ts);
        assert_eq!(fetcher.remote().calls, 1);
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!({"login": "octocat"}));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        fetcher.fetch(&profile("octocat")).await.unwrap();
        let before = fetcher.cache_file().load();

        let data = fetcher.fetch(&profile("ghost")).await.unwrap();
        assert_eq!(data, None);
        assert_eq!(fetcher.cache_file().load(), before);
    }

    #[tokio::test]
    async fn test_uncached_request_bypasses_store() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/rate_limit", json!({"rate": {}}));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        let request = ApiRequest::uncached(Endpoint::RateLimit);
        fetcher.fetch(&request).await.unwrap();
        fetcher.fetch(&request).await.unwrap();

        assert_eq!(fetcher.remote().calls, 2);
        assert!(!fetcher.cache_file().path().exists());
    }

    #[tokio::test]
    async fn test_capacity_enforced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let mut remote = FakeRemote::default();
        for i in 0..9 {
            remote = remote.with(&format!("/users/user{}", i), json!(i));
        }
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        for i in 0..9 {
            fetcher.fetch(&profile(&format!("user{}", i))).await.unwrap();
            // Keep timestamps strictly increasing
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let store = fetcher.cache_file().load();
        assert_eq!(store.len(), 7);
        assert!(!store.contains_key("profile_user0"));
        assert!(!store.contains_key("profile_user1"));
        assert!(store.contains_key("profile_user8"));
    }

    #[tokio::test]
    async fn test_hit_protects_entry_from_eviction() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default()
            .with("/users/a", json!("a"))
            .with("/users/b", json!("b"))
            .with("/users/c", json!("c"));
        let mut fetcher = fetcher(&temp_dir, 2, remote);

        for name in ["a", "b"] {
            fetcher.fetch(&profile(name)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        // Touch "a" so "b" becomes the oldest
        fetcher.fetch(&profile("a")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        fetcher.fetch(&profile("c")).await.unwrap();

        let store = fetcher.cache_file().load();
        assert!(store.contains_key("profile_a"));
        assert!(store.contains_key("profile_c"));
        assert!(!store.contains_key("profile_b"));
    }

    #[tokio::test]
    async fn test_fetch_as_typed() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!(["x", "y"]));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        let items: Option<Vec<String>> = fetcher.fetch_as(&profile("octocat")).await.unwrap();
        assert_eq!(items, Some(vec!["x".to_string(), "y".to_string()]));

        let items: Option<Vec<String>> = fetcher.fetch_as(&profile("octocat")).await.unwrap();
        assert_eq!(items, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(fetcher.remote().calls, 1);
    }

    #[tokio::test]
    async fn test_undecodable_response_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!(["x", "y"]));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        let err = fetcher.fetch_as::<u64>(&profile("octocat")).await.unwrap_err();
        assert!(matches!(err, ActivityError::Json(_)));
        assert!(!fetcher.cache_file().load().contains_key("profile_octocat"));

        // The next call goes back to the remote instead of replaying the bad payload
        let items: Option<Vec<String>> = fetcher.fetch_as(&profile("octocat")).await.unwrap();
        assert!(items.is_some());
        assert_eq!(fetcher.remote().calls, 2);
    }

    #[tokio::test]
    async fn test_undecodable_hit_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!(["x", "y"]));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        fetcher.fetch(&profile("octocat")).await.unwrap();
        assert!(fetcher.cache_file().load().contains_key("profile_octocat"));

        let err = fetcher.fetch_as::<u64>(&profile("octocat")).await.unwrap_err();
        assert!(matches!(err, ActivityError::Json(_)));
        assert!(!fetcher.cache_file().load().contains_key("profile_octocat"));
    }

    #[tokio::test]
    async fn test_corrupt_file_recovers() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!(1));
        let mut fetcher = fetcher(&temp_dir, 7, remote);
        std::fs::write(fetcher.cache_file().path(), "garbage").unwrap();

        let data = fetcher.fetch(&profile("octocat")).await.unwrap();
        assert_eq!(data, Some(json!(1)));
        assert_eq!(fetcher.cache_file().load().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::default().with("/users/octocat", json!(1));
        let mut fetcher = fetcher(&temp_dir, 7, remote);

        fetcher.fetch(&profile("octocat")).await.unwrap();
        fetcher.clear().unwrap();
        assert!(!fetcher.cache_file().path().exists());
        fetcher.clear().unwrap();
    }
}
