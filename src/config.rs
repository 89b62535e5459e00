// Runtime configuration.
// Loads cache location, cache capacity and the GitHub token from the environment.

use std::env;
use std::path::PathBuf;

use crate::cache::paths;

/// Default number of responses kept in the cache.
pub const DEFAULT_CAPACITY: usize = 7;

/// Environment variable overriding the cache capacity.
pub const CACHE_SIZE_VAR: &str = "GH_ACTIVITY_CACHE_SIZE";
/// Environment variable overriding the cache file location.
pub const CACHE_PATH_VAR: &str = "GH_ACTIVITY_CACHE_PATH";
/// Environment variable holding the GitHub token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Where the response cache lives and how many entries it may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub path: PathBuf,
    pub capacity: usize,
}

impl CacheConfig {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    /// Token for authenticated requests; anonymous when absent.
    pub token: Option<String>,
}

impl Config {
    /// Builds the configuration from environment variables.
    ///
    /// - `GH_ACTIVITY_CACHE_SIZE` - maximum cached responses (default: 7)
    /// - `GH_ACTIVITY_CACHE_PATH` - cache file (default: platform cache dir)
    /// - `GITHUB_TOKEN` - optional API token
    pub fn from_env() -> Self {
        let capacity = env::var(CACHE_SIZE_VAR)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CAPACITY);

        let path = env::var_os(CACHE_PATH_VAR)
            .map(PathBuf::from)
            .or_else(paths::store_path)
            .unwrap_or_else(paths::fallback_store_path);

        let token = env::var(TOKEN_VAR)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            cache: CacheConfig::new(path, capacity),
            token,
        }
    }
}
