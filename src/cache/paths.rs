// Cache path utilities.
// Resolves where the response cache file is stored.

use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the response cache inside the cache directory.
pub const STORE_FILE: &str = "cache.json";

/// Get the base cache directory (~/.cache/gh-activity on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gh-activity").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the response cache file.
pub fn store_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(STORE_FILE))
}

/// Used when no home directory can be determined.
pub fn fallback_store_path() -> PathBuf {
    std::env::temp_dir().join("gh-activity").join(STORE_FILE)
}
