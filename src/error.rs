// Error types for gh-activity.
// Covers GitHub API failures, cache storage failures, and usage errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ActivityError>;
