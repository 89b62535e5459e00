// gh-activity library.
// GitHub activity client with a size-bounded local response cache.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod github;

pub use error::{ActivityError, Result};
