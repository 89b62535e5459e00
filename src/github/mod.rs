// GitHub API module.
// Provides the client, endpoint descriptors and response types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitHubClient, RemoteService};
pub use endpoints::Endpoint;
pub use types::*;
