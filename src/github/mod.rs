// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to the GitHub REST API.
//
// - fetch: the HTTP client, endpoint URLs and the page fetch helper
// - types: serde mirrors of the JSON responses
// - error: what can go wrong
// - repo_name: parsing "owner/name" references typed by the user
// =============================================================================

mod error;
mod fetch;
mod repo_name;
pub mod types;

pub use error::FetchError;
pub use fetch::{ErrorMsg, FetchOptions, Fetcher, LoadingMsg};
pub use repo_name::RepoName;
