// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Submodules:
// - client: The request helpers (commit search, profile lookup, member
//   listing) plus the config and error types
// - models: serde structs for the API response payloads
//
// This file (mod.rs) is the module root - it re-exports the public API
// that other parts of our application can use.
// =============================================================================

mod client;
mod models;

// Re-export public items from submodules
// This lets users write `github::GithubClient` instead of
// `github::client::GithubClient`
pub use client::{CommitSearch, GithubClient, GithubConfig, GithubError};
pub use models::Profile;
