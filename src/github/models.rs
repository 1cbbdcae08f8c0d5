// src/github/models.rs
// =============================================================================
// This module defines the shapes of the GitHub API responses we consume.
//
// Each struct mirrors just the fields we actually read - serde happily
// ignores everything else in the payload.
//
// Endpoints covered:
// - GET /users/{login}            -> Profile
// - GET /search/commits?q=...     -> CommitSearchResponse
// - GET /orgs/{org}/members       -> Vec<MemberEntry>
//
// Rust concepts:
// - Deserialize: serde derive macro that generates JSON parsing code
// - Option<T>: Many GitHub fields are null for most accounts
// - #[serde(rename)]: When a JSON field name is a Rust keyword
// =============================================================================

use serde::Deserialize;

/// A user or organization profile from the `/users/{login}` API.
///
/// The same endpoint serves both kinds of account; `type` is how we
/// tell them apart ("User" vs "Organization").
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[allow(dead_code)]
    pub login: String,
    /// Display name, null for accounts that never set one
    pub name: Option<String>,
    /// Public email, null unless the user opted into showing it
    pub email: Option<String>,
    // 'type' is a Rust keyword, so the field needs a different name here
    #[serde(rename = "type")]
    pub account_type: String,
}

impl Profile {
    /// True when this profile belongs to an organization account
    pub fn is_organization(&self) -> bool {
        self.account_type == "Organization"
    }
}

/// Response envelope from the commit search API (`/search/commits`).
#[derive(Debug, Deserialize)]
pub struct CommitSearchResponse {
    #[serde(default)]
    pub items: Vec<CommitSearchItem>,
}

/// A single commit hit from the search results.
#[derive(Debug, Deserialize)]
pub struct CommitSearchItem {
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
}

/// The git-level author recorded on a commit.
///
/// These come from git metadata, not the GitHub account, so either
/// field can be empty or missing on odd commits.
#[derive(Debug, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One entry from the organization member listing.
#[derive(Debug, Deserialize)]
pub struct MemberEntry {
    pub login: String,
}
