// src/github/client.rs
// =============================================================================
// This module wraps the three GitHub REST endpoints we rely on:
//
// - Commit search: the newest commits authored by a login, which leak
//   the git-level author email even when the profile hides it
// - Profile lookup: display name, public email, and the account type
//   (this is how we tell users and organizations apart)
// - Member listing: paginated logins of an organization's public members
//
// Status-code policy (important!):
// - 403/429 means we hit the rate limit. That is the ONE error the rest
//   of the app must see and react to, so it gets its own variant.
// - Everything else non-successful means "no data here" and degrades to
//   an empty result without raising.
// - Network-level failures bubble up through the ? operator.
//
// Rust concepts:
// - thiserror: Derive macro for typed error enums
// - #[from]: Automatic conversion so ? works on reqwest errors
// - Pagination loops: Fetch until a short page signals the end
// =============================================================================

use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;

use super::models::{CommitSearchResponse, MemberEntry, Profile};

// GitHub serves 100 members per page at most; a shorter page means
// we just read the last one
const MEMBERS_PER_PAGE: usize = 100;

// Polite delay between member-list page fetches
const PAGE_DELAY: Duration = Duration::from_millis(200);

// Commit search needs this historical accept header; without it GitHub
// used to reject the endpoint outright
const COMMIT_SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview";

/// Errors from the GitHub client that callers may need to distinguish.
///
/// RateLimited is the only variant with special meaning upstream: the
/// resolver aborts the whole batch when it sees one. Transport covers
/// connection failures, timeouts, and bad response bodies.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub rate limit exceeded (HTTP {status}) - wait a while or provide a token")]
    RateLimited { status: u16 },

    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Process-wide configuration, built once at startup and handed to the
/// client. The api_base override exists so tests can point the client
/// at a local mock server.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Optional bearer token; legal to omit, but the anonymous rate
    /// limit is much lower
    pub token: Option<String>,
    /// Base URL of the GitHub REST API
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// What commit search found for one login.
#[derive(Debug, Default)]
pub struct CommitSearch {
    /// Author emails, deduplicated, newest-commit-first
    pub emails: Vec<String>,
    /// First nonempty author name across the hits
    pub author_name: Option<String>,
}

/// Stateless request helpers over a single pooled HTTP client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        // One client for all requests (connection pooling)
        let client = Client::builder()
            .user_agent(concat!("email-scout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))  // 10 second timeout per request
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    // Starts a GET request with the auth header attached (if we have a token)
    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = self.client.get(format!("{}{}", self.config.api_base, path));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        request
    }

    // Maps a forbidden/rate-limited status to our typed error
    //
    // GitHub answers 403 on the primary limit and 429 on secondary
    // limits; we treat both the same way
    fn check_rate_limit(status: StatusCode) -> Result<(), GithubError> {
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GithubError::RateLimited {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Searches the 5 most recent commits authored by `login` and
    /// collects the author emails found on them.
    ///
    /// A "no result" answer (422 for an unknown user, or any other
    /// non-success status) yields an empty CommitSearch silently. Only
    /// a rate-limit status raises.
    pub async fn search_commit_emails(&self, login: &str) -> Result<CommitSearch, GithubError> {
        let response = self
            .get("/search/commits")
            .query(&[
                ("q", format!("author:{}", login).as_str()),
                ("sort", "author-date"),
                ("order", "desc"),
                ("per_page", "5"),
            ])
            .header("Accept", COMMIT_SEARCH_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        Self::check_rate_limit(status)?;

        if !status.is_success() {
            // Invalid query / no matching user - an empty but valid outcome
            return Ok(CommitSearch::default());
        }

        let payload: CommitSearchResponse = response.json().await?;

        let mut result = CommitSearch::default();
        for item in payload.items {
            let author = item.commit.author;
            if let Some(email) = author.email {
                // Exact-match dedup only: no case folding, no domain games
                if !email.is_empty() && !result.emails.contains(&email) {
                    result.emails.push(email);
                }
            }
            if result.author_name.is_none() {
                if let Some(name) = author.name {
                    if !name.is_empty() {
                        result.author_name = Some(name);
                    }
                }
            }
        }

        Ok(result)
    }

    /// Fetches the public profile for `login`.
    ///
    /// Returns Ok(None) for any non-success status - a 404, a private
    /// account, whatever. We can't tell "no such user" apart from
    /// "lookup failed" here, and callers don't need to. Rate limits
    /// raise as usual.
    pub async fn fetch_profile(&self, login: &str) -> Result<Option<Profile>, GithubError> {
        let response = self.get(&format!("/users/{}", login)).send().await?;

        let status = response.status();
        Self::check_rate_limit(status)?;

        if !status.is_success() {
            return Ok(None);
        }

        let profile: Profile = response.json().await?;
        Ok(Some(profile))
    }

    /// Lists the public member logins of an organization.
    ///
    /// Pages through /orgs/{org}/members at 100 per page until a short
    /// or empty page says we're done. A 404 mid-way ends enumeration
    /// with whatever we collected; a rate-limit status raises.
    pub async fn list_org_members(&self, org: &str) -> Result<Vec<String>, GithubError> {
        let mut members = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response = self
                .get(&format!("/orgs/{}/members", org))
                .query(&[
                    ("per_page", MEMBERS_PER_PAGE.to_string().as_str()),
                    ("page", page.to_string().as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            Self::check_rate_limit(status)?;

            if !status.is_success() {
                // Org vanished or members are hidden: keep what we have
                break;
            }

            let entries: Vec<MemberEntry> = response.json().await?;
            let count = entries.len();
            members.extend(entries.into_iter().map(|entry| entry.login));

            // A short page is the end marker - no extra request needed
            if count < MEMBERS_PER_PAGE {
                break;
            }

            page += 1;

            // Polite pagination: small delay before the next page
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(members)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[from] do on an error variant?
//    - It generates a From<reqwest::Error> impl for GithubError
//    - That's what lets us write ? after reqwest calls and get our
//      own error type back automatically
//
// 2. Why does new() take a config struct instead of reading env vars?
//    - The client stays testable: tests construct a config pointing
//      at a mock server, no environment fiddling needed
//    - Configuration is read exactly once, at startup, in main
//
// 3. Why RequestBuilder and not a finished request?
//    - get() returns the builder so each endpoint helper can stack
//      its own query parameters and headers before sending
//
// 4. Why not follow the Link header for pagination?
//    - Counting page sizes is enough: GitHub returns full pages until
//      the last one, so "shorter than requested" means done
// -----------------------------------------------------------------------------
