// src/resolver/engine.rs
// =============================================================================
// This module is the heart of email-scout: it decides what a name IS
// and gathers every email we can find for it.
//
// The decision tree for one name:
// 1. Commit search first. Any email hit means we treat the name as an
//    individual and we're done - even if the same login also exists as
//    an organization.
// 2. No commit emails? Look up the profile. type == "Organization"
//    sends us down the org path; anything else (including a 404) is
//    an individual with whatever the profile gave us.
// 3. Org path: list the members, then enrich them in groups of 5 -
//    each member's profile and commit lookups run concurrently, groups
//    run one after another with a pause in between.
//
// Failure policy: enrichment failures degrade to empty data for that
// member only. A rate-limit is different - it aborts the entire batch,
// because hammering on is pointless once GitHub starts refusing us.
//
// Rust concepts:
// - Tagged results: EntityKind makes the individual/org branch explicit
// - join_all: Run a group of futures concurrently, keep their order
// - tokio::join!: Run exactly two futures concurrently
// =============================================================================

use serde::Serialize;
use std::time::Duration;

use crate::github::{CommitSearch, GithubClient, GithubError};

// Delay between top-level names - they are processed strictly one at a
// time to stay inside the rate limit
const NAME_DELAY: Duration = Duration::from_millis(1000);

// Member enrichment runs in groups of this size
const GROUP_SIZE: usize = 5;

// Pause between member groups
const GROUP_DELAY: Duration = Duration::from_millis(500);

/// What kind of account an input name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Individual,
    Organization,
}

/// One GitHub user with every email we discovered for them.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedUser {
    pub login: String,
    /// Display name, when either the profile or a commit provided one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Always derived as https://github.com/{login}
    pub profile_url: String,
    /// Insertion-ordered and duplicate-free (exact match, no case folding)
    pub emails: Vec<String>,
}

impl ResolvedUser {
    fn new(login: &str, display_name: Option<String>, emails: Vec<String>) -> Self {
        Self {
            login: login.to_string(),
            display_name,
            profile_url: format!("https://github.com/{}", login),
            emails,
        }
    }
}

/// The outcome for one input name.
///
/// An individual always carries exactly one member; an organization
/// carries zero or more.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntity {
    pub input_name: String,
    pub kind: EntityKind,
    pub members: Vec<ResolvedUser>,
}

impl ResolvedEntity {
    /// Total number of emails discovered across all members
    pub fn email_count(&self) -> usize {
        self.members.iter().map(|member| member.emails.len()).sum()
    }
}

// Merges the profile email (first) with the commit emails, dropping
// exact duplicates while preserving insertion order
fn merge_emails(profile_email: Option<String>, commit_emails: Vec<String>) -> Vec<String> {
    let mut emails = Vec::new();
    if let Some(email) = profile_email {
        if !email.is_empty() {
            emails.push(email);
        }
    }
    for email in commit_emails {
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    emails
}

// Enrichment calls may fail without sinking the whole resolution, but a
// rate-limit must still get through. This collapses "failed" into an
// empty default while re-raising RateLimited.
fn degrade<T: Default>(result: Result<T, GithubError>) -> Result<T, GithubError> {
    match result {
        Ok(value) => Ok(value),
        Err(error @ GithubError::RateLimited { .. }) => Err(error),
        Err(_) => Ok(T::default()),
    }
}

/// Resolves a batch of names strictly in order, one at a time, with a
/// fixed delay between them.
///
/// Fails fast: the first rate-limit (or top-level transport failure)
/// aborts the batch and the remaining names are never attempted. There
/// is no partial-result shape - callers get everything or an error.
pub async fn resolve_names(
    client: &GithubClient,
    names: &[String],
) -> Result<Vec<ResolvedEntity>, GithubError> {
    let mut results = Vec::with_capacity(names.len());

    for (index, name) in names.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(NAME_DELAY).await;
        }
        results.push(resolve_name(client, name).await?);
    }

    Ok(results)
}

/// Classifies one name and gathers its emails (the decision tree from
/// the module header).
pub async fn resolve_name(
    client: &GithubClient,
    name: &str,
) -> Result<ResolvedEntity, GithubError> {
    // Step 1: commit search. This is an enrichment step, so anything
    // short of a rate-limit degrades to "no commit emails".
    let commits = degrade(client.search_commit_emails(name).await)?;

    if !commits.emails.is_empty() {
        // Commit evidence wins: this is an individual, full stop
        let user = ResolvedUser::new(name, commits.author_name, commits.emails);
        return Ok(ResolvedEntity {
            input_name: name.to_string(),
            kind: EntityKind::Individual,
            members: vec![user],
        });
    }

    // Step 2: the type check. Profile lookup swallows 404s itself
    // (None), so an error here is a transport failure or a rate-limit,
    // and both are fatal at the top level.
    match client.fetch_profile(name).await? {
        Some(profile) if profile.is_organization() => resolve_organization(client, name).await,
        Some(profile) => {
            // Known individual: at most the one public profile email
            let emails = merge_emails(profile.email, Vec::new());
            let user = ResolvedUser::new(name, profile.name, emails);
            Ok(ResolvedEntity {
                input_name: name.to_string(),
                kind: EntityKind::Individual,
                members: vec![user],
            })
        }
        None => {
            // Neither a user nor an org we can see. Still an individual
            // result, just an empty one.
            let user = ResolvedUser::new(name, None, Vec::new());
            Ok(ResolvedEntity {
                input_name: name.to_string(),
                kind: EntityKind::Individual,
                members: vec![user],
            })
        }
    }
}

// Enumerates an organization's members and enriches them in bounded
// concurrent groups
async fn resolve_organization(
    client: &GithubClient,
    org: &str,
) -> Result<ResolvedEntity, GithubError> {
    let logins = client.list_org_members(org).await?;

    let mut members = Vec::with_capacity(logins.len());

    for (index, group) in logins.chunks(GROUP_SIZE).enumerate() {
        if index > 0 {
            tokio::time::sleep(GROUP_DELAY).await;
        }

        // The whole group runs concurrently; join_all keeps the
        // results in member order
        let enriched =
            futures::future::join_all(group.iter().map(|login| enrich_member(client, login)))
                .await;

        for outcome in enriched {
            // Only a rate-limit can surface here; it aborts the org
            members.push(outcome?);
        }
    }

    Ok(ResolvedEntity {
        input_name: org.to_string(),
        kind: EntityKind::Organization,
        members,
    })
}

// Gathers one member's emails from their profile and their commits,
// issued concurrently. Either source failing leaves us with whatever
// the other one found.
async fn enrich_member(client: &GithubClient, login: &str) -> Result<ResolvedUser, GithubError> {
    let (profile, commits) = tokio::join!(
        client.fetch_profile(login),
        client.search_commit_emails(login),
    );

    let profile = degrade(profile)?;
    let commits: CommitSearch = degrade(commits)?;

    // Member display names come from the profile only; a failed or
    // empty profile means no name even when commits carry one
    let display_name = profile.as_ref().and_then(|p| p.name.clone());
    let profile_email = profile.and_then(|p| p.email);

    let emails = merge_emails(profile_email, commits.emails);

    Ok(ResolvedUser::new(login, display_name, emails))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why chunks(5) + join_all instead of buffer_unordered?
//    - We want groups to fully finish before the pause, and we want
//      results back in member order
//    - buffer_unordered trades order away for throughput, which is
//      the wrong trade here
//
// 2. What is the `error @ pattern` syntax in degrade()?
//    - It binds the whole matched value to `error` while still
//      checking the pattern, so we can return the original error
//
// 3. Why does degrade() need T: Default?
//    - "Failed enrichment" becomes "empty data", and Default is how
//      each type says what empty means (None, empty CommitSearch)
//
// 4. Why is the individual path's profile lookup NOT degraded?
//    - It's the required type-check step: if we can't even ask GitHub
//      what the name is, the whole batch is in trouble and the caller
//      should hear about it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::GithubConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new(GithubConfig {
            token: None,
            api_base: server.uri(),
        })
    }

    fn commit_item(name: &str, email: &str) -> serde_json::Value {
        json!({"commit": {"author": {"name": name, "email": email, "date": "2024-01-01T00:00:00Z"}}})
    }

    fn commit_hits(items: Vec<serde_json::Value>) -> serde_json::Value {
        json!({"total_count": items.len(), "items": items})
    }

    fn user_profile(login: &str, name: Option<&str>, email: Option<&str>) -> serde_json::Value {
        json!({"login": login, "name": name, "email": email, "type": "User"})
    }

    #[test]
    fn test_merge_emails_profile_first() {
        let merged = merge_emails(
            Some("a@example.com".to_string()),
            vec!["b@example.com".to_string(), "a@example.com".to_string()],
        );
        assert_eq!(merged, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_merge_emails_is_case_sensitive() {
        // Exact match only: differing case means two distinct emails
        let merged = merge_emails(
            Some("A@Example.com".to_string()),
            vec!["a@example.com".to_string()],
        );
        assert_eq!(merged, vec!["A@Example.com", "a@example.com"]);
    }

    #[test]
    fn test_merge_emails_skips_empty_profile_email() {
        let merged = merge_emails(Some(String::new()), vec!["a@example.com".to_string()]);
        assert_eq!(merged, vec!["a@example.com"]);
    }

    #[tokio::test]
    async fn test_commit_hit_means_individual() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:mona"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit_hits(vec![
                commit_item("Mona", "mona@example.com"),
            ])))
            .mount(&server)
            .await;
        // No /users mock on purpose: a commit hit must short-circuit
        // before any profile lookup happens (unmatched requests 404)

        let entity = resolve_name(&client_for(&server), "mona").await.unwrap();

        assert_eq!(entity.kind, EntityKind::Individual);
        assert_eq!(entity.members.len(), 1);
        assert_eq!(entity.members[0].login, "mona");
        assert_eq!(entity.members[0].display_name.as_deref(), Some("Mona"));
        assert_eq!(entity.members[0].emails, vec!["mona@example.com"]);
        assert_eq!(entity.members[0].profile_url, "https://github.com/mona");
    }

    #[tokio::test]
    async fn test_individual_falls_back_to_profile_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_profile(
                "octocat",
                Some("The Octocat"),
                Some("octo@example.com"),
            )))
            .mount(&server)
            .await;

        let entity = resolve_name(&client_for(&server), "octocat").await.unwrap();

        assert_eq!(entity.kind, EntityKind::Individual);
        assert_eq!(entity.members[0].display_name.as_deref(), Some("The Octocat"));
        assert_eq!(entity.members[0].emails, vec!["octo@example.com"]);
    }

    #[tokio::test]
    async fn test_unknown_name_is_empty_individual() {
        let server = MockServer::start().await;
        // Nothing mocked: commit search and profile lookup both 404

        let entity = resolve_name(&client_for(&server), "no-such-name")
            .await
            .unwrap();

        assert_eq!(entity.kind, EntityKind::Individual);
        assert_eq!(entity.members.len(), 1);
        assert!(entity.members[0].display_name.is_none());
        assert!(entity.members[0].emails.is_empty());
    }

    #[tokio::test]
    async fn test_organization_members_enriched() {
        let server = MockServer::start().await;
        // The org itself has no commit hits
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:acme"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "acme", "name": "Acme Corp", "email": null, "type": "Organization"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"login": "wile"},
                {"login": "roadrunner"},
            ])))
            .mount(&server)
            .await;

        // wile: profile lookup fails, commit search succeeds -> emails
        // from commits only, and NO display name
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:wile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit_hits(vec![
                commit_item("Wile E.", "wile@acme.example"),
            ])))
            .mount(&server)
            .await;

        // roadrunner: profile email plus overlapping commit emails
        Mock::given(method("GET"))
            .and(path("/users/roadrunner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_profile(
                "roadrunner",
                Some("Road Runner"),
                Some("rr@acme.example"),
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:roadrunner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit_hits(vec![
                commit_item("Road Runner", "rr@acme.example"),
                commit_item("Road Runner", "beep@acme.example"),
            ])))
            .mount(&server)
            .await;

        let entity = resolve_name(&client_for(&server), "acme").await.unwrap();

        assert_eq!(entity.kind, EntityKind::Organization);
        assert_eq!(entity.members.len(), 2);

        let wile = &entity.members[0];
        assert_eq!(wile.login, "wile");
        assert!(wile.display_name.is_none());
        assert_eq!(wile.emails, vec!["wile@acme.example"]);

        let rr = &entity.members[1];
        assert_eq!(rr.display_name.as_deref(), Some("Road Runner"));
        // Profile email first, then commit emails, duplicate dropped
        assert_eq!(rr.emails, vec!["rr@acme.example", "beep@acme.example"]);
    }

    #[tokio::test]
    async fn test_org_with_zero_members() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/emptyorg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "emptyorg", "name": null, "email": null, "type": "Organization"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/emptyorg/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let entity = resolve_name(&client_for(&server), "emptyorg").await.unwrap();

        assert_eq!(entity.kind, EntityKind::Organization);
        assert!(entity.members.is_empty());
    }

    #[tokio::test]
    async fn test_batch_preserves_count_and_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit_hits(vec![
                commit_item("Alice", "alice@example.com"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(query_param("q", "author:bob"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit_hits(vec![
                commit_item("Bob", "bob@example.com"),
            ])))
            .mount(&server)
            .await;

        let names = vec!["alice".to_string(), "bob".to_string()];
        let results = resolve_names(&client_for(&server), &names).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].input_name, "alice");
        assert_eq!(results[1].input_name, "bob");
    }

    #[tokio::test]
    async fn test_rate_limit_on_first_call_fails_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let names = vec!["alice".to_string(), "bob".to_string()];
        let error = resolve_names(&client_for(&server), &names)
            .await
            .unwrap_err();

        assert!(matches!(error, GithubError::RateLimited { status: 403 }));
        // expect(1) verifies bob was never attempted after the failure
    }
}
