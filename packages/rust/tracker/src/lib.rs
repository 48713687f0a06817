//! GitHub implementation of the [`IssueTracker`] interface.
//!
//! All calls are blocking and sequential. Listings follow GitHub's `Link`
//! pagination lazily, so a listing that is abandoned early never fetches the
//! remaining pages.

mod http;
mod wire;

use tracing::{info, instrument};
use url::Url;

use issuepress_shared::{
    Comment, Issue, IssueFilter, IssuePressError, IssueTracker, Label, Listing, Reaction,
    RepoMeta, Result,
};

use crate::http::Http;
use crate::wire::{GhComment, GhIssue, GhLabel, GhReaction, GhRepo};

/// Public GitHub REST API root.
pub const GITHUB_API: &str = "https://api.github.com/";

/// Default timeout in seconds for each API request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest page size GitHub accepts.
const DEFAULT_PER_PAGE: u32 = 100;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Connection settings for [`GitHubTracker`].
#[derive(Debug, Clone)]
pub struct GitHubOptions {
    /// API root, overridable for GitHub Enterprise or tests.
    pub api_base: String,
    pub timeout_secs: u64,
    pub per_page: u32,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

// ---------------------------------------------------------------------------
// GitHubTracker
// ---------------------------------------------------------------------------

/// Issue tracker backed by one GitHub repository.
pub struct GitHubTracker {
    http: Http,
    repo: RepoMeta,
    /// `repos/{owner}/{name}/` prefix for every repository endpoint.
    prefix: String,
}

impl GitHubTracker {
    /// Authenticate with `token` and load metadata for `repo_name` (`owner/name`).
    #[instrument(skip(token, opts), fields(api = %opts.api_base))]
    pub fn connect(token: &str, repo_name: &str, opts: &GitHubOptions) -> Result<Self> {
        let (owner, name) = split_repo_name(repo_name)?;
        let base = api_base_url(&opts.api_base)?;
        let http = Http::new(token, base, opts.timeout_secs, opts.per_page)?;
        let prefix = format!("repos/{owner}/{name}/");

        let url = http.endpoint(&format!("repos/{owner}/{name}"), &[])?;
        let (repo, _) = http.get_json::<GhRepo>(&url)?;
        let repo = RepoMeta::from(repo);

        info!(repo = %repo.full_name, owner = %repo.owner, "connected to repository");

        Ok(Self { http, repo, prefix })
    }

    fn path(&self, rest: &str) -> String {
        format!("{}{rest}", self.prefix)
    }
}

impl IssueTracker for GitHubTracker {
    fn repository(&self) -> &RepoMeta {
        &self.repo
    }

    fn list_issues(&self, filter: &IssueFilter) -> Listing<'_, Issue> {
        let mut query = vec![("state", filter.state.as_str().to_string())];
        if !filter.labels.is_empty() {
            query.push(("labels", filter.labels.join(",")));
        }
        if let Some(direction) = filter.created {
            query.push(("sort", "created".to_string()));
            query.push(("direction", direction.as_str().to_string()));
        }

        let first = self.http.paged_endpoint(&self.path("issues"), &query);
        Box::new(
            self.http
                .pages::<GhIssue>(first)
                .map(|r| r.map(Issue::from)),
        )
    }

    fn list_comments(&self, issue: &Issue) -> Listing<'_, Comment> {
        let number = issue.number;
        let first = self
            .http
            .paged_endpoint(&self.path(&format!("issues/{number}/comments")), &[]);
        Box::new(
            self.http
                .pages::<GhComment>(first)
                .map(move |r| r.map(|c| c.into_comment(number))),
        )
    }

    fn list_reactions(&self, comment: &Comment) -> Listing<'_, Reaction> {
        let first = self.http.paged_endpoint(
            &self.path(&format!("issues/comments/{}/reactions", comment.id)),
            &[],
        );
        Box::new(
            self.http
                .pages::<GhReaction>(first)
                .map(|r| r.map(Reaction::from)),
        )
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        let first = self.http.paged_endpoint(&self.path("labels"), &[]);
        self.http
            .pages::<GhLabel>(first)
            .map(|r| r.map(Label::from))
            .collect()
    }

    fn get_issue(&self, number: u64) -> Result<Issue> {
        let url = self.http.endpoint(&self.path(&format!("issues/{number}")), &[])?;
        let (issue, _) = self.http.get_json::<GhIssue>(&url).map_err(|e| match e {
            IssuePressError::NotFound(_) => IssuePressError::NotFound(format!("issue #{number}")),
            other => other,
        })?;
        Ok(issue.into())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split `owner/name`, rejecting anything else.
fn split_repo_name(repo_name: &str) -> Result<(&str, &str)> {
    match repo_name.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(IssuePressError::validation(format!(
            "repository must be given as owner/name, got {repo_name:?}"
        ))),
    }
}

/// Parse the API root, making sure relative joins land under it.
fn api_base_url(base: &str) -> Result<Url> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&normalized)
        .map_err(|e| IssuePressError::validation(format!("invalid API base {base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuepress_shared::StateFilter;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_json() -> serde_json::Value {
        serde_json::json!({
            "name": "blog",
            "full_name": "alice/blog",
            "owner": {"login": "alice"},
            "default_branch": "main",
            "html_url": "https://github.com/alice/blog"
        })
    }

    fn issue_json(number: u64, author: &str) -> serde_json::Value {
        serde_json::json!({
            "number": number,
            "title": format!("Post {number}"),
            "body": "text",
            "created_at": "2024-01-01T00:00:00Z",
            "html_url": format!("https://github.com/alice/blog/issues/{number}"),
            "user": {"login": author},
            "state": "open",
            "labels": [],
            "comments": 0
        })
    }

    async fn server_with_repo() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
            .mount(&server)
            .await;
        server
    }

    fn opts(server: &MockServer) -> GitHubOptions {
        GitHubOptions {
            api_base: server.uri(),
            ..GitHubOptions::default()
        }
    }

    #[test]
    fn repo_name_must_have_owner_and_name() {
        assert_eq!(split_repo_name("alice/blog").unwrap(), ("alice", "blog"));
        assert!(split_repo_name("alice").is_err());
        assert!(split_repo_name("/blog").is_err());
        assert!(split_repo_name("a/b/c").is_err());
    }

    #[test]
    fn api_base_gets_trailing_slash() {
        let url = api_base_url("http://localhost:9000/api/v3").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/v3/");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn connect_loads_repo_metadata() {
        let server = server_with_repo().await;
        let opts = opts(&server);

        let repo = tokio::task::spawn_blocking(move || {
            GitHubTracker::connect("secret", "alice/blog", &opts)
                .map(|t| t.repository().clone())
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(repo.owner, "alice");
        assert_eq!(repo.default_branch, "main");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn issue_listing_follows_pagination() {
        let server = server_with_repo().await;
        let next = format!(
            "<{}/repos/alice/blog/issues?state=all&page=2>; rel=\"next\"",
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([issue_json(1, "bob")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues"))
            .and(query_param("sort", "created"))
            .and(query_param("direction", "desc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(serde_json::json!([
                        issue_json(3, "alice"),
                        issue_json(2, "alice")
                    ])),
            )
            .mount(&server)
            .await;

        let opts = opts(&server);
        let numbers = tokio::task::spawn_blocking(move || {
            let tracker = GitHubTracker::connect("secret", "alice/blog", &opts)?;
            tracker
                .list_issues(&IssueFilter::all_newest_first())
                .map(|r| r.map(|i| i.number))
                .collect::<Result<Vec<_>>>()
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failing_page_yields_error_and_stops() {
        let server = server_with_repo().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues"))
            .and(query_param("labels", "Top"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let opts = opts(&server);
        let results = tokio::task::spawn_blocking(move || {
            let tracker = GitHubTracker::connect("secret", "alice/blog", &opts)?;
            Ok::<_, IssuePressError>(
                tracker
                    .list_issues(&IssueFilter::labeled("Top", StateFilter::All))
                    .collect::<Vec<_>>(),
            )
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(IssuePressError::Tracker(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_issue_is_not_found() {
        let server = server_with_repo().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let opts = opts(&server);
        let err = tokio::task::spawn_blocking(move || {
            let tracker = GitHubTracker::connect("secret", "alice/blog", &opts)?;
            tracker.get_issue(404)
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("#404"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reactions_are_listed_for_comment() {
        let server = server_with_repo().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues/5/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 77, "user": {"login": "carol"}, "body": "名字：Carol"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/blog/issues/comments/77/reactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"content": "heart", "user": {"login": "alice"}}
            ])))
            .mount(&server)
            .await;

        let opts = opts(&server);
        let (comments, reactions) = tokio::task::spawn_blocking(move || {
            let tracker = GitHubTracker::connect("secret", "alice/blog", &opts)?;
            let issue: Issue = serde_json::from_value::<GhIssue>(issue_json(5, "alice"))
                .map_err(|e| IssuePressError::parse(e.to_string()))?
                .into();
            let comments = tracker.list_comments(&issue).collect::<Result<Vec<_>>>()?;
            let reactions = tracker
                .list_reactions(&comments[0])
                .collect::<Result<Vec<_>>>()?;
            Ok::<_, IssuePressError>((comments, reactions))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(comments[0].issue_number, 5);
        assert_eq!(comments[0].author, "carol");
        assert!(reactions[0].is_heart_from("alice"));
    }
}
