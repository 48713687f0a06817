//! In-memory [`IssueTracker`] for tests.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};

use issuepress_shared::{
    Comment, Issue, IssueFilter, IssuePressError, IssueState, IssueTracker, Label, Listing,
    Reaction, RepoMeta, Result, SortDirection, StateFilter,
};

pub(crate) const OWNER: &str = "alice";

pub(crate) struct MemoryTracker {
    repo: RepoMeta,
    issues: Vec<Issue>,
    comments: HashMap<u64, Vec<Comment>>,
    reactions: HashMap<u64, Vec<Reaction>>,
    labels: Vec<Label>,
    /// Issue listings yield this many items, then an error.
    fail_issue_listing_after: Option<usize>,
    /// Issue listing items handed out so far, errors included.
    pulled: Cell<usize>,
}

impl MemoryTracker {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self {
            repo: RepoMeta {
                owner: OWNER.into(),
                name: "blog".into(),
                full_name: format!("{OWNER}/blog"),
                default_branch: "main".into(),
                html_url: format!("https://github.com/{OWNER}/blog"),
            },
            issues,
            comments: HashMap::new(),
            reactions: HashMap::new(),
            labels: Vec::new(),
            fail_issue_listing_after: None,
            pulled: Cell::new(0),
        }
    }

    pub(crate) fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub(crate) fn with_comment(mut self, comment: Comment, reactions: Vec<Reaction>) -> Self {
        self.reactions.insert(comment.id, reactions);
        self.comments
            .entry(comment.issue_number)
            .or_default()
            .push(comment);
        self
    }

    pub(crate) fn failing_after(mut self, items: usize) -> Self {
        self.fail_issue_listing_after = Some(items);
        self
    }

    pub(crate) fn issues_pulled(&self) -> usize {
        self.pulled.get()
    }
}

impl IssueTracker for MemoryTracker {
    fn repository(&self) -> &RepoMeta {
        &self.repo
    }

    fn list_issues(&self, filter: &IssueFilter) -> Listing<'_, Issue> {
        let mut matching: Vec<Issue> = self
            .issues
            .iter()
            .filter(|i| filter.labels.iter().all(|l| i.has_label(l)))
            .filter(|i| filter.state == StateFilter::All || i.state == IssueState::Open)
            .cloned()
            .collect();
        match filter.created {
            Some(SortDirection::Desc) => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Some(SortDirection::Asc) => matching.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            None => {}
        }

        let items = matching.into_iter().map(Ok);
        let listing: Listing<'_, Issue> = match self.fail_issue_listing_after {
            Some(n) => Box::new(items.take(n).chain(std::iter::once(Err(
                IssuePressError::Tracker("listing vanished mid-iteration".into()),
            )))),
            None => Box::new(items),
        };
        Box::new(listing.inspect(|_| self.pulled.set(self.pulled.get() + 1)))
    }

    fn list_comments(&self, issue: &Issue) -> Listing<'_, Comment> {
        let comments = self.comments.get(&issue.number).cloned().unwrap_or_default();
        Box::new(comments.into_iter().map(Ok))
    }

    fn list_reactions(&self, comment: &Comment) -> Listing<'_, Reaction> {
        let reactions = self.reactions.get(&comment.id).cloned().unwrap_or_default();
        Box::new(reactions.into_iter().map(Ok))
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        Ok(self.labels.clone())
    }

    fn get_issue(&self, number: u64) -> Result<Issue> {
        self.issues
            .iter()
            .find(|i| i.number == number)
            .cloned()
            .ok_or_else(|| IssuePressError::NotFound(format!("issue #{number}")))
    }
}

/// An open owner-authored issue with a body, created `number` days after 2024-01-01.
pub(crate) fn issue(number: u64) -> Issue {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    Issue {
        number,
        title: format!("Post {number}"),
        body: Some(format!("Body of post {number}")),
        created_at: base + Duration::days(number as i64),
        html_url: format!("https://github.com/{OWNER}/blog/issues/{number}"),
        author: OWNER.into(),
        state: IssueState::Open,
        labels: Vec::new(),
        comment_count: 0,
        is_pull_request: false,
    }
}

pub(crate) fn labeled(mut issue: Issue, labels: &[&str]) -> Issue {
    issue.labels = labels.iter().map(|l| Label::new(*l)).collect();
    issue
}

pub(crate) fn by(mut issue: Issue, author: &str) -> Issue {
    issue.author = author.into();
    issue
}

pub(crate) fn comment(id: u64, issue_number: u64, author: &str, body: &str) -> Comment {
    Comment {
        id,
        issue_number,
        author: author.into(),
        body: Some(body.into()),
    }
}

pub(crate) fn heart(author: &str) -> Reaction {
    Reaction {
        kind: "heart".into(),
        author: author.into(),
    }
}
