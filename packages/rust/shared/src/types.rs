//! Core domain types mirrored from the issue tracker.
//!
//! Nothing in issuepress mutates these; they are read from the tracker,
//! filtered, and republished.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// A tracker label. The name is both a grouping key and a section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Only used as a secondary sort key for the catalog.
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// Open/closed state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// A single tracker issue (or pull request, which the tracker lists alongside issues).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Repository-unique number, increasing by creation order.
    pub number: u64,
    pub title: String,
    /// Markdown-flavored body, absent when the author left it empty.
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Canonical web URL of the issue.
    pub html_url: String,
    /// Login of the author.
    pub author: String,
    pub state: IssueState,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Number of comments as reported by the tracker.
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub is_pull_request: bool,
}

impl Issue {
    /// Whether `owner` wrote this issue.
    pub fn is_authored_by(&self, owner: &str) -> bool {
        self.author == owner
    }

    /// Whether the body has any content at all.
    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }

    /// A plain issue (not a pull request) written by `owner`.
    pub fn is_owned_issue(&self, owner: &str) -> bool {
        !self.is_pull_request && self.is_authored_by(owner)
    }

    /// Eligible for the feed and the archive: owned issue with a non-empty body.
    pub fn is_publishable(&self, owner: &str) -> bool {
        self.is_owned_issue(owner) && self.has_body()
    }

    /// Creation date as `YYYY-MM-DD`.
    pub fn created_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}

// ---------------------------------------------------------------------------
// Comment & Reaction
// ---------------------------------------------------------------------------

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Tracker-wide comment id, used to list reactions.
    pub id: u64,
    /// Number of the issue this comment belongs to.
    pub issue_number: u64,
    pub author: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl Comment {
    pub fn is_authored_by(&self, owner: &str) -> bool {
        self.author == owner
    }
}

/// A reaction left on a comment (`heart`, `+1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub kind: String,
    pub author: String,
}

impl Reaction {
    pub fn is_heart_from(&self, owner: &str) -> bool {
        self.kind == "heart" && self.author == owner
    }
}

// ---------------------------------------------------------------------------
// RepoMeta
// ---------------------------------------------------------------------------

/// Repository-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMeta {
    /// Login of the repository owner; the only identity whose content is published.
    pub owner: String,
    /// Repository name without the owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    pub default_branch: String,
    /// Canonical web URL of the repository.
    pub html_url: String,
}

impl RepoMeta {
    /// Default GitHub Pages base URL (`https://{owner}.github.io/{name}`), no trailing slash.
    pub fn pages_base_url(&self) -> String {
        format!("https://{}.github.io/{}", self.owner, self.name)
    }
}
