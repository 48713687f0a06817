//! GitHub REST response shapes and their conversion into domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use issuepress_shared::{Comment, Issue, IssueState, Label, Reaction, RepoMeta};

#[derive(Debug, Deserialize)]
pub(crate) struct GhUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhLabel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    pub user: GhUser,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<GhLabel>,
    #[serde(default)]
    pub comments: u32,
    /// Present (as an object) only when the entry is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhComment {
    pub id: u64,
    pub user: GhUser,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhReaction {
    pub content: String,
    pub user: GhUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhRepo {
    pub name: String,
    pub full_name: String,
    pub owner: GhUser,
    #[serde(default)]
    pub default_branch: Option<String>,
    pub html_url: String,
}

impl From<GhLabel> for Label {
    fn from(label: GhLabel) -> Self {
        Self {
            name: label.name,
            description: label.description,
        }
    }
}

impl From<GhIssue> for Issue {
    fn from(issue: GhIssue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            body: issue.body,
            created_at: issue.created_at,
            html_url: issue.html_url,
            author: issue.user.login,
            state: if issue.state == "closed" {
                IssueState::Closed
            } else {
                IssueState::Open
            },
            labels: issue.labels.into_iter().map(Label::from).collect(),
            comment_count: issue.comments,
            is_pull_request: issue.pull_request.is_some_and(|v| !v.is_null()),
        }
    }
}

impl GhComment {
    pub(crate) fn into_comment(self, issue_number: u64) -> Comment {
        Comment {
            id: self.id,
            issue_number,
            author: self.user.login,
            body: self.body,
        }
    }
}

impl From<GhReaction> for Reaction {
    fn from(reaction: GhReaction) -> Self {
        Self {
            kind: reaction.content,
            author: reaction.user.login,
        }
    }
}

impl From<GhRepo> for RepoMeta {
    fn from(repo: GhRepo) -> Self {
        Self {
            owner: repo.owner.login,
            name: repo.name,
            full_name: repo.full_name,
            default_branch: repo.default_branch.unwrap_or_else(|| "master".into()),
            html_url: repo.html_url,
        }
    }
}
