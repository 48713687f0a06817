//! The issue-tracker interface consumed by the pipeline.
//!
//! Listings are lazy, forward-only, single-pass sequences. Each item is a
//! `Result` because a page fetch can fail halfway through; callers decide
//! whether a partial listing is acceptable.

use crate::error::Result;
use crate::types::{Comment, Issue, Label, Reaction, RepoMeta};

/// A lazily produced tracker listing. Restart it by calling the listing method again.
pub type Listing<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Which issues to list by state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    Open,
    #[default]
    All,
}

impl StateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::All => "all",
        }
    }
}

/// Sort direction for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter passed to [`IssueTracker::list_issues`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Issues must carry every one of these labels.
    pub labels: Vec<String>,
    pub state: StateFilter,
    /// Sort by creation time in this direction. `None` keeps the tracker default.
    pub created: Option<SortDirection>,
}

impl IssueFilter {
    /// Every issue, newest first.
    pub fn all_newest_first() -> Self {
        Self {
            labels: Vec::new(),
            state: StateFilter::All,
            created: Some(SortDirection::Desc),
        }
    }

    /// Issues carrying `label`, in the given state, tracker order.
    pub fn labeled(label: impl Into<String>, state: StateFilter) -> Self {
        Self {
            labels: vec![label.into()],
            state,
            created: None,
        }
    }
}

/// Operations issuepress needs from an issue tracker.
pub trait IssueTracker {
    /// Metadata of the single repository being published.
    fn repository(&self) -> &RepoMeta;

    /// List issues (pull requests included, flagged) matching `filter`.
    fn list_issues(&self, filter: &IssueFilter) -> Listing<'_, Issue>;

    /// List the comments of `issue` in tracker order.
    fn list_comments(&self, issue: &Issue) -> Listing<'_, Comment>;

    /// List the reactions on `comment`.
    fn list_reactions(&self, comment: &Comment) -> Listing<'_, Reaction>;

    /// All labels defined in the repository.
    fn list_labels(&self) -> Result<Vec<Label>>;

    /// Fetch a single issue. Fails with `NotFound` when absent.
    fn get_issue(&self, number: u64) -> Result<Issue>;
}
