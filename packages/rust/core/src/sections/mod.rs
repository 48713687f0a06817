//! Index document section builders.
//!
//! Every section is an independent [`SectionBuilder`]. The registry holds
//! them in output order; the index writer runs each one against a fresh
//! buffer and appends the buffer only when the builder succeeds.

mod catalog;
mod friends;
mod pinned;
mod recent;
mod todo;

use issuepress_shared::{Issue, IssueTracker, PipelineConfig, Result};

pub use catalog::{CatalogSection, sort_labels};
pub use friends::{FriendEntry, FriendsSection};
pub use pinned::PinnedSection;
pub use recent::RecentSection;
pub use todo::{TodoReport, TodoSection};

/// Summary text of the catalog's overflow disclosure block.
pub const SHOW_MORE: &str = "显示更多";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Everything a section needs besides its output buffer.
pub struct SectionContext<'a> {
    pub tracker: &'a dyn IssueTracker,
    /// Login whose issues are published.
    pub owner: &'a str,
    pub config: &'a PipelineConfig,
}

/// One section of the index document.
pub trait SectionBuilder {
    /// Short name for tracing.
    fn name(&self) -> &str;

    /// Append this section's markdown to `out`. Writing nothing omits the section.
    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Section builders in output order.
pub struct SectionRegistry {
    builders: Vec<Box<dyn SectionBuilder>>,
}

impl SectionRegistry {
    /// The standard order: friends, pinned, recent, catalog, to-do.
    pub fn new() -> Self {
        Self {
            builders: vec![
                Box::new(FriendsSection),
                Box::new(PinnedSection),
                Box::new(RecentSection),
                Box::new(CatalogSection),
                Box::new(TodoSection),
            ],
        }
    }

    /// A custom ordered list of builders.
    pub fn with_builders(builders: Vec<Box<dyn SectionBuilder>>) -> Self {
        Self { builders }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SectionBuilder> {
        self.builders.iter().map(|b| b.as_ref())
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `- [title](url)--YYYY-MM-DD`
pub(crate) fn push_issue_line(out: &mut String, issue: &Issue) {
    out.push_str(&format!(
        "- [{}]({})--{}\n",
        issue.title,
        issue.html_url,
        issue.created_date()
    ));
}

/// Drain a listing completely, stopping at the first error.
pub(crate) fn collect_all(listing: issuepress_shared::Listing<'_, Issue>) -> Result<Vec<Issue>> {
    listing.collect()
}
