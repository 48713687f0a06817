//! Most recently created owner issues.

use tracing::warn;

use issuepress_shared::{IssueFilter, Result};

use super::{SectionBuilder, SectionContext, push_issue_line};

/// Newest issues first, capped at the configured limit. A listing that
/// fails partway keeps whatever was written before the failure.
pub struct RecentSection;

impl SectionBuilder for RecentSection {
    fn name(&self) -> &str {
        "recent"
    }

    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()> {
        out.push_str("## 最近更新\n");

        let limit = ctx.config.recent_limit;
        if limit == 0 {
            return Ok(());
        }
        let mut count = 0;
        for item in ctx.tracker.list_issues(&IssueFilter::all_newest_first()) {
            let issue = match item {
                Ok(issue) => issue,
                Err(e) => {
                    warn!(error = %e, written = count, "recent listing failed, keeping partial list");
                    break;
                }
            };
            if !issue.is_owned_issue(ctx.owner) {
                continue;
            }
            push_issue_line(out, &issue);
            count += 1;
            if count == limit {
                break;
            }
        }
        Ok(())
    }
}
