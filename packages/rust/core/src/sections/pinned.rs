//! Pinned issues, in the tracker's order.

use issuepress_shared::{IssueFilter, Result, StateFilter};

use super::{SectionBuilder, SectionContext, collect_all, push_issue_line};

pub struct PinnedSection;

impl SectionBuilder for PinnedSection {
    fn name(&self) -> &str {
        "pinned"
    }

    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()> {
        let issues = collect_all(ctx.tracker.list_issues(&IssueFilter::labeled(
            &ctx.config.pinned_label,
            StateFilter::All,
        )))?;
        if issues.is_empty() {
            return Ok(());
        }

        out.push_str("## 置顶文章\n");
        for issue in issues.iter().filter(|i| i.is_owned_issue(ctx.owner)) {
            push_issue_line(out, issue);
        }
        Ok(())
    }
}
