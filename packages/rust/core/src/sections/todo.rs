//! Checkbox progress for open to-do issues.

use issuepress_shared::{Issue, IssueFilter, Result, StateFilter};

use super::{SectionBuilder, SectionContext, collect_all};

const UNDONE_MARKER: &str = "- [ ] ";
const DONE_MARKER: &str = "- [x] ";

/// Checkbox lines of one issue body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoReport {
    pub done: Vec<String>,
    pub undone: Vec<String>,
}

impl TodoReport {
    /// Collect `- [ ] ` and `- [x] ` lines. Anything else is ignored.
    pub fn parse(body: &str) -> Self {
        let mut report = Self::default();
        for line in body.lines() {
            if line.starts_with(UNDONE_MARKER) {
                report.undone.push(line.to_string());
            } else if line.starts_with(DONE_MARKER) {
                report.done.push(line.to_string());
            }
        }
        report
    }

    /// `title--N jobs to do--M jobs done`, or `title all done`.
    pub fn status(&self, title: &str) -> String {
        if self.undone.is_empty() {
            format!("{title} all done")
        } else {
            format!(
                "{title}--{} jobs to do--{} jobs done",
                self.undone.len(),
                self.done.len()
            )
        }
    }

    /// Done items, then undone ones. Empty once everything is done.
    pub fn lines(&self) -> Vec<&str> {
        if self.undone.is_empty() {
            return Vec::new();
        }
        self.done
            .iter()
            .chain(&self.undone)
            .map(String::as_str)
            .collect()
    }
}

fn report_for(issue: &Issue) -> TodoReport {
    TodoReport::parse(issue.body.as_deref().unwrap_or_default())
}

pub struct TodoSection;

impl SectionBuilder for TodoSection {
    fn name(&self) -> &str {
        "todo"
    }

    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()> {
        let issues = collect_all(ctx.tracker.list_issues(&IssueFilter::labeled(
            &ctx.config.todo_label,
            StateFilter::Open,
        )))?;
        if issues.is_empty() {
            return Ok(());
        }

        out.push_str("## TODO\n");
        for issue in issues.iter().filter(|i| i.is_owned_issue(ctx.owner)) {
            let report = report_for(issue);
            let title = format!("[{}]({})", issue.title, issue.html_url);
            out.push_str(&format!("TODO list from {}\n", report.status(&title)));
            for line in report.lines() {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        Ok(())
    }
}
