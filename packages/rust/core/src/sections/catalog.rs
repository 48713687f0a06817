//! Per-label catalog of owner issues.

use std::cmp::Ordering;

use tracing::debug;

use issuepress_shared::{Issue, IssueFilter, Label, Result, StateFilter};

use super::{SHOW_MORE, SectionBuilder, SectionContext, collect_all, push_issue_line};

/// Sort labels so that a non-empty description orders them.
///
/// Key: (no description, empty description, description, name), ascending.
/// Prefixing descriptions with an ordinal (`1#Rust`, `2#Go`) pins the order.
pub fn sort_labels(labels: &mut [Label]) {
    labels.sort_by(compare_labels);
}

fn compare_labels(a: &Label, b: &Label) -> Ordering {
    let key = |l: &Label| {
        let desc = l.description.as_deref();
        (desc.is_none(), desc == Some(""), desc.unwrap_or_default().to_string(), l.name.clone())
    };
    key(a).cmp(&key(b))
}

/// One heading per non-reserved label, newest issues first, overflow folded.
pub struct CatalogSection;

impl SectionBuilder for CatalogSection {
    fn name(&self) -> &str {
        "catalog"
    }

    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()> {
        let mut labels = ctx.tracker.list_labels()?;
        sort_labels(&mut labels);

        let threshold = ctx.config.disclosure_threshold;
        for label in labels
            .iter()
            .filter(|l| !ctx.config.reserved_labels.contains(&l.name))
        {
            let mut issues: Vec<Issue> = collect_all(
                ctx.tracker
                    .list_issues(&IssueFilter::labeled(&label.name, StateFilter::All)),
            )?
            .into_iter()
            .filter(|i| i.is_owned_issue(ctx.owner))
            .collect();

            if issues.is_empty() {
                debug!(label = %label.name, "no owner issues under label");
                continue;
            }
            issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            out.push_str(&format!("## {}\n\n", label.name));
            for (i, issue) in issues.iter().enumerate() {
                if i == threshold {
                    out.push_str(&format!("<details><summary>{SHOW_MORE}</summary>\n\n"));
                }
                push_issue_line(out, issue);
            }
            if issues.len() > threshold {
                out.push_str("</details>\n\n");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryTracker, OWNER, by, issue, labeled};
    use issuepress_shared::PipelineConfig;

    fn run(tracker: &MemoryTracker) -> String {
        let config = PipelineConfig::default();
        let ctx = SectionContext {
            tracker,
            owner: OWNER,
            config: &config,
        };
        let mut out = String::new();
        CatalogSection.build(&ctx, &mut out).unwrap();
        out
    }

    #[test]
    fn labels_with_descriptions_sort_first() {
        let mut labels = vec![
            Label::new("B"),
            Label::with_description("A", "2x"),
            Label::with_description("C", "1x"),
        ];
        sort_labels(&mut labels);
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn empty_description_sorts_between_described_and_missing() {
        let mut labels = vec![
            Label::new("Z"),
            Label::with_description("Y", ""),
            Label::with_description("X", "9"),
            Label::new("A"),
        ];
        sort_labels(&mut labels);
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["X", "Y", "A", "Z"]);
    }

    #[test]
    fn overflow_beyond_threshold_is_folded() {
        let issues: Vec<_> = (1..=7).map(|n| labeled(issue(n), &["Rust"])).collect();
        let tracker = MemoryTracker::new(issues).with_labels(vec![Label::new("Rust")]);

        let out = run(&tracker);
        let (visible, folded) = out.split_once("<details>").expect("disclosure block");
        assert!(visible.starts_with("## Rust\n\n"));
        assert_eq!(visible.matches("- [Post").count(), 5);
        assert_eq!(folded.matches("- [Post").count(), 2);
        assert!(folded.contains("<summary>显示更多</summary>"));
        assert!(out.ends_with("</details>\n\n"));
        // newest first
        assert!(visible.find("Post 7").unwrap() < visible.find("Post 3").unwrap());
        assert!(folded.contains("Post 2") && folded.contains("Post 1"));
    }

    #[test]
    fn exactly_threshold_entries_have_no_disclosure() {
        let issues: Vec<_> = (1..=5).map(|n| labeled(issue(n), &["Rust"])).collect();
        let tracker = MemoryTracker::new(issues).with_labels(vec![Label::new("Rust")]);
        let out = run(&tracker);
        assert!(!out.contains("<details>"));
        assert_eq!(out.matches("- [Post").count(), 5);
    }

    #[test]
    fn reserved_and_foreign_only_labels_are_skipped() {
        let tracker = MemoryTracker::new(vec![
            labeled(issue(1), &["Top", "Rust"]),
            by(labeled(issue(2), &["Go"]), "mallory"),
        ])
        .with_labels(vec![Label::new("Top"), Label::new("Rust"), Label::new("Go")]);

        let out = run(&tracker);
        assert!(!out.contains("## Top"));
        assert!(!out.contains("## Go"));
        assert!(out.contains("## Rust\n\n- [Post 1]"));
    }
}
