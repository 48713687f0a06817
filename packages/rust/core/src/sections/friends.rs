//! Friends/links table built from comments the owner hearted.

use tracing::debug;

use issuepress_markdown::render_markdown;
use issuepress_shared::{Comment, IssueFilter, IssueTracker, Result, StateFilter};

use super::{SectionBuilder, SectionContext, collect_all};

/// Full-width colon between key and value in a friend block.
const FIELD_SEPARATOR: char = '：';

const KEY_NAME: &str = "名字";
const KEY_LINK: &str = "链接";
const KEY_DESC: &str = "描述";

const TABLE_HEAD: &str = "| Name | Link | Desc |\n| ---- | ---- | ---- |\n";

/// One row of the friends table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendEntry {
    pub name: String,
    pub link: String,
    pub description: String,
}

impl FriendEntry {
    /// Parse a `key：value` block. Lines without the separator and unknown
    /// keys are skipped. Name and link are required, the description is not.
    pub fn parse(block: &str) -> Option<Self> {
        let mut name = None;
        let mut link = None;
        let mut description = None;

        for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once(FIELD_SEPARATOR) else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                KEY_NAME => name = Some(value),
                KEY_LINK => link = Some(value),
                KEY_DESC => description = Some(value),
                _ => {}
            }
        }

        Some(Self {
            name: name?.to_string(),
            link: link?.to_string(),
            description: description.unwrap_or_default().to_string(),
        })
    }

    /// `| name | link | description |` with a trailing newline.
    pub fn table_row(&self) -> String {
        format!(
            "| {} | {} | {} |\n",
            escape_cell(&self.name),
            escape_cell(&self.link),
            escape_cell(&self.description)
        )
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Whether `owner` left a heart on `comment`.
fn is_hearted_by(tracker: &dyn IssueTracker, comment: &Comment, owner: &str) -> Result<bool> {
    for reaction in tracker.list_reactions(comment) {
        if reaction?.is_heart_from(owner) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Collapsible table of links posted as comments on the friends issues.
pub struct FriendsSection;

impl SectionBuilder for FriendsSection {
    fn name(&self) -> &str {
        "friends"
    }

    fn build(&self, ctx: &SectionContext<'_>, out: &mut String) -> Result<()> {
        let issues: Vec<_> = collect_all(ctx.tracker.list_issues(&IssueFilter::labeled(
            &ctx.config.friends_label,
            StateFilter::All,
        )))?
        .into_iter()
        .filter(|i| !i.is_pull_request)
        .collect();

        let Some(first) = issues.first() else {
            return Ok(());
        };

        let mut table = TABLE_HEAD.to_string();
        for issue in &issues {
            for comment in ctx.tracker.list_comments(issue) {
                let comment = comment?;
                if !is_hearted_by(ctx.tracker, &comment, ctx.owner)? {
                    continue;
                }
                match FriendEntry::parse(comment.body.as_deref().unwrap_or_default()) {
                    Some(entry) => table.push_str(&entry.table_row()),
                    None => debug!(comment = comment.id, "hearted comment is not a friend block"),
                }
            }
        }

        let repo = ctx.tracker.repository();
        out.push_str(&format!(
            "## [友情链接](https://github.com/{}/issues/{})\n",
            repo.full_name, first.number
        ));
        out.push_str("<details><summary>显示</summary>\n");
        out.push_str(&render_markdown(&table));
        out.push_str("</details>\n\n\n");
        Ok(())
    }
}
