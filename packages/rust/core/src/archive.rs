//! Write-once markdown archive of issues.
//!
//! Each archived issue lives in `{number}_{title}.md` under the archive
//! directory. The leading number is the identifier: once present, bulk runs
//! never regenerate the document.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use issuepress_shared::{Comment, Issue, IssueFilter, IssuePressError, IssueTracker, Result};

/// Issue number encoded in an archive file name, if any.
///
/// The identifier is the token before the first `_`; it must be all digits.
pub fn parse_archive_id(file_name: &str) -> Option<u64> {
    let token = file_name.split('_').next()?;
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Identifiers already present in `dir`. A missing directory is empty.
pub fn archived_numbers(dir: &Path) -> Result<BTreeSet<u64>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(IssuePressError::io(dir, e)),
    };

    let mut numbers = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| IssuePressError::io(dir, e))?;
        if let Some(number) = entry.file_name().to_str().and_then(parse_archive_id) {
            numbers.insert(number);
        }
    }
    Ok(numbers)
}

/// Issues that need an archive document, newest first.
///
/// `requested` is appended when it is eligible and not already a candidate,
/// even if it was archived before. A requested issue the tracker does not
/// know is skipped with a warning.
#[instrument(skip(tracker, archived), fields(archived = archived.len()))]
pub fn issues_to_archive(
    tracker: &dyn IssueTracker,
    owner: &str,
    archived: &BTreeSet<u64>,
    requested: Option<u64>,
) -> Result<Vec<Issue>> {
    let mut candidates = Vec::new();
    for issue in tracker.list_issues(&IssueFilter::all_newest_first()) {
        let issue = issue?;
        if !archived.contains(&issue.number) && issue.is_publishable(owner) {
            candidates.push(issue);
        }
    }

    if let Some(number) = requested {
        if candidates.iter().any(|i| i.number == number) {
            debug!(number, "requested issue already a candidate");
        } else {
            match tracker.get_issue(number) {
                Ok(issue) if issue.is_publishable(owner) => candidates.push(issue),
                Ok(_) => warn!(number, "requested issue is not eligible for archiving"),
                Err(e) if e.is_not_found() => warn!(number, "requested issue not found"),
                Err(e) => return Err(e),
            }
        }
    }

    info!(candidates = candidates.len(), "archive delta computed");
    Ok(candidates)
}

/// `{number}_{title}.md`, with `/` and spaces replaced in the title.
pub fn archive_file_name(issue: &Issue) -> String {
    let title = issue.title.replace('/', "-").replace(' ', ".");
    format!("{}_{title}.md", issue.number)
}

/// Document body: linked title, issue body, then each owner comment after a rule.
pub fn render_archive_document(issue: &Issue, owner_comments: &[Comment]) -> String {
    let mut doc = format!(
        "# [{}]({})\n\n{}",
        issue.title,
        issue.html_url,
        issue.body.as_deref().unwrap_or_default()
    );
    for comment in owner_comments {
        doc.push_str("\n\n---\n\n");
        doc.push_str(comment.body.as_deref().unwrap_or_default());
    }
    doc
}

/// Write one archive document and return its path.
pub fn save_issue(
    tracker: &dyn IssueTracker,
    issue: &Issue,
    owner: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let mut owner_comments = Vec::new();
    if issue.comment_count > 0 {
        for comment in tracker.list_comments(issue) {
            let comment = comment?;
            if comment.is_authored_by(owner) {
                owner_comments.push(comment);
            }
        }
    }

    std::fs::create_dir_all(dir).map_err(|e| IssuePressError::io(dir, e))?;

    let file_name = archive_file_name(issue);
    let target = dir.join(&file_name);
    let temp = dir.join(format!(".{file_name}.tmp"));
    std::fs::write(&temp, render_archive_document(issue, &owner_comments))
        .map_err(|e| IssuePressError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| IssuePressError::io(&target, e))?;

    debug!(number = issue.number, path = %target.display(), "issue archived");
    Ok(target)
}
