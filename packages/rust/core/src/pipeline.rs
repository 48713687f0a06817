//! End-to-end run: index → feed → archive delta → persist.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument};

use issuepress_shared::{AppConfig, IssueTracker, PipelineConfig, Result};

use crate::archive::{archived_numbers, issues_to_archive, save_issue};
use crate::feed::build_feed;
use crate::index::write_index;
use crate::sections::SectionRegistry;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Index sections that produced output, in order.
    pub sections: Vec<String>,
    /// Number of feed entries written.
    pub feed_entries: usize,
    /// Issue numbers archived during this run.
    pub archived: Vec<u64>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each archive document is written.
    fn archived(&self, number: u64, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn archived(&self, _number: u64, _current: usize, _total: usize) {}
    fn done(&self, _summary: &RunSummary) {}
}

/// Run the full pipeline against `tracker`.
///
/// `requested_issue` forces one issue into the archive delta even if it was
/// archived before.
#[instrument(skip_all, fields(repo = %tracker.repository().full_name, requested_issue = ?requested_issue))]
pub fn run(
    config: &AppConfig,
    tracker: &dyn IssueTracker,
    requested_issue: Option<u64>,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let start = Instant::now();
    let pipeline = PipelineConfig::from(config);
    let owner = tracker.repository().owner.clone();

    info!(owner = %owner, "starting run");

    // --- Phase 1: Index document ---
    progress.phase("Writing index document");
    let index = write_index(tracker, config, &pipeline, &SectionRegistry::new())?;

    // --- Phase 2: Feed ---
    progress.phase("Building feed");
    let with_icon = config.site.icon_path.exists();
    let feed = build_feed(tracker, &config.site, &pipeline, with_icon, Utc::now())?;
    feed.write(&pipeline.feed_filename)?;

    // --- Phase 3: Archive delta ---
    progress.phase("Scanning archive");
    let archived = archived_numbers(&pipeline.archive_dir)?;
    let delta = issues_to_archive(tracker, &owner, &archived, requested_issue)?;

    // --- Phase 4: Persist ---
    progress.phase("Archiving issues");
    let total = delta.len();
    let mut written = Vec::with_capacity(total);
    for (i, issue) in delta.iter().enumerate() {
        save_issue(tracker, issue, &owner, &pipeline.archive_dir)?;
        written.push(issue.number);
        progress.archived(issue.number, i + 1, total);
    }

    let summary = RunSummary {
        sections: index.sections,
        feed_entries: feed.entries.len(),
        archived: written,
        elapsed: start.elapsed(),
    };

    info!(
        sections = summary.sections.len(),
        feed_entries = summary.feed_entries,
        archived = summary.archived.len(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "run complete"
    );

    progress.done(&summary);
    Ok(summary)
}
