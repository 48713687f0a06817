//! Index document (README) writer.
//!
//! The header truncates the file; each section and the footer are appended
//! separately, so a failing section leaves everything before it on disk.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use issuepress_shared::{
    AppConfig, IssuePressError, IssueTracker, PipelineConfig, RepoMeta, Result,
};

use crate::links::SiteLinks;
use crate::sections::{SectionContext, SectionRegistry};

/// Outcome of writing the index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub path: PathBuf,
    /// Names of the sections that produced output, in order.
    pub sections: Vec<String>,
}

/// Append-only handle on the index file.
#[derive(Debug)]
pub struct IndexDocument {
    path: PathBuf,
}

impl IndexDocument {
    /// Create (or truncate) the file and write `header`.
    pub fn create(path: &Path, header: &str) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IssuePressError::io(parent, e))?;
        }
        std::fs::write(path, header).map_err(|e| IssuePressError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Open, append `text`, close.
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| IssuePressError::io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| IssuePressError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Header block: title, intro, subscribe URL, and the links table.
pub fn render_header(
    config: &AppConfig,
    pipeline: &PipelineConfig,
    repo: &RepoMeta,
    links: &SiteLinks,
) -> String {
    let mut header = format!("# {}\n\n", config.site.title);
    if !config.index.intro.is_empty() {
        header.push_str(&format!("> {}\n\n", config.index.intro));
    }
    header.push_str(&format!("订阅地址：{}\n\n", links.feed));

    let archive = pipeline.archive_dir.to_string_lossy().replace('\\', "/");
    let archive_name = pipeline
        .archive_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive.clone());

    header.push_str("## Links\n\n| Platform | Link |\n| :--- | :--- |\n");
    header.push_str(&format!("| RSS Feed | [Subscribe]({}) |\n", links.feed));
    header.push_str(&format!(
        "| Markdown 备份 | [{archive_name}](https://github.com/{}/tree/{}/{archive}) |\n",
        repo.full_name, repo.default_branch
    ));
    header.push_str(&format!("| GitHub Pages | [View]({}) |\n", links.site()));
    for link in &config.index.links {
        header.push_str(&format!(
            "| {} | [{}]({}) |\n",
            link.platform, link.label, link.url
        ));
    }
    header.push_str("\n---\n\n\n");
    header
}

/// Write the full index document: header, every registered section, footer.
#[instrument(skip_all, fields(path = %pipeline.index_path.display()))]
pub fn write_index(
    tracker: &dyn IssueTracker,
    config: &AppConfig,
    pipeline: &PipelineConfig,
    registry: &SectionRegistry,
) -> Result<IndexReport> {
    let repo = tracker.repository();
    let links = SiteLinks::new(&config.site, repo, &pipeline.feed_filename);
    let doc = IndexDocument::create(
        &pipeline.index_path,
        &render_header(config, pipeline, repo, &links),
    )?;

    let ctx = SectionContext {
        tracker,
        owner: &repo.owner,
        config: pipeline,
    };

    let mut sections = Vec::new();
    for builder in registry.iter() {
        let mut buf = String::new();
        builder.build(&ctx, &mut buf)?;
        debug!(section = builder.name(), bytes = buf.len(), "section built");
        if buf.is_empty() {
            continue;
        }
        doc.append(&buf)?;
        sections.push(builder.name().to_string());
    }

    doc.append(&config.index.footer)?;

    info!(sections = sections.len(), "index document written");
    Ok(IndexReport {
        path: doc.path().to_path_buf(),
        sections,
    })
}
