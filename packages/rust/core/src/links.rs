//! Public URLs derived from the repository and site configuration.

use std::path::Path;

use issuepress_shared::{RepoMeta, SiteConfig};

/// URLs under the published site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    /// Site root without a trailing slash.
    pub base: String,
    /// Feed subscribe URL.
    pub feed: String,
}

impl SiteLinks {
    pub fn new(site: &SiteConfig, repo: &RepoMeta, feed_filename: &Path) -> Self {
        let base = site
            .pages_base_url
            .as_deref()
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|| repo.pages_base_url());
        let file = feed_filename
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| feed_filename.to_string_lossy().into_owned());
        let feed = format!("{base}/{file}");
        Self { base, feed }
    }

    /// Site root with a trailing slash.
    pub fn site(&self) -> String {
        format!("{}/", self.base)
    }

    /// Permalink of one issue on the site.
    pub fn issue(&self, number: u64) -> String {
        format!("{}/issue-{number}/", self.base)
    }

    pub fn icon(&self) -> String {
        format!("{}/icon.png", self.base)
    }
}
