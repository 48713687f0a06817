//! Application configuration for issuepress.
//!
//! Config lives in `issuepress.toml` next to the published repository checkout.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IssuePressError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "issuepress.toml";

// ---------------------------------------------------------------------------
// Config structs (matching issuepress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity used in the feed channel and index header.
    #[serde(default)]
    pub site: SiteConfig,

    /// Names of the labels handled by dedicated sections.
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Index document layout.
    #[serde(default)]
    pub index: IndexConfig,

    /// Syndication feed output.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Archive store.
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,

    #[serde(default = "default_site_description")]
    pub description: String,

    /// Feed language tag.
    #[serde(default = "default_language")]
    pub language: String,

    /// Display name used for the channel editor and every entry author.
    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,

    /// Overrides the derived `https://{owner}.github.io/{repo}` base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_base_url: Option<String>,

    /// Local icon asset; feed icon extensions are emitted only when it exists.
    #[serde(default = "default_icon_path")]
    pub icon_path: PathBuf,

    /// Icon width and height in pixels.
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: default_site_description(),
            language: default_language(),
            author_name: default_author_name(),
            author_email: None,
            pages_base_url: None,
            icon_path: default_icon_path(),
            icon_size: default_icon_size(),
        }
    }
}

fn default_site_title() -> String {
    "Issue Blog".into()
}
fn default_site_description() -> String {
    "Posts published from repository issues.".into()
}
fn default_language() -> String {
    "zh-CN".into()
}
fn default_author_name() -> String {
    "Owner".into()
}
fn default_icon_path() -> PathBuf {
    PathBuf::from("static/icon.png")
}
fn default_icon_size() -> u32 {
    144
}

/// `[labels]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_pinned_label")]
    pub pinned: String,
    #[serde(default = "default_todo_label")]
    pub todo: String,
    #[serde(default = "default_friends_label")]
    pub friends: String,
    #[serde(default = "default_about_label")]
    pub about: String,
    #[serde(default = "default_things_label")]
    pub things: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            pinned: default_pinned_label(),
            todo: default_todo_label(),
            friends: default_friends_label(),
            about: default_about_label(),
            things: default_things_label(),
        }
    }
}

impl LabelsConfig {
    /// Labels excluded from the generic catalog.
    pub fn reserved(&self) -> BTreeSet<String> {
        [
            &self.friends,
            &self.pinned,
            &self.todo,
            &self.about,
            &self.things,
        ]
        .into_iter()
        .cloned()
        .collect()
    }
}

fn default_pinned_label() -> String {
    "Top".into()
}
fn default_todo_label() -> String {
    "TODO".into()
}
fn default_friends_label() -> String {
    "Friends".into()
}
fn default_about_label() -> String {
    "About".into()
}
fn default_things_label() -> String {
    "Things".into()
}

/// An extra row in the index header links table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLink {
    pub platform: String,
    pub label: String,
    pub url: String,
}

/// `[index]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Output path of the index document.
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    /// Entries in the recent section.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Catalog entries per label shown before the rest is folded.
    #[serde(default = "default_disclosure_threshold")]
    pub disclosure_threshold: usize,

    /// Quoted introduction under the title.
    #[serde(default)]
    pub intro: String,

    /// Extra header links (video channels, mirrors, ...).
    #[serde(default)]
    pub links: Vec<HeaderLink>,

    /// Footer/credits appended after all sections.
    #[serde(default = "default_footer")]
    pub footer: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            recent_limit: default_recent_limit(),
            disclosure_threshold: default_disclosure_threshold(),
            intro: String::new(),
            links: Vec::new(),
            footer: default_footer(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("README.md")
}
fn default_recent_limit() -> usize {
    5
}
fn default_disclosure_threshold() -> usize {
    5
}
fn default_footer() -> String {
    "\n---\n\n## Credits\n\nBuilt with [gitblog](https://github.com/yihong0618/gitblog) by [@yihong0618](https://github.com/yihong0618)\n".into()
}

/// `[feed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_filename")]
    pub filename: PathBuf,

    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            filename: default_feed_filename(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

fn default_feed_filename() -> PathBuf {
    PathBuf::from("rss.xml")
}
fn default_summary_max_chars() -> usize {
    360
}

/// `[archive]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_archive_dir")]
    pub dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            dir: default_archive_dir(),
        }
    }
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("BACKUP")
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Immutable runtime configuration passed through the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Labels owned by a dedicated section, never repeated in the catalog.
    pub reserved_labels: BTreeSet<String>,
    pub pinned_label: String,
    pub todo_label: String,
    pub friends_label: String,
    pub recent_limit: usize,
    pub disclosure_threshold: usize,
    pub summary_max_chars: usize,
    pub archive_dir: PathBuf,
    pub feed_filename: PathBuf,
    pub index_path: PathBuf,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            reserved_labels: config.labels.reserved(),
            pinned_label: config.labels.pinned.clone(),
            todo_label: config.labels.todo.clone(),
            friends_label: config.labels.friends.clone(),
            recent_limit: config.index.recent_limit,
            disclosure_threshold: config.index.disclosure_threshold,
            summary_max_chars: config.feed.summary_max_chars,
            archive_dir: config.archive.dir.clone(),
            feed_filename: config.feed.filename.clone(),
            index_path: config.index.path.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path`. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| IssuePressError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        IssuePressError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate(&config)?;
    Ok(config)
}

/// Reject values that would make the outputs meaningless.
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.feed.summary_max_chars == 0 {
        return Err(IssuePressError::config(
            "feed.summary_max_chars must be at least 1",
        ));
    }
    if config.feed.filename.as_os_str().is_empty() {
        return Err(IssuePressError::config("feed.filename must not be empty"));
    }
    if config.archive.dir.as_os_str().is_empty() {
        return Err(IssuePressError::config("archive.dir must not be empty"));
    }
    Ok(())
}

/// Serialize a config for `--print-config`.
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| IssuePressError::config(e.to_string()))
}
