//! Shared types, error model, tracker interface, and configuration for issuepress.
//!
//! This crate is the foundation depended on by all other issuepress crates.
//! It provides:
//! - [`IssuePressError`], the unified error type
//! - Domain types ([`Issue`], [`Comment`], [`Reaction`], [`Label`], [`RepoMeta`])
//! - The [`IssueTracker`] trait with lazy [`Listing`]s
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod tracker;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ArchiveConfig, CONFIG_FILE_NAME, FeedConfig, HeaderLink, IndexConfig,
    LabelsConfig, PipelineConfig, SiteConfig, load_config, load_config_from, to_toml,
};
pub use error::{IssuePressError, Result};
pub use tracker::{IssueFilter, IssueTracker, Listing, SortDirection, StateFilter};
pub use types::{Comment, Issue, IssueState, Label, Reaction, RepoMeta};
