//! Core pipeline and domain logic for issuepress.
//!
//! This crate turns a tracker's issue stream into an index document, an RSS
//! feed, and a write-once markdown archive (see [`pipeline::run`]).

pub mod archive;
pub mod feed;
pub mod index;
pub mod links;
pub mod pipeline;
pub mod sections;

#[cfg(test)]
mod testing;
